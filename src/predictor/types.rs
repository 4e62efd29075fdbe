//! Request, result and classification types exchanged with the predictor.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Keys the predictor may emit for its own bookkeeping. Never returned to callers.
pub const INTERNAL_FIELDS: &[&str] = &["processed_features"];

/// Patient measurements submitted for classification.
///
/// Values are kept as JSON numbers, so the predictor receives the same numeric
/// value with its integer/float kind preserved (`52` stays `52`, `1.0` stays
/// `1.0`). Spelling is normalized: `5.2e1` arrives as `52.0`. Field order here
/// is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Age in years.
    pub age: Number,
    /// 0: female, 1: male.
    pub sex: Number,
    /// Chest pain type (0-3).
    pub cp: Number,
    /// Resting blood pressure in mm/Hg.
    pub trestbps: Number,
    /// Serum cholesterol in mg/dl.
    pub chol: Number,
    /// Fasting blood sugar > 120 mg/dl.
    pub fbs: Number,
    /// Resting ECG results (0-2).
    pub restecg: Number,
    /// Maximum heart rate achieved.
    pub thalach: Number,
    /// Exercise induced angina.
    pub exang: Number,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: Number,
    /// Slope of the peak exercise ST segment (0-2).
    pub slope: Number,
    /// Major vessels colored by fluoroscopy (0-3).
    pub ca: Number,
    /// Thalassemia (1-3).
    pub thal: Number,
}

impl PredictionRequest {
    /// Canonical JSON handed to the predictor as its only argument.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Disease stage reported alongside a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "No Disease")]
    NoDisease,
    #[serde(rename = "Early Stage")]
    EarlyStage,
    #[serde(rename = "Medium Stage")]
    MediumStage,
    #[serde(rename = "Critical Stage")]
    CriticalStage,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::NoDisease,
        Classification::EarlyStage,
        Classification::MediumStage,
        Classification::CriticalStage,
    ];

    /// Label the reference model attaches to a target and its probability.
    pub fn from_prediction(prediction: u8, probability: f64) -> Self {
        if prediction == 0 {
            Classification::NoDisease
        } else if probability < 0.4 {
            Classification::EarlyStage
        } else if probability < 0.7 {
            Classification::MediumStage
        } else {
            Classification::CriticalStage
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::NoDisease => "No Disease",
            Classification::EarlyStage => "Early Stage",
            Classification::MediumStage => "Medium Stage",
            Classification::CriticalStage => "Critical Stage",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predictor output with internal fields removed.
///
/// Holds the predictor's JSON object as-is so keys this gateway does not know
/// about still reach the caller. Typed accessors cover the documented fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionResult(Map<String, Value>);

impl PredictionResult {
    /// Wrap a predictor object, dropping [`INTERNAL_FIELDS`].
    pub fn from_output(mut object: Map<String, Value>) -> Self {
        for field in INTERNAL_FIELDS {
            object.remove(*field);
        }
        Self(object)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some("success")
    }

    pub fn prediction(&self) -> Option<u8> {
        self.0
            .get("prediction")
            .and_then(Value::as_u64)
            .and_then(|p| u8::try_from(p).ok())
    }

    /// Probability of disease. Only meaningful for successful results.
    pub fn probability(&self) -> Option<f64> {
        if !self.is_success() {
            return None;
        }
        self.0.get("probability").and_then(Value::as_f64)
    }

    pub fn classification(&self) -> Option<Classification> {
        self.0
            .get("classification")
            .and_then(Value::as_str)
            .and_then(Classification::parse)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> PredictionRequest {
        serde_json::from_value(json!({
            "age": 52, "sex": 1, "cp": 0, "trestbps": 125, "chol": 212,
            "fbs": 0, "restecg": 1, "thalach": 168, "exang": 0,
            "oldpeak": 1.0, "slope": 2, "ca": 2, "thal": 3
        }))
        .unwrap()
    }

    #[test]
    fn canonical_json_keeps_number_forms_and_order() {
        let json = sample_request().to_canonical_json().unwrap();
        assert_eq!(
            json,
            r#"{"age":52,"sex":1,"cp":0,"trestbps":125,"chol":212,"fbs":0,"restecg":1,"thalach":168,"exang":0,"oldpeak":1.0,"slope":2,"ca":2,"thal":3}"#
        );
    }

    #[test]
    fn exponent_notation_is_normalized_as_float() {
        let mut value = serde_json::to_value(sample_request()).unwrap();
        value["age"] = serde_json::from_str("5.2e1").unwrap();
        let request: PredictionRequest = serde_json::from_value(value).unwrap();

        let json = request.to_canonical_json().unwrap();
        assert!(json.starts_with(r#"{"age":52.0,"#), "{}", json);
    }

    #[test]
    fn request_missing_field_is_rejected() {
        let err = serde_json::from_value::<PredictionRequest>(json!({"age": 52}));
        assert!(err.is_err());
    }

    #[test]
    fn request_rejects_non_numeric_values() {
        let mut value = serde_json::to_value(sample_request()).unwrap();
        value["chol"] = json!("212");
        assert!(serde_json::from_value::<PredictionRequest>(value).is_err());
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(Classification::from_prediction(0, 0.95), Classification::NoDisease);
        assert_eq!(Classification::from_prediction(1, 0.39), Classification::EarlyStage);
        assert_eq!(Classification::from_prediction(1, 0.4), Classification::MediumStage);
        assert_eq!(Classification::from_prediction(1, 0.69), Classification::MediumStage);
        assert_eq!(Classification::from_prediction(1, 0.7), Classification::CriticalStage);
    }

    #[test]
    fn classification_labels_round_trip() {
        for c in Classification::ALL {
            assert_eq!(Classification::parse(c.as_str()), Some(c));
            assert_eq!(serde_json::to_value(c).unwrap(), json!(c.as_str()));
        }
        assert_eq!(Classification::parse("Late Stage"), None);
    }

    #[test]
    fn result_strips_internal_fields() {
        let object = json!({
            "status": "success",
            "prediction": 1,
            "probability": 0.89,
            "classification": "Critical Stage",
            "processed_features": [[0.1, 0.2]]
        });
        let Value::Object(map) = object else { unreachable!() };

        let result = PredictionResult::from_output(map);
        assert!(!result.as_map().contains_key("processed_features"));
        assert!(result.is_success());
        assert_eq!(result.prediction(), Some(1));
        assert_eq!(result.probability(), Some(0.89));
        assert_eq!(result.classification(), Some(Classification::CriticalStage));
    }

    #[test]
    fn probability_hidden_unless_success() {
        let Value::Object(map) = json!({"status": "error", "probability": 0.5}) else {
            unreachable!()
        };
        let result = PredictionResult::from_output(map);
        assert_eq!(result.probability(), None);
    }
}
