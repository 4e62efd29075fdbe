//! Reference cases with their expected classifications.

use serde_json::json;

use crate::predictor::types::{Classification, PredictionRequest};

/// A known patient record and the label the reference model gives it.
#[derive(Debug, Clone)]
pub struct SampleCase {
    pub description: &'static str,
    pub request: PredictionRequest,
    pub expected: Classification,
}

/// Sample cases served to clients for smoke testing.
pub fn sample_cases() -> Vec<SampleCase> {
    let cases = [
        (
            "Sample case 1 - No Disease",
            json!({
                "age": 52, "sex": 1, "cp": 0, "trestbps": 125, "chol": 212,
                "fbs": 0, "restecg": 1, "thalach": 168, "exang": 0,
                "oldpeak": 1.0, "slope": 2, "ca": 2, "thal": 3
            }),
            Classification::NoDisease,
        ),
        (
            "Sample case 2 - Critical Stage",
            json!({
                "age": 61, "sex": 1, "cp": 2, "trestbps": 148, "chol": 203,
                "fbs": 1, "restecg": 1, "thalach": 161, "exang": 0,
                "oldpeak": 2.1, "slope": 2, "ca": 1, "thal": 3
            }),
            Classification::CriticalStage,
        ),
    ];

    cases
        .into_iter()
        .filter_map(|(description, value, expected)| {
            serde_json::from_value(value)
                .ok()
                .map(|request| SampleCase {
                    description,
                    request,
                    expected,
                })
        })
        .collect()
}
