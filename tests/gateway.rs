//! End-to-end tests: real HTTP, real child processes.
#![cfg(unix)]

use heart_risk_gateway::config::{GatewayConfig, LaunchSpec};
use heart_risk_sdk::{ClientError, GatewayClient};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

mod common;

use common::{client, fixed_output, sample_request, shell, start_gateway, start_gateway_with};

#[tokio::test]
async fn sample_request_end_to_end() {
    let gateway = start_gateway(vec![fixed_output(&json!({
        "status": "success",
        "prediction": 0,
        "probability": 0.34,
        "classification": "No Disease",
        "processed_features": [[0.12, 1, 0, -0.4]]
    }))])
    .await;

    let res = client()
        .post(format!("{}/api/predict", gateway.base_url))
        .json(&sample_request())
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "success",
            "prediction": 0,
            "probability": 0.34,
            "classification": "No Disease"
        })
    );
}

#[tokio::test]
async fn predictor_receives_request_verbatim() {
    // Echo the argument back so the response shows what the predictor saw.
    let gateway = start_gateway(vec![shell(r#"printf '%s' "$1""#)]).await;

    let res = client()
        .post(format!("{}/api/predict", gateway.base_url))
        .json(&sample_request())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, sample_request());
    assert!(body["oldpeak"].is_f64());
    assert!(body["age"].is_u64());
}

#[tokio::test]
async fn missing_runtime_falls_back_to_next_candidate() {
    let gateway = start_gateway(vec![
        LaunchSpec::new("heart-risk-no-such-python", ["predict.py"]),
        fixed_output(&json!({
            "status": "success",
            "prediction": 1,
            "probability": 0.89,
            "classification": "Critical Stage"
        })),
    ])
    .await;

    let sdk = GatewayClient::new(&gateway.base_url);
    let prediction = sdk.predict(&sample_request()).await.unwrap();
    assert_eq!(prediction.prediction, 1);
    assert_eq!(prediction.classification, "Critical Stage");
}

#[tokio::test]
async fn failure_categories_reach_the_caller() {
    let cases = [
        (
            vec![shell("echo 'model not loaded' >&2; exit 1")],
            "ExecutionFailure",
            Some("model not loaded"),
        ),
        (
            vec![shell("exit 2")],
            "ExecutionFailure",
            Some("Process exited with code 2"),
        ),
        (
            vec![shell(r#"printf '{"status": "success", "predic'"#)],
            "MalformedOutput",
            None,
        ),
        (
            vec![LaunchSpec::new("heart-risk-no-such-python", ["predict.py"])],
            "SpawnFailure",
            None,
        ),
    ];

    for (candidates, category, details) in cases {
        let gateway = start_gateway(candidates).await;
        let sdk = GatewayClient::new(&gateway.base_url);

        match sdk.predict(&sample_request()).await {
            Err(ClientError::Gateway { status, envelope }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(envelope.status, "error");
                assert_eq!(envelope.message, category);
                if let Some(details) = details {
                    assert_eq!(envelope.details, details);
                }
            }
            other => panic!("expected {} envelope, got {:?}", category, other),
        }
    }
}

#[tokio::test]
async fn failed_invocation_leaves_server_healthy() {
    let gateway = start_gateway(vec![shell("kill -9 $$")]).await;
    let sdk = GatewayClient::new(&gateway.base_url);

    for _ in 0..3 {
        let err = sdk.predict(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Gateway { .. }), "{:?}", err);
    }

    let status = sdk.status().await.unwrap();
    assert_eq!(status.status, "operational");
}

#[tokio::test]
async fn wrong_method_and_preflight() {
    let gateway = start_gateway(vec![shell("exit 99")]).await;
    let url = format!("{}/api/predict", gateway.base_url);
    let http = client();

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let res = http.request(method.clone(), &url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }

    for path in ["/api/predict", "/some/other/route"] {
        let res = http
            .request(Method::OPTIONS, format!("{}{}", gateway.base_url, path))
            .header("Origin", "http://localhost:5173")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["access-control-allow-credentials"], "true");
        assert_eq!(
            res.headers()["access-control-allow-methods"],
            "GET,OPTIONS,PATCH,DELETE,POST,PUT"
        );
        assert!(res.text().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn identical_requests_give_identical_bodies() {
    let gateway = start_gateway(vec![fixed_output(&json!({
        "status": "success",
        "prediction": 1,
        "probability": 0.55,
        "classification": "Medium Stage",
        "processed_features": [1, 2, 3]
    }))])
    .await;

    let http = client();
    let url = format!("{}/api/predict", gateway.base_url);
    let first = http.post(&url).json(&sample_request()).send().await.unwrap().text().await.unwrap();
    let second = http.post(&url).json(&sample_request()).send().await.unwrap().text().await.unwrap();

    assert_eq!(first, second);
    assert!(!first.contains("processed_features"));
}

#[tokio::test]
async fn concurrent_invocations_are_independent() {
    // Each response echoes its own request's age.
    let gateway = start_gateway(vec![shell(
        r#"sleep 0.2; printf '{"status":"success","echo":%s}' "$1""#,
    )])
    .await;

    let http = client();
    let url = format!("{}/api/predict", gateway.base_url);
    let tasks: Vec<_> = (0..8)
        .map(|age| {
            let http = http.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let mut request = sample_request();
                request["age"] = json!(40 + age);
                let body: Value = http.post(&url).json(&request).send().await.unwrap().json().await.unwrap();
                (40 + age, body)
            })
        })
        .collect();

    for task in tasks {
        let (age, body) = task.await.unwrap();
        assert_eq!(body["echo"]["age"], json!(age));
    }
}

#[tokio::test]
async fn clients_follow_configured_routes() {
    let mut config = GatewayConfig::default();
    config.predictor.candidates = vec![fixed_output(&json!({
        "status": "success",
        "prediction": 0,
        "probability": 0.12,
        "classification": "No Disease"
    }))];
    config.routes.predict_path = "/v2/heart/predict".to_string();
    config.routes.status_path = "/v2/heart/status".to_string();
    let gateway = start_gateway_with(config).await;

    let default_routes = GatewayClient::new(&gateway.base_url);
    assert!(matches!(
        default_routes.status().await,
        Err(ClientError::Unexpected { status: StatusCode::NOT_FOUND, .. })
    ));

    let sdk = GatewayClient::new(&gateway.base_url)
        .with_predict_path("/v2/heart/predict")
        .with_status_path("/v2/heart/status");
    let prediction = sdk.predict(&sample_request()).await.unwrap();
    assert_eq!(prediction.probability, 0.12);
    assert_eq!(sdk.status().await.unwrap().status, "operational");
}
