use super::common::*;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::relay::provider::{HttpMailProvider, MailProvider};
use crate::relay::router::{relay_router, RelayState};

#[tokio::test]
async fn forwards_report_to_provider() {
    let provider = Arc::new(RecordingProvider::default());
    let router = router_with(provider.clone());
    let request = json!({
        "formType": "monitor",
        "payload": {
            "htmlContent": "<html><head><style>td{color:red}</style></head><body><p>ok</p></body></html>",
            "matricule": "N-0100",
            "pointDeService": "Mirabel",
            "numeroIdentifiant": "0042"
        }
    });

    let response = router
        .oneshot(post_json(request.to_string()))
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "id": "email_123" }));

    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Vérification moniteur défibrillateur - 0042");
    assert_eq!(sent[0].to, vec!["garage@example.com"]);
    assert!(sent[0].html.contains("<style>td{color:red}</style>"));
    assert!(sent[0].html.contains("<p>ok</p>"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let provider = Arc::new(RecordingProvider::default());
    let response = router_with(provider.clone())
        .oneshot(post_json("{not json"))
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(provider.sent().is_empty());
}

#[tokio::test]
async fn missing_form_type_or_payload_is_a_bad_request() {
    for request in [
        json!({ "payload": {} }),
        json!({ "formType": "monitor" }),
        json!({ "formType": "", "payload": {} }),
    ] {
        let provider = Arc::new(RecordingProvider::default());
        let response = router_with(provider.clone())
            .oneshot(post_json(request.to_string()))
            .await
            .expect("router responds");
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "formType et payload sont requis");
        assert!(provider.sent().is_empty());
    }
}

#[tokio::test]
async fn provider_failure_surfaces_its_message() {
    let provider = Arc::new(RecordingProvider::failing("domain not verified"));
    let response = router_with(provider)
        .oneshot(post_json(
            json!({ "formType": "cleaning", "payload": { "numeroVehicule": "9301" } })
                .to_string(),
        ))
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "domain not verified");
}

#[tokio::test]
async fn missing_credential_is_an_internal_error() {
    let mut config = mail_config();
    config.api_key = None;
    let provider: Arc<dyn MailProvider> =
        Arc::new(HttpMailProvider::from_config(reqwest::Client::new(), &config));
    let router = relay_router(RelayState::new(provider, &config));

    let response = router
        .oneshot(post_json(
            json!({ "formType": "mechanical", "payload": {} }).to_string(),
        ))
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("clé API")));
}

#[tokio::test]
async fn numeric_vehicle_number_is_accepted() {
    let provider = Arc::new(RecordingProvider::default());
    let response = router_with(provider.clone())
        .oneshot(post_json(
            json!({
                "formType": "cleaning",
                "payload": { "numeroVehicule": 9301, "matricule": "C-0007" }
            })
            .to_string(),
        ))
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Nettoyage et inventaire mensuel - 9301");
}
