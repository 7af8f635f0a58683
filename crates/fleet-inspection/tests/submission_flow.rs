mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::*;
use fleet_inspection::inspection::{Checklist, FormType, SharedSession, ValidationError};
use fleet_inspection::submission::{
    Phase, RelayTransport, Route, RoutedTransport, SubmissionError, SubmissionOrchestrator,
    TransportError, TransportRoutes, WebhookTransport,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn completed_monitor_is_delivered_with_its_annotations() {
    let checklist = completed_monitor(operator_session());
    assert_eq!(checklist.validate(), None);

    let (recorder, transport) = shared(RecordingTransport::default());
    let mut orchestrator = SubmissionOrchestrator::new(transport);
    let mut checklist = checklist;

    orchestrator.request_submit(&checklist).expect("valid monitor");
    let receipt = orchestrator
        .confirm(&mut checklist)
        .await
        .expect("delivered");

    let payloads = recorder.payloads();
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.form_type, FormType::Monitor);
    assert_eq!(payload.numero_identifiant, "0042");
    assert_eq!(payload.point_de_service.as_deref(), Some("Sainte-Adèle"));
    assert!(payload.html_content.contains("0042"));
    assert!(payload.html_content.contains("(Expiration: 06/27)"));
    assert!(payload.html_content.contains("(Expiration: 11/26)"));
    assert!(payload.file_name.starts_with("verification-moniteur_0042_"));
    assert_eq!(receipt.file_name, payload.file_name);
    assert_eq!(receipt.delivery_id.as_deref(), Some("fake-1"));
}

#[tokio::test]
async fn missing_electrode_date_blocks_submission() {
    let mut checklist = completed_monitor(operator_session());
    checklist
        .set_auxiliary("electrodes-pediatrique", "")
        .expect("cleared");

    let (recorder, transport) = shared(RecordingTransport::default());
    let mut orchestrator = SubmissionOrchestrator::new(transport);
    let error = orchestrator
        .request_submit(&checklist)
        .expect_err("blocked");

    assert!(matches!(
        error,
        SubmissionError::Validation(ValidationError::MissingAuxiliary { .. })
    ));
    assert!(error
        .to_string()
        .contains("Électrodes de défibrillation pédiatrique"));
    assert_eq!(orchestrator.phase(), Phase::Idle);
    assert!(orchestrator.confirm(&mut checklist).await.is_err());
    assert!(recorder.payloads().is_empty());
}

#[tokio::test]
async fn relay_rejection_is_reported_and_state_is_kept() {
    let relay = Router::new().route(
        "/api/send-inspection",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "quota exceeded" })),
            )
        }),
    );
    let base = spawn_stand_in(relay).await;
    let transport = Arc::new(RelayTransport::new(
        reqwest::Client::new(),
        format!("{base}/api/send-inspection"),
    ));

    let mut checklist = completed_monitor(operator_session());
    let before = checklist.items().to_vec();
    let mut orchestrator = SubmissionOrchestrator::new(transport);

    orchestrator.request_submit(&checklist).expect("valid");
    let error = orchestrator
        .confirm(&mut checklist)
        .await
        .expect_err("relay refuses");

    let message = error.to_string();
    assert!(message.starts_with("Échec de l'envoi: "));
    assert!(message.contains("quota exceeded"));
    assert!(matches!(
        error,
        SubmissionError::Transport(TransportError::Rejected { status: 500, .. })
    ));
    assert_eq!(checklist.items(), before.as_slice());
    assert_eq!(
        checklist.identifier(&checklist.session().snapshot()),
        "0042"
    );
}

#[tokio::test]
async fn relay_transport_sends_envelope_and_reads_ack() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let captured = seen.clone();
    let relay = Router::new().route(
        "/api/send-inspection",
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                captured.lock().expect("capture mutex poisoned").push(body);
                Json(json!({ "success": true, "id": "email_77" }))
            }
        }),
    );
    let base = spawn_stand_in(relay).await;
    let routes = TransportRoutes::default().with_route(
        FormType::Monitor,
        Route::Relay(format!("{base}/api/send-inspection")),
    );
    let transport = Arc::new(RoutedTransport::new(reqwest::Client::new(), routes));

    let mut checklist = completed_monitor(operator_session());
    let mut orchestrator = SubmissionOrchestrator::new(transport);
    orchestrator.request_submit(&checklist).expect("valid");
    let receipt = orchestrator.confirm(&mut checklist).await.expect("sent");

    assert_eq!(receipt.delivery_id.as_deref(), Some("email_77"));
    let bodies = seen.lock().expect("capture mutex poisoned").clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["formType"], "monitor");
    assert_eq!(bodies[0]["payload"]["numeroIdentifiant"], "0042");
    assert_eq!(bodies[0]["payload"]["mimeType"], "text/html");
}

#[tokio::test]
async fn webhook_failure_carries_response_body() {
    let hook = Router::new().route(
        "/hook",
        post(|| async { (StatusCode::BAD_GATEWAY, "scenario paused") }),
    );
    let base = spawn_stand_in(hook).await;
    let transport = Arc::new(WebhookTransport::new(
        reqwest::Client::new(),
        format!("{base}/hook"),
    ));

    let mut checklist = completed_monitor(operator_session());
    let mut orchestrator = SubmissionOrchestrator::new(transport);
    orchestrator.request_submit(&checklist).expect("valid");
    let error = orchestrator
        .confirm(&mut checklist)
        .await
        .expect_err("webhook refuses");

    assert_eq!(error.to_string(), "Échec de l'envoi: scenario paused");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let transport = Arc::new(RelayTransport::new(
        reqwest::Client::new(),
        format!("http://{addr}/api/send-inspection"),
    ));
    let mut checklist = completed_monitor(operator_session());
    let mut orchestrator = SubmissionOrchestrator::new(transport);
    orchestrator.request_submit(&checklist).expect("valid");

    let error = orchestrator
        .confirm(&mut checklist)
        .await
        .expect_err("nothing listening");
    assert!(matches!(
        error,
        SubmissionError::Transport(TransportError::Network(_))
    ));
}

#[test]
fn defect_comments_are_escaped_in_the_report() {
    let mut checklist = Checklist::new(FormType::Mechanical, operator_session());
    checklist.toggle("freins1-A").expect("defective");
    checklist
        .set_comment("freins1-A", "<script>alert(1)</script>")
        .expect("comment");

    let html = checklist.render(
        chrono::NaiveDate::from_ymd_opt(2025, 1, 9)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid timestamp"),
    );

    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

const MAJOR_BANNER: &str = "class=\"banner banner-major\"";
const MINOR_BANNER: &str = "class=\"banner banner-minor\"";

#[test]
fn mechanical_banners_follow_seeded_severity() {
    let at = chrono::NaiveDate::from_ymd_opt(2025, 1, 9)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("valid timestamp");

    let mut checklist = Checklist::new(FormType::Mechanical, SharedSession::new());
    checklist.toggle("pneus9-1").expect("minor defect");
    checklist.toggle("autre-defectuosite").expect("unclassified");
    let html = checklist.render(at);
    assert!(html.contains(MINOR_BANNER));
    assert!(!html.contains(MAJOR_BANNER));

    checklist.toggle("pneus9-A").expect("major defect");
    let html = checklist.render(at);
    assert!(!html.contains(MINOR_BANNER));
    let banner_start = html.find(MAJOR_BANNER).expect("major banner");
    let banner_end = banner_start + html[banner_start..].find("</div>").expect("banner closes");
    let banner = &html[banner_start..banner_end];
    assert!(banner.contains("Écrou de roue manquant ou desserré"));
    assert!(!banner.contains("Autre défectuosité"));
}
