#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use fleet_inspection::inspection::{Checklist, FormType, SharedSession};
use fleet_inspection::submission::{Delivery, SubmissionPayload, Transport, TransportError};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stand_in(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stand-in listener");
    let addr = listener.local_addr().expect("stand-in address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stand-in server runs");
    });
    format!("http://{addr}")
}

pub fn operator_session() -> SharedSession {
    let session = SharedSession::new();
    session.set_matricule("N-0100");
    session.set_vehicle_number("9123");
    session
        .set_service_point("Sainte-Adèle")
        .expect("known service point");
    session
}

/// Monitor checklist with every item verified and every field filled.
pub fn completed_monitor(session: SharedSession) -> Checklist {
    let mut checklist = Checklist::new(FormType::Monitor, session);
    let ids: Vec<String> = checklist
        .items()
        .iter()
        .map(|item| item.id.clone())
        .collect();
    for id in ids {
        checklist.toggle(&id).expect("item toggles");
    }
    checklist
        .set_auxiliary("electrodes-adulte", "0627")
        .expect("adult electrodes date");
    checklist
        .set_auxiliary("electrodes-pediatrique", "11/26")
        .expect("pediatric electrodes date");
    checklist
        .set_auxiliary("numero-moniteur", "0042")
        .expect("monitor number");
    checklist
}

/// Records payloads and answers with a fixed delivery.
#[derive(Default)]
pub struct RecordingTransport {
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingTransport {
    pub fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads
            .lock()
            .expect("transport mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<Delivery, TransportError> {
        self.payloads
            .lock()
            .expect("transport mutex poisoned")
            .push(payload.clone());
        Ok(Delivery {
            id: Some("fake-1".to_string()),
        })
    }
}

pub fn shared<T: Transport + 'static>(transport: T) -> (Arc<T>, Arc<dyn Transport>) {
    let transport = Arc::new(transport);
    let dynamic: Arc<dyn Transport> = transport.clone();
    (transport, dynamic)
}
