//! Packaging a validated checklist and handing it to a transport.

mod orchestrator;
mod payload;
pub mod transport;

pub use orchestrator::{
    Phase, SubmissionError, SubmissionOrchestrator, SubmissionReceipt, DEFAULT_TIMEOUT,
};
pub use payload::{file_name, SubmissionPayload};
pub use transport::{
    Delivery, RelayTransport, Route, RoutedTransport, Transport, TransportError,
    TransportRoutes, WebhookTransport,
};
