//! HTTP relay that turns an inspection payload into a provider email.
//!
//! The endpoint never retries: a provider failure is reported back to the
//! caller as a 500 carrying the provider's own message when it sent one.

pub mod email;
pub mod provider;
pub mod router;

#[cfg(test)]
mod tests;

pub use email::{InspectionEmail, RelayPayload};
pub use provider::{HttpMailProvider, MailError, MailProvider, OutgoingMail};
pub use router::{relay_router, RelayState, SEND_INSPECTION_PATH};
