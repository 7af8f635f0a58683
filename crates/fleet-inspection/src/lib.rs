//! Equipment inspection checklists for field technicians.
//!
//! The [`inspection`] module holds checklist state, validation and report
//! rendering; [`submission`] packages a completed checklist and hands it to a
//! transport; [`relay`] is the HTTP endpoint that forwards reports to the
//! email provider.

pub mod config;
pub mod error;
pub mod inspection;
pub mod relay;
pub mod submission;
pub mod telemetry;
