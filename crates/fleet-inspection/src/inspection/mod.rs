//! Checklist state, validation and report rendering for every inspection form.

mod checklist;
pub mod domain;
mod forms;
pub mod report;
pub mod sanitize;
mod session;
mod validation;

pub use checklist::{AuxiliaryField, AuxiliaryKind, Checklist};
pub use domain::{
    ChecklistItem, FormType, InspectionError, ItemCheck, ServicePoint, Severity,
};
pub use forms::{FormDefinition, IdentifierSource, ValidationMode};
pub use session::{SessionContext, SharedSession};
pub use validation::ValidationError;
