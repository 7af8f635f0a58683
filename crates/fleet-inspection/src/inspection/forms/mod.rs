//! Per-form behavior, looked up from the [`FormType`] tag.

mod cleaning;
mod mechanical;
mod medical;
mod monitor;

use super::checklist::{AuxiliaryField, Checklist};
use super::domain::{ChecklistItem, FormType};
use super::session::SessionContext;
use chrono::NaiveDateTime;

/// Where the unit identifier of a form comes from.
#[derive(Debug, Clone, Copy)]
pub enum IdentifierSource {
    /// Vehicle number shared through the session.
    VehicleNumber,
    /// Checklist-owned auxiliary field.
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Report the first item left unchecked.
    FirstFailure,
    /// Report up to five unanswered items in one message.
    AggregateUninspected,
}

/// Static description of one inspection form.
#[derive(Debug)]
pub struct FormDefinition {
    pub form: FormType,
    /// Email subject prefix used by the relay.
    pub subject: &'static str,
    pub file_prefix: &'static str,
    pub identifier_label: &'static str,
    pub identifier: IdentifierSource,
    pub auxiliary: &'static [AuxiliaryField],
    pub validation: ValidationMode,
    pub seed: fn() -> Vec<ChecklistItem>,
    pub render: fn(&Checklist, &SessionContext, NaiveDateTime) -> String,
}

static DEFINITIONS: [FormDefinition; 4] = [
    FormDefinition {
        form: FormType::Monitor,
        subject: "Vérification moniteur défibrillateur",
        file_prefix: "verification-moniteur",
        identifier_label: "numéro de moniteur",
        identifier: IdentifierSource::Field(monitor::UNIT_NUMBER),
        auxiliary: monitor::AUXILIARY,
        validation: ValidationMode::FirstFailure,
        seed: monitor::seed,
        render: monitor::render,
    },
    FormDefinition {
        form: FormType::MedicalSupply,
        subject: "Vérification matériel médical",
        file_prefix: "verification-materiel",
        identifier_label: "numéro de véhicule",
        identifier: IdentifierSource::VehicleNumber,
        auxiliary: medical::AUXILIARY,
        validation: ValidationMode::FirstFailure,
        seed: medical::seed,
        render: medical::render,
    },
    FormDefinition {
        form: FormType::Mechanical,
        subject: "Inspection mécanique",
        file_prefix: "inspection-mecanique",
        identifier_label: "numéro de véhicule",
        identifier: IdentifierSource::VehicleNumber,
        auxiliary: mechanical::AUXILIARY,
        validation: ValidationMode::AggregateUninspected,
        seed: mechanical::seed,
        render: mechanical::render,
    },
    FormDefinition {
        form: FormType::Cleaning,
        subject: "Nettoyage et inventaire mensuel",
        file_prefix: "nettoyage-inventaire",
        identifier_label: "numéro de véhicule",
        identifier: IdentifierSource::VehicleNumber,
        auxiliary: cleaning::AUXILIARY,
        validation: ValidationMode::FirstFailure,
        seed: cleaning::seed,
        render: cleaning::render,
    },
];

impl FormType {
    pub fn definition(self) -> &'static FormDefinition {
        match self {
            Self::Monitor => &DEFINITIONS[0],
            Self::MedicalSupply => &DEFINITIONS[1],
            Self::Mechanical => &DEFINITIONS[2],
            Self::Cleaning => &DEFINITIONS[3],
        }
    }
}
