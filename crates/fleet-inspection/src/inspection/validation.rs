use super::checklist::{AuxiliaryKind, Checklist};
use super::domain::ChecklistItem;
use super::sanitize;
use super::session::SessionContext;

/// Number of item labels listed in an aggregated message.
const AGGREGATE_LIMIT: usize = 5;

/// First rule a checklist breaks before it can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Veuillez vérifier l'élément suivant : {label}")]
    ItemNotVerified { label: String },
    #[error("Veuillez ajouter un commentaire pour la défectuosité : {label}")]
    MissingComment { label: String },
    #[error("{}", describe_unverified(.labels, .remaining))]
    ItemsNotInspected {
        labels: Vec<String>,
        remaining: usize,
    },
    #[error("Veuillez entrer {what} pour : {label}")]
    MissingAuxiliary { what: &'static str, label: String },
    #[error("Date d'expiration invalide pour {label} ({value}), format attendu MM/AA")]
    InvalidExpiration { label: String, value: String },
    #[error("Veuillez entrer votre matricule")]
    MissingMatricule,
    #[error("Veuillez entrer le {0}")]
    MissingIdentifier(&'static str),
    #[error("Veuillez sélectionner le point de service")]
    MissingServicePoint,
}

fn describe_unverified(labels: &[String], remaining: &usize) -> String {
    let mut message = format!(
        "Veuillez indiquer conforme ou défectueux pour : {}",
        labels.join(", ")
    );
    if *remaining > 0 {
        message.push_str(&format!(" et {remaining} autre(s)"));
    }
    message
}

/// Verification forms stop at the first item left unchecked.
pub(crate) fn first_unverified(items: &[ChecklistItem]) -> Option<ValidationError> {
    items
        .iter()
        .filter(|item| !item.disabled)
        .find(|item| !item.is_terminal())
        .map(|item| ValidationError::ItemNotVerified {
            label: item.label.clone(),
        })
}

/// Mechanical form lists up to five unanswered items at once, then asks for
/// comments on defects.
pub(crate) fn aggregate_uninspected(items: &[ChecklistItem]) -> Option<ValidationError> {
    let pending: Vec<&ChecklistItem> = items
        .iter()
        .filter(|item| !item.disabled && !item.is_defective() && !item.is_conform())
        .collect();

    if !pending.is_empty() {
        let labels = pending
            .iter()
            .take(AGGREGATE_LIMIT)
            .map(|item| item.label.clone())
            .collect();
        return Some(ValidationError::ItemsNotInspected {
            labels,
            remaining: pending.len().saturating_sub(AGGREGATE_LIMIT),
        });
    }

    items
        .iter()
        .filter(|item| !item.disabled)
        .find(|item| !item.is_terminal())
        .map(|item| ValidationError::MissingComment {
            label: item.label.clone(),
        })
}

pub(crate) fn required_auxiliary(checklist: &Checklist) -> Option<ValidationError> {
    for field in checklist.auxiliary_fields() {
        if !field.required || field.kind == AuxiliaryKind::UnitNumber {
            continue;
        }

        if checklist.item(field.key).is_some_and(|item| item.disabled) {
            continue;
        }

        let value = checklist.auxiliary_value(field).unwrap_or_default();
        if value.trim().is_empty() {
            return Some(ValidationError::MissingAuxiliary {
                what: field.kind.describe(),
                label: field.label.to_string(),
            });
        }

        if field.kind == AuxiliaryKind::Expiration && !sanitize::is_valid_expiration(value) {
            return Some(ValidationError::InvalidExpiration {
                label: field.label.to_string(),
                value: value.to_string(),
            });
        }
    }
    None
}

pub(crate) fn identifying_fields(
    checklist: &Checklist,
    session: &SessionContext,
) -> Option<ValidationError> {
    if session.matricule.trim().is_empty() {
        return Some(ValidationError::MissingMatricule);
    }
    if checklist.identifier(session).trim().is_empty() {
        return Some(ValidationError::MissingIdentifier(
            checklist.definition().identifier_label,
        ));
    }

    if session.service_point.is_none() {
        return Some(ValidationError::MissingServicePoint);
    }

    None
}
