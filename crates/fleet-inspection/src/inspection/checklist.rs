use super::domain::{ChecklistItem, FormType, InspectionError, ItemCheck};
use super::forms::{FormDefinition, IdentifierSource, ValidationMode};
use super::sanitize;
use super::session::{SessionContext, SharedSession};
use super::validation::{self, ValidationError};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// How an auxiliary input is masked and where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxiliaryKind {
    /// `MM/YY`, stored on the item's `expire_date`.
    Expiration,
    /// Cylinder pressure, stored on the item's `value`.
    Psi,
    /// Glucometer control reading, stored on the item's `value`.
    Glucose,
    /// Counted stock, stored on the item's `value`.
    Quantity,
    /// Unit identifier owned by the checklist rather than the session.
    UnitNumber,
}

impl AuxiliaryKind {
    pub fn sanitize(self, raw: &str) -> String {
        match self {
            Self::Expiration => sanitize::expiration(raw),
            Self::Psi => sanitize::digits_only(raw, 4),
            Self::Glucose => sanitize::decimal(raw, 5),
            Self::Quantity => sanitize::digits_only(raw, 3),
            Self::UnitNumber => sanitize::digits_only(raw, 6),
        }
    }

    pub(crate) const fn describe(self) -> &'static str {
        match self {
            Self::Expiration => "la date d'expiration",
            Self::Psi => "la pression (PSI)",
            Self::Glucose => "la lecture de glycémie",
            Self::Quantity => "la quantité",
            Self::UnitNumber => "le numéro d'unité",
        }
    }
}

/// Input attached to a form; item-bound kinds use the item id as key.
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: AuxiliaryKind,
    pub required: bool,
}

/// Mutable state of one checklist screen.
#[derive(Debug)]
pub struct Checklist {
    definition: &'static FormDefinition,
    session: SharedSession,
    items: Vec<ChecklistItem>,
    identifiers: BTreeMap<&'static str, String>,
}

impl Checklist {
    pub fn new(form: FormType, session: SharedSession) -> Self {
        let definition = form.definition();
        Self {
            definition,
            session,
            items: (definition.seed)(),
            identifiers: BTreeMap::new(),
        }
    }

    pub fn form(&self) -> FormType {
        self.definition.form
    }

    pub fn definition(&self) -> &'static FormDefinition {
        self.definition
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn auxiliary_fields(&self) -> &'static [AuxiliaryField] {
        self.definition.auxiliary
    }

    fn item_mut(&mut self, item_id: &str) -> Result<&mut ChecklistItem, InspectionError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| InspectionError::ItemNotFound(item_id.to_owned()))?;

        if item.disabled {
            return Err(InspectionError::ItemDisabled(item_id.to_owned()));
        }
        Ok(item)
    }

    /// Flip the item's primary flag: `verified`, or `defective` on the
    /// mechanical form. A cleared defect loses its comment.
    pub fn toggle(&mut self, item_id: &str) -> Result<&ChecklistItem, InspectionError> {
        let item = self.item_mut(item_id)?;
        match item.check {
            ItemCheck::Verification { verified } => {
                item.check = ItemCheck::Verification {
                    verified: !verified,
                };
            }
            ItemCheck::Inspection { defective, conform } => {
                let defective = !defective;
                item.check = ItemCheck::Inspection {
                    defective,
                    conform: conform && !defective,
                };
                if !defective {
                    item.comment = None;
                }
            }
        }
        Ok(item)
    }

    /// Flip `conform` on a mechanical item; a conform item carries no defect.
    pub fn toggle_conform(&mut self, item_id: &str) -> Result<&ChecklistItem, InspectionError> {
        let form = self.form();
        let item = self.item_mut(item_id)?;
        let ItemCheck::Inspection { defective, conform } = item.check else {
            return Err(InspectionError::UnsupportedOperation(form));
        };

        let conform = !conform;
        item.check = ItemCheck::Inspection {
            defective: defective && !conform,
            conform,
        };
        if conform {
            item.comment = None;
        }
        Ok(item)
    }

    pub fn set_comment(&mut self, item_id: &str, text: &str) -> Result<(), InspectionError> {
        let item = self.item_mut(item_id)?;
        if !item.is_defective() {
            return Err(InspectionError::CommentWithoutDefect(item_id.to_owned()));
        }
        item.comment = Some(text.to_string());
        Ok(())
    }

    /// Mark every applicable item of a category as done, returning how many
    /// changed. On the mechanical form this marks items conform, which
    /// clears any recorded defect and its comment.
    pub fn mark_category_done(&mut self, category: &str) -> usize {
        let mut changed = 0;
        for item in self
            .items
            .iter_mut()
            .filter(|item| !item.disabled && item.category.as_deref() == Some(category))
        {
            let next = match item.check {
                ItemCheck::Verification { .. } => ItemCheck::Verification { verified: true },
                ItemCheck::Inspection { .. } => ItemCheck::Inspection {
                    defective: false,
                    conform: true,
                },
            };
            if item.check != next {
                item.check = next;
                changed += 1;
            }
            if item.is_conform() {
                item.comment = None;
            }
        }
        changed
    }

    /// Sanitize and store an auxiliary input, returning the stored value.
    pub fn set_auxiliary(&mut self, key: &str, raw: &str) -> Result<String, InspectionError> {
        let field = self
            .definition
            .auxiliary
            .iter()
            .find(|field| field.key == key)
            .ok_or_else(|| InspectionError::UnknownField(key.to_owned()))?;

        let value = field.kind.sanitize(raw);
        let stored = if value.is_empty() {
            None
        } else {
            Some(value.clone())
        };

        match field.kind {
            AuxiliaryKind::UnitNumber => match stored {
                Some(value) => {
                    self.identifiers.insert(field.key, value);
                }
                None => {
                    self.identifiers.remove(field.key);
                }
            },
            AuxiliaryKind::Expiration => self.item_mut(field.key)?.expire_date = stored,
            AuxiliaryKind::Psi | AuxiliaryKind::Glucose | AuxiliaryKind::Quantity => {
                self.item_mut(field.key)?.value = stored
            }
        }

        Ok(value)
    }

    pub fn auxiliary_value(&self, field: &AuxiliaryField) -> Option<&str> {
        match field.kind {
            AuxiliaryKind::UnitNumber => self.identifiers.get(field.key).map(String::as_str),
            AuxiliaryKind::Expiration => self.item(field.key)?.expire_date.as_deref(),
            AuxiliaryKind::Psi | AuxiliaryKind::Glucose | AuxiliaryKind::Quantity => {
                self.item(field.key)?.value.as_deref()
            }
        }
    }

    /// Unit identifier reported for this checklist.
    pub fn identifier(&self, session: &SessionContext) -> String {
        match self.definition.identifier {
            IdentifierSource::VehicleNumber => session.vehicle_number.clone(),
            IdentifierSource::Field(key) => self.identifiers.get(key).cloned().unwrap_or_default(),
        }
    }

    /// First rule the checklist currently breaks, if any.
    pub fn validate(&self) -> Option<ValidationError> {
        let session = self.session.snapshot();
        let items_rule = match self.definition.validation {
            ValidationMode::FirstFailure => validation::first_unverified(&self.items),
            ValidationMode::AggregateUninspected => {
                validation::aggregate_uninspected(&self.items)
            }
        };

        items_rule
            .or_else(|| validation::required_auxiliary(self))
            .or_else(|| validation::identifying_fields(self, &session))
    }

    /// Render the standalone HTML report for the current state.
    pub fn render(&self, submitted_at: NaiveDateTime) -> String {
        let session = self.session.snapshot();
        (self.definition.render)(self, &session, submitted_at)
    }

    /// Drop every checklist-owned input; shared session fields are untouched.
    pub fn reset(&mut self) {
        self.items = (self.definition.seed)();
        self.identifiers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mechanical() -> Checklist {
        Checklist::new(FormType::Mechanical, SharedSession::new())
    }

    #[test]
    fn defect_and_conform_are_mutually_exclusive() {
        let mut checklist = mechanical();

        checklist.toggle_conform("pneus9-A").expect("conform");
        let item = checklist.toggle("pneus9-A").expect("defective");
        assert!(item.is_defective());
        assert!(!item.is_conform());

        checklist
            .set_comment("pneus9-A", "Écrou manquant")
            .expect("comment on defect");
        let item = checklist.toggle_conform("pneus9-A").expect("conform again");
        assert!(item.is_conform());
        assert!(!item.is_defective());
        assert!(item.comment.is_none());
    }

    #[test]
    fn clearing_defect_clears_comment() {
        let mut checklist = mechanical();
        checklist.toggle("freins1-A").expect("defective");
        checklist
            .set_comment("freins1-A", "Pédale molle")
            .expect("comment");

        let item = checklist.toggle("freins1-A").expect("cleared");
        assert!(!item.is_defective());
        assert!(item.comment.is_none());
    }

    #[test]
    fn comment_requires_defect() {
        let mut checklist = mechanical();
        assert!(matches!(
            checklist.set_comment("freins1-A", "rien"),
            Err(InspectionError::CommentWithoutDefect(_))
        ));
    }

    #[test]
    fn conform_toggle_is_mechanical_only() {
        let mut checklist = Checklist::new(FormType::Monitor, SharedSession::new());
        assert!(matches!(
            checklist.toggle_conform("moniteur-ecran"),
            Err(InspectionError::UnsupportedOperation(FormType::Monitor))
        ));
    }

    #[test]
    fn bulk_mark_sets_every_item_conform() {
        let mut checklist = mechanical();
        checklist.toggle("pneus1-A").expect("defective");
        checklist
            .set_comment("pneus1-A", "Crevaison")
            .expect("comment");

        let changed = checklist.mark_category_done("Pneus et roues");
        let tyres: Vec<&ChecklistItem> = checklist
            .items()
            .iter()
            .filter(|item| item.category.as_deref() == Some("Pneus et roues"))
            .collect();

        assert_eq!(changed, tyres.len());
        assert!(tyres
            .iter()
            .all(|item| item.is_conform() && !item.is_defective()));
        let flat = checklist.item("pneus1-A").expect("present");
        assert!(flat.comment.is_none());
    }

    #[test]
    fn bulk_mark_skips_disabled_items() {
        let mut checklist = Checklist::new(FormType::MedicalSupply, SharedSession::new());
        let applicable = checklist
            .items()
            .iter()
            .filter(|item| item.category.as_deref() == Some("Immobilisation") && !item.disabled)
            .count();

        let changed = checklist.mark_category_done("Immobilisation");

        assert_eq!(changed, applicable);
        let incubator = checklist.item("incubateur").expect("present");
        assert!(incubator.disabled);
        assert!(!incubator.is_verified());
    }

    #[test]
    fn unknown_and_disabled_items_are_rejected() {
        let mut checklist = Checklist::new(FormType::MedicalSupply, SharedSession::new());
        assert!(matches!(
            checklist.toggle("does-not-exist"),
            Err(InspectionError::ItemNotFound(_))
        ));
        assert!(matches!(
            checklist.toggle("incubateur"),
            Err(InspectionError::ItemDisabled(_))
        ));
        assert!(matches!(
            checklist.set_auxiliary("volume", "12"),
            Err(InspectionError::UnknownField(_))
        ));
    }

    #[test]
    fn auxiliary_inputs_are_sanitized_and_stored_on_items() {
        let mut checklist = Checklist::new(FormType::MedicalSupply, SharedSession::new());

        assert_eq!(
            checklist
                .set_auxiliary("oxygene-principal", "2 000 psi")
                .expect("psi"),
            "2000"
        );
        assert_eq!(
            checklist.set_auxiliary("epinephrine", "0627").expect("date"),
            "06/27"
        );
        assert_eq!(
            checklist.set_auxiliary("glucometre", "5,5").expect("reading"),
            "5.5"
        );

        let oxygen = checklist.item("oxygene-principal").expect("present");
        assert_eq!(oxygen.value.as_deref(), Some("2000"));
        let epinephrine = checklist.item("epinephrine").expect("present");
        assert_eq!(epinephrine.expire_date.as_deref(), Some("06/27"));

        checklist
            .set_auxiliary("oxygene-principal", "psi")
            .expect("cleared");
        assert!(checklist
            .item("oxygene-principal")
            .expect("present")
            .value
            .is_none());
    }

    #[test]
    fn reset_restores_seed_items() {
        let mut checklist = Checklist::new(FormType::Monitor, SharedSession::new());
        checklist.toggle("moniteur-ecran").expect("verified");
        checklist
            .set_auxiliary("numero-moniteur", "0042")
            .expect("unit number");

        checklist.reset();

        assert!(checklist.items().iter().all(|item| !item.is_verified()));
        assert_eq!(checklist.identifier(&SessionContext::default()), "");
    }
}
