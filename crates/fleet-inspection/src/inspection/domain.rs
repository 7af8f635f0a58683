use serde::{Deserialize, Serialize};

/// Inspection types handled by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    Monitor,
    MedicalSupply,
    Mechanical,
    Cleaning,
}

impl FormType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Monitor,
            Self::MedicalSupply,
            Self::Mechanical,
            Self::Cleaning,
        ]
    }

    /// Wire tag used in submission payloads and relay requests.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::MedicalSupply => "medical-supply",
            Self::Mechanical => "mechanical",
            Self::Cleaning => "cleaning",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|form| form.tag() == normalized)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monitor => "Vérification du moniteur défibrillateur",
            Self::MedicalSupply => "Vérification du matériel médical",
            Self::Mechanical => "Inspection mécanique - défectuosités",
            Self::Cleaning => "Nettoyage et inventaire mensuel",
        }
    }

    /// Whether items record a found defect rather than a verification.
    pub const fn records_defects(self) -> bool {
        matches!(self, Self::Mechanical)
    }
}

/// Severity of a mechanical defect, fixed in the seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Major,
    Minor,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Major => "Défectuosité majeure",
            Self::Minor => "Défectuosité mineure",
        }
    }
}

/// Check state of an item, named after what `true` means for the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemCheck {
    /// Monitor, medical-supply and cleaning forms: item verified present/working.
    Verification { verified: bool },
    /// Mechanical form: a defect was found, or the item was found conform.
    Inspection { defective: bool, conform: bool },
}

impl ItemCheck {
    pub const fn unchecked_for(form: FormType) -> Self {
        if form.records_defects() {
            Self::Inspection {
                defective: false,
                conform: false,
            }
        } else {
            Self::Verification { verified: false }
        }
    }
}

/// One inspectable line of a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub check: ItemCheck,
    pub comment: Option<String>,
    pub expire_date: Option<String>,
    pub value: Option<String>,
    pub disabled: bool,
    pub severity: Option<Severity>,
}

impl ChecklistItem {
    pub fn new(form: FormType, id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category: None,
            subcategory: None,
            check: ItemCheck::unchecked_for(form),
            comment: None,
            expire_date: None,
            value: None,
            disabled: false,
            severity: None,
        }
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn in_subcategory(mut self, subcategory: &str) -> Self {
        self.subcategory = Some(subcategory.to_string());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.check, ItemCheck::Verification { verified: true })
    }

    pub fn is_defective(&self) -> bool {
        matches!(self.check, ItemCheck::Inspection { defective: true, .. })
    }

    pub fn is_conform(&self) -> bool {
        matches!(self.check, ItemCheck::Inspection { conform: true, .. })
    }

    /// Terminal items need no further operator input before submission.
    pub fn is_terminal(&self) -> bool {
        match self.check {
            ItemCheck::Verification { verified } => verified,
            ItemCheck::Inspection { conform: true, .. } => true,
            ItemCheck::Inspection {
                defective: true, ..
            } => self
                .comment
                .as_deref()
                .is_some_and(|comment| !comment.trim().is_empty()),
            ItemCheck::Inspection { .. } => false,
        }
    }
}

/// Service locations an inspection can be filed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServicePoint {
    #[serde(rename = "Sainte-Adèle")]
    SainteAdele,
    #[serde(rename = "Saint-Jérôme")]
    SaintJerome,
    #[serde(rename = "Sainte-Agathe-des-Monts")]
    SainteAgathe,
    #[serde(rename = "Mont-Tremblant")]
    MontTremblant,
    #[serde(rename = "Saint-Sauveur")]
    SaintSauveur,
    #[serde(rename = "Mirabel")]
    Mirabel,
}

impl ServicePoint {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::SainteAdele,
            Self::SaintJerome,
            Self::SainteAgathe,
            Self::MontTremblant,
            Self::SaintSauveur,
            Self::Mirabel,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SainteAdele => "Sainte-Adèle",
            Self::SaintJerome => "Saint-Jérôme",
            Self::SainteAgathe => "Sainte-Agathe-des-Monts",
            Self::MontTremblant => "Mont-Tremblant",
            Self::SaintSauveur => "Saint-Sauveur",
            Self::Mirabel => "Mirabel",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ordered()
            .into_iter()
            .find(|point| point.label().eq_ignore_ascii_case(trimmed))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error("item with id {0} not found")]
    ItemNotFound(String),
    #[error("item {0} is not applicable")]
    ItemDisabled(String),
    #[error("auxiliary field {0} not defined for this form")]
    UnknownField(String),
    #[error("operation not supported by the {0:?} form")]
    UnsupportedOperation(FormType),
    #[error("comments are only recorded on defective items ({0})")]
    CommentWithoutDefect(String),
    #[error("unknown service point '{0}'")]
    UnknownServicePoint(String),
}
