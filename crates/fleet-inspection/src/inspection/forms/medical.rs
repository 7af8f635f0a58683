use crate::inspection::checklist::{AuxiliaryField, AuxiliaryKind, Checklist};
use crate::inspection::domain::{ChecklistItem, FormType};
use crate::inspection::report::{self, ReportHeader};
use crate::inspection::session::SessionContext;
use chrono::NaiveDateTime;

pub(super) const AUXILIARY: &[AuxiliaryField] = &[
    AuxiliaryField {
        key: "oxygene-principal",
        label: "Bonbonne d'oxygène principale",
        kind: AuxiliaryKind::Psi,
        required: true,
    },
    AuxiliaryField {
        key: "oxygene-portative",
        label: "Bonbonne d'oxygène portative",
        kind: AuxiliaryKind::Psi,
        required: true,
    },
    AuxiliaryField {
        key: "epinephrine",
        label: "Épinéphrine 1:1000",
        kind: AuxiliaryKind::Expiration,
        required: true,
    },
    AuxiliaryField {
        key: "naloxone",
        label: "Naloxone",
        kind: AuxiliaryKind::Expiration,
        required: true,
    },
    AuxiliaryField {
        key: "glucagon",
        label: "Glucagon",
        kind: AuxiliaryKind::Expiration,
        required: false,
    },
    AuxiliaryField {
        key: "nitroglycerine",
        label: "Nitroglycérine en vaporisateur",
        kind: AuxiliaryKind::Expiration,
        required: false,
    },
    AuxiliaryField {
        key: "glucometre",
        label: "Glucomètre - test de contrôle",
        kind: AuxiliaryKind::Glucose,
        required: true,
    },
];

pub(super) fn seed() -> Vec<ChecklistItem> {
    let item = |id: &str, label: &str, category: &str| {
        ChecklistItem::new(FormType::MedicalSupply, id, label).in_category(category)
    };

    vec![
        item(
            "oxygene-principal",
            "Bonbonne d'oxygène principale",
            "Oxygénothérapie",
        ),
        item(
            "oxygene-portative",
            "Bonbonne d'oxygène portative",
            "Oxygénothérapie",
        ),
        item(
            "masques-haute-concentration",
            "Masques à haute concentration",
            "Oxygénothérapie",
        ),
        item("lunettes-nasales", "Lunettes nasales", "Oxygénothérapie"),
        item(
            "ballon-masque-adulte",
            "Ballon-masque adulte",
            "Voies respiratoires",
        ),
        item(
            "ballon-masque-pediatrique",
            "Ballon-masque pédiatrique",
            "Voies respiratoires",
        ),
        item(
            "aspirateur",
            "Aspirateur à sécrétions fonctionnel",
            "Voies respiratoires",
        ),
        item(
            "canules",
            "Canules oropharyngées (jeu complet)",
            "Voies respiratoires",
        ),
        item("epinephrine", "Épinéphrine 1:1000", "Médicaments"),
        item("naloxone", "Naloxone", "Médicaments"),
        item("glucagon", "Glucagon", "Médicaments"),
        item("aas", "AAS 80 mg", "Médicaments"),
        item(
            "nitroglycerine",
            "Nitroglycérine en vaporisateur",
            "Médicaments",
        ),
        item("glucometre", "Glucomètre - test de contrôle", "Glycémie"),
        item("lancettes", "Lancettes et bandelettes", "Glycémie"),
        item("collets-cervicaux", "Collets cervicaux", "Immobilisation"),
        item("attelles", "Attelles", "Immobilisation"),
        item(
            "planche-dorsale",
            "Planche dorsale et courroies",
            "Immobilisation",
        ),
        item(
            "incubateur",
            "Incubateur de transport néonatal",
            "Immobilisation",
        )
        .disabled(),
    ]
}

pub(super) fn render(
    checklist: &Checklist,
    session: &SessionContext,
    submitted_at: NaiveDateTime,
) -> String {
    let header = ReportHeader::for_checklist(checklist, session, submitted_at);
    let sections = report::item_sections(checklist.items(), &["Élément", "État"], |item| {
        format!(
            "<td>{}</td>{}",
            report::annotated_label(item, report::auxiliary_note(AUXILIARY, item)),
            report::verification_cell(item)
        )
    });
    report::document(&header, "", &sections)
}
