use crate::inspection::checklist::{AuxiliaryField, AuxiliaryKind, Checklist};
use crate::inspection::domain::{ChecklistItem, FormType};
use crate::inspection::report::{self, ReportHeader};
use crate::inspection::session::SessionContext;
use chrono::NaiveDateTime;

pub(super) const UNIT_NUMBER: &str = "numero-moniteur";

pub(super) const AUXILIARY: &[AuxiliaryField] = &[
    AuxiliaryField {
        key: "electrodes-adulte",
        label: "Électrodes de défibrillation adulte",
        kind: AuxiliaryKind::Expiration,
        required: true,
    },
    AuxiliaryField {
        key: "electrodes-pediatrique",
        label: "Électrodes de défibrillation pédiatrique",
        kind: AuxiliaryKind::Expiration,
        required: true,
    },
    AuxiliaryField {
        key: UNIT_NUMBER,
        label: "Numéro de moniteur",
        kind: AuxiliaryKind::UnitNumber,
        required: true,
    },
];

pub(super) fn seed() -> Vec<ChecklistItem> {
    let item = |id: &str, label: &str, category: &str| {
        ChecklistItem::new(FormType::Monitor, id, label).in_category(category)
    };

    vec![
        item("moniteur-boitier", "Boîtier propre et intact", "Moniteur"),
        item("moniteur-ecran", "Écran fonctionnel et lisible", "Moniteur"),
        item("moniteur-autotest", "Autotest réussi au démarrage", "Moniteur"),
        item(
            "moniteur-imprimante",
            "Papier d'imprimante en quantité suffisante",
            "Moniteur",
        ),
        item("batterie-principale", "Batterie principale chargée", "Batteries"),
        item("batterie-releve", "Batterie de relève chargée", "Batteries"),
        item(
            "electrodes-adulte",
            "Électrodes de défibrillation adulte",
            "Électrodes et câbles",
        ),
        item(
            "electrodes-pediatrique",
            "Électrodes de défibrillation pédiatrique",
            "Électrodes et câbles",
        ),
        item("cable-therapie", "Câble de thérapie", "Électrodes et câbles"),
        item(
            "cable-ecg",
            "Câble ECG 4 et 12 dérivations",
            "Électrodes et câbles",
        ),
        item(
            "brassard-pni",
            "Brassards PNI adulte et pédiatrique",
            "Accessoires",
        ),
        item("capteur-spo2", "Capteur SpO2", "Accessoires"),
        item(
            "ligne-capnographie",
            "Ligne de capnographie (EtCO2)",
            "Accessoires",
        ),
        item("rasoir-compresses", "Rasoir et compresses", "Accessoires"),
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
