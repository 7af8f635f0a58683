use crate::inspection::checklist::{AuxiliaryField, AuxiliaryKind, Checklist};
use crate::inspection::domain::{ChecklistItem, FormType};
use crate::inspection::report::{self, ReportHeader};
use crate::inspection::session::SessionContext;
use chrono::NaiveDateTime;

pub(super) const AUXILIARY: &[AuxiliaryField] = &[
    AuxiliaryField {
        key: "inventaire-gants",
        label: "Gants d'examen (toutes tailles)",
        kind: AuxiliaryKind::Quantity,
        required: true,
    },
    AuxiliaryField {
        key: "inventaire-solution-saline",
        label: "Solution saline",
        kind: AuxiliaryKind::Expiration,
        required: true,
    },
    AuxiliaryField {
        key: "inventaire-lingettes",
        label: "Lingettes désinfectantes",
        kind: AuxiliaryKind::Expiration,
        required: false,
    },
];

pub(super) fn seed() -> Vec<ChecklistItem> {
    let item = |id: &str, label: &str, category: &str| {
        ChecklistItem::new(FormType::Cleaning, id, label).in_category(category)
    };

    vec![
        item(
            "soins-civiere",
            "Civière nettoyée et désinfectée",
            "Cabine de soins",
        )
        .in_subcategory("Désinfection"),
        item(
            "soins-surfaces",
            "Surfaces, poignées et ceintures désinfectées",
            "Cabine de soins",
        )
        .in_subcategory("Désinfection"),
        item("soins-plancher", "Plancher lavé", "Cabine de soins").in_subcategory("Entretien"),
        item(
            "soins-armoires",
            "Armoires vidées, nettoyées et replacées",
            "Cabine de soins",
        )
        .in_subcategory("Entretien"),
        item(
            "conduite-tableau",
            "Tableau de bord et volant nettoyés",
            "Cabine de conduite",
        ),
        item(
            "conduite-vitres",
            "Vitres intérieures nettoyées",
            "Cabine de conduite",
        ),
        item(
            "conduite-tapis",
            "Tapis aspirés",
            "Cabine de conduite",
        ),
        item(
            "inventaire-gants",
            "Gants d'examen (toutes tailles)",
            "Inventaire",
        ),
        item(
            "inventaire-solution-saline",
            "Solution saline",
            "Inventaire",
        ),
        item(
            "inventaire-lingettes",
            "Lingettes désinfectantes",
            "Inventaire",
        ),
        item(
            "inventaire-sacs",
            "Sacs à déchets biomédicaux",
            "Inventaire",
        ),
        item(
            "inventaire-piquants",
            "Contenant pour objets piquants et tranchants",
            "Inventaire",
        ),
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
