use crate::inspection::checklist::{AuxiliaryField, Checklist};
use crate::inspection::domain::{ChecklistItem, FormType, Severity};
use crate::inspection::report::{self, escape_html, ReportHeader};
use crate::inspection::session::SessionContext;
use chrono::NaiveDateTime;
use std::fmt::Write as _;

pub(super) const AUXILIARY: &[AuxiliaryField] = &[];

pub(super) fn seed() -> Vec<ChecklistItem> {
    let item = |id: &str, label: &str, category: &str| {
        ChecklistItem::new(FormType::Mechanical, id, label).in_category(category)
    };
    let major = Severity::Major;
    let minor = Severity::Minor;

    vec![
        item("pneus1-A", "Pneu crevé ou à plat", "Pneus et roues")
            .in_subcategory("Essieu avant")
            .with_severity(major),
        item(
            "pneus1-1",
            "Usure irrégulière de la bande de roulement",
            "Pneus et roues",
        )
        .in_subcategory("Essieu avant")
        .with_severity(minor),
        item(
            "pneus9-A",
            "Écrou de roue manquant ou desserré",
            "Pneus et roues",
        )
        .in_subcategory("Essieu arrière")
        .with_severity(major),
        item(
            "pneus9-1",
            "Pression d'un pneu visiblement basse",
            "Pneus et roues",
        )
        .in_subcategory("Essieu arrière")
        .with_severity(minor),
        item(
            "freins1-A",
            "Pédale de frein s'enfonce jusqu'au plancher",
            "Freins",
        )
        .with_severity(major),
        item(
            "freins2-A",
            "Frein de stationnement inefficace",
            "Freins",
        )
        .with_severity(major),
        item("freins3-1", "Témoin d'ABS allumé", "Freins").with_severity(minor),
        item(
            "eclairage1-A",
            "Feux de freinage inopérants",
            "Éclairage et signalisation",
        )
        .with_severity(major),
        item(
            "eclairage2-1",
            "Feu de gabarit ou de position brûlé",
            "Éclairage et signalisation",
        )
        .with_severity(minor),
        item(
            "eclairage3-1",
            "Gyrophares ou sirène défaillants",
            "Éclairage et signalisation",
        )
        .with_severity(minor),
        item(
            "carrosserie1-A",
            "Pare-brise fissuré dans le champ de vision",
            "Carrosserie",
        )
        .with_severity(major),
        item(
            "carrosserie2-1",
            "Portière ou compartiment mal fermé",
            "Carrosserie",
        )
        .with_severity(minor),
        item(
            "conduite1-A",
            "Jeu excessif dans la direction",
            "Poste de conduite",
        )
        .with_severity(major),
        item(
            "conduite2-1",
            "Essuie-glace ou lave-glace inefficace",
            "Poste de conduite",
        )
        .with_severity(minor),
        item(
            "conduite3-1",
            "Klaxon inopérant",
            "Poste de conduite",
        )
        .with_severity(minor),
        item(
            "autre-defectuosite",
            "Autre défectuosité (préciser en commentaire)",
            "Autres",
        ),
    ]
}

/// Defective items split by severity; unclassified defects appear in neither.
fn classify_defects(items: &[ChecklistItem]) -> (Vec<&ChecklistItem>, Vec<&ChecklistItem>) {
    let defective = items.iter().filter(|item| item.is_defective());
    let mut major = Vec::new();
    let mut minor = Vec::new();
    for item in defective {
        match item.severity {
            Some(Severity::Major) => major.push(item),
            Some(Severity::Minor) => minor.push(item),
            None => {}
        }
    }
    (major, minor)
}

fn defect_list(items: &[&ChecklistItem]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        let written = match item
            .comment
            .as_deref()
            .filter(|comment| !comment.trim().is_empty())
        {
            Some(comment) => write!(
                html,
                "<li>{} : {}</li>",
                escape_html(&item.label),
                escape_html(comment)
            ),
            None => write!(html, "<li>{}</li>", escape_html(&item.label)),
        };
        written.expect("write defect");
    }
    html.push_str("</ul>");
    html
}

fn banners(items: &[ChecklistItem]) -> String {
    let (major, minor) = classify_defects(items);
    if !major.is_empty() {
        format!(
            "<div class=\"banner banner-major\"><strong>&#9888; {} défectuosité(s) majeure(s) détectée(s).</strong> \
             Le véhicule ne doit pas être mis en service avant réparation.{}</div>\n",
            major.len(),
            defect_list(&major)
        )
    } else if !minor.is_empty() {
        format!(
            "<div class=\"banner banner-minor\"><strong>{} défectuosité(s) mineure(s) à signaler.</strong> \
             Réparation requise dans les 48 heures.{}</div>\n",
            minor.len(),
            defect_list(&minor)
        )
    } else {
        String::new()
    }
}

fn status_cell(item: &ChecklistItem) -> String {
    if item.disabled {
        return "<td class=\"na\">N/A</td>".to_string();
    }
    if item.is_defective() {
        let label = item
            .severity
            .map(Severity::label)
            .unwrap_or("Défectuosité");
        return format!("<td class=\"ko\">{}</td>", escape_html(label));
    }
    if item.is_conform() {
        return "<td class=\"ok\">Conforme</td>".to_string();
    }
    "<td class=\"na\">Non inspecté</td>".to_string()
}

pub(super) fn render(
    checklist: &Checklist,
    session: &SessionContext,
    submitted_at: NaiveDateTime,
) -> String {
    let header = ReportHeader::for_checklist(checklist, session, submitted_at);
    let sections = report::item_sections(
        checklist.items(),
        &["Élément", "État", "Commentaire"],
        |item| {
            let comment = item
                .comment
                .as_deref()
                .filter(|_| item.is_defective())
                .map(escape_html)
                .unwrap_or_default();
            format!(
                "<td>{}</td>{}<td>{}</td>",
                escape_html(&item.label),
                status_cell(item),
                comment
            )
        },
    );
    report::document(&header, &banners(checklist.items()), &sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defective(items: &mut [ChecklistItem], id: &str) {
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .expect("seed item present");
        item.check = crate::inspection::domain::ItemCheck::Inspection {
            defective: true,
            conform: false,
        };
    }

    #[test]
    fn severity_comes_from_seed_data() {
        let mut items = seed();
        defective(&mut items, "pneus9-A");
        defective(&mut items, "pneus9-1");
        defective(&mut items, "autre-defectuosite");

        let (major, minor) = classify_defects(&items);
        let major: Vec<&str> = major.iter().map(|item| item.id.as_str()).collect();
        let minor: Vec<&str> = minor.iter().map(|item| item.id.as_str()).collect();

        assert_eq!(major, vec!["pneus9-A"]);
        assert_eq!(minor, vec!["pneus9-1"]);
    }

    #[test]
    fn minor_banner_only_without_major_defects() {
        let mut items = seed();
        defective(&mut items, "eclairage2-1");
        let html = banners(&items);
        assert!(html.contains("banner-minor"));
        assert!(!html.contains("banner-major"));

        defective(&mut items, "freins1-A");
        let html = banners(&items);
        assert!(html.contains("banner-major"));
        assert!(!html.contains("banner-minor"));
    }

    #[test]
    fn no_banner_without_defects() {
        assert!(banners(&seed()).is_empty());
    }
}
