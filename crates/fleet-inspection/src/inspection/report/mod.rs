//! Shared building blocks for the standalone HTML reports.
//!
//! Every form renders a complete document with a single inline `<style>`
//! block: the relay lifts that block and the `<body>` content into the email,
//! so nothing may depend on an external stylesheet.

mod grouping;

pub(crate) use grouping::{group_items, CategoryGroup};

use super::checklist::{AuxiliaryField, AuxiliaryKind, Checklist};
use super::domain::ChecklistItem;
use super::session::SessionContext;
use chrono::NaiveDateTime;
use std::fmt::Write as _;

const REPORT_STYLE: &str = "\
body { font-family: Arial, Helvetica, sans-serif; color: #1f2933; margin: 24px; }
h1 { font-size: 20px; margin-bottom: 4px; }
h2 { font-size: 16px; margin: 20px 0 6px; border-bottom: 2px solid #c62828; padding-bottom: 2px; }
h3 { font-size: 14px; margin: 12px 0 4px; color: #52606d; }
table { border-collapse: collapse; width: 100%; margin-bottom: 8px; }
th, td { border: 1px solid #cbd2d9; padding: 6px 8px; text-align: left; font-size: 13px; }
th { background: #f0f4f8; }
.meta td:first-child { font-weight: bold; width: 35%; }
.ok { color: #2e7d32; font-weight: bold; }
.ko { color: #c62828; font-weight: bold; }
.na { color: #9aa5b1; font-style: italic; }
.note { color: #52606d; font-size: 12px; }
.banner { padding: 10px 14px; margin: 12px 0; border-radius: 4px; }
.banner-major { background: #fdecea; border: 2px solid #c62828; color: #8e1b1b; }
.banner-minor { background: #fff8e1; border: 2px solid #f9a825; color: #7a5b00; }
";

/// Escape text before it is interpolated into markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Identifying block printed above the item tables.
pub(crate) struct ReportHeader<'a> {
    pub title: &'static str,
    pub identifier_label: &'static str,
    pub identifier: String,
    pub session: &'a SessionContext,
    pub submitted_at: NaiveDateTime,
}

impl<'a> ReportHeader<'a> {
    pub fn for_checklist(
        checklist: &Checklist,
        session: &'a SessionContext,
        submitted_at: NaiveDateTime,
    ) -> Self {
        let definition = checklist.definition();
        Self {
            title: checklist.form().label(),
            identifier_label: definition.identifier_label,
            identifier: checklist.identifier(session),
            session,
            submitted_at,
        }
    }
}

/// Wrap rendered sections into a complete HTML document.
pub(crate) fn document(header: &ReportHeader<'_>, banners: &str, sections: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{}</title>", escape_html(header.title)).expect("write title");
    writeln!(html, "<style>\n{REPORT_STYLE}</style>\n</head>\n<body>").expect("write style");
    writeln!(html, "<h1>{}</h1>", escape_html(header.title)).expect("write heading");

    html.push_str("<table class=\"meta\">\n");
    let mut meta_row = |label: &str, value: &str| {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        )
        .expect("write meta row");
    };
    meta_row(&capitalize(header.identifier_label), &header.identifier);
    meta_row("Matricule", &header.session.matricule);
    meta_row("Point de service", header.session.service_point_label());
    meta_row(
        "Date et heure",
        &header.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    html.push_str("</table>\n");

    html.push_str(banners);
    html.push_str(sections);
    html.push_str("</body>\n</html>\n");
    html
}

/// Render grouped item tables; `row` produces the `<td>` cells of one item.
pub(crate) fn item_sections<F>(items: &[ChecklistItem], columns: &[&str], row: F) -> String
where
    F: Fn(&ChecklistItem) -> String,
{
    let mut html = String::new();
    for group in group_items(items) {
        let CategoryGroup { name, subgroups } = group;
        if let Some(name) = name {
            writeln!(html, "<h2>{}</h2>", escape_html(name)).expect("write category");
        }

        for sub in subgroups {
            if let Some(name) = sub.name {
                writeln!(html, "<h3>{}</h3>", escape_html(name)).expect("write subcategory");
            }
            html.push_str("<table>\n<tr>");
            for column in columns {
                write!(html, "<th>{}</th>", escape_html(column)).expect("write column");
            }
            html.push_str("</tr>\n");
            for item in sub.items {
                writeln!(html, "<tr>{}</tr>", row(item)).expect("write row");
            }
            html.push_str("</table>\n");
        }
    }
    html
}

/// Escaped label followed by an optional inline annotation.
pub(crate) fn annotated_label(item: &ChecklistItem, annotation: Option<String>) -> String {
    match annotation {
        Some(note) => format!(
            "{} <span class=\"note\">{}</span>",
            escape_html(&item.label),
            escape_html(&note)
        ),
        None => escape_html(&item.label),
    }
}

/// Inline note for the auxiliary value recorded on an item, if any.
pub(crate) fn auxiliary_note(fields: &[AuxiliaryField], item: &ChecklistItem) -> Option<String> {
    let field = fields.iter().find(|field| field.key == item.id)?;
    match field.kind {
        AuxiliaryKind::Expiration => item
            .expire_date
            .as_deref()
            .map(|date| format!("(Expiration: {date})")),
        AuxiliaryKind::Psi => item.value.as_deref().map(|psi| format!("(PSI: {psi})")),
        AuxiliaryKind::Glucose => item
            .value
            .as_deref()
            .map(|reading| format!("(Glycémie: {reading} mmol/L)")),
        AuxiliaryKind::Quantity => item
            .value
            .as_deref()
            .map(|count| format!("(Quantité: {count})")),
        AuxiliaryKind::UnitNumber => None,
    }
}

/// Status cell shared by the verification forms.
pub(crate) fn verification_cell(item: &ChecklistItem) -> &'static str {
    if item.disabled {
        "<td class=\"na\">N/A</td>"
    } else if item.is_verified() {
        "<td class=\"ok\">&#10004; Vérifié</td>"
    } else {
        "<td class=\"ko\">&#10008; Non vérifié</td>"
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
