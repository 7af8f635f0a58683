//! Subject and HTML body of the email sent for one inspection report.

use crate::inspection::report::escape_html;
use crate::inspection::FormType;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::OnceLock;

const MISSING_REPORT: &str = "<p>Aucun rapport HTML n'a été fourni avec cette inspection.</p>";

/// Report fields the relay reads; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayPayload {
    pub html_content: Option<String>,
    pub matricule: Option<String>,
    pub point_de_service: Option<String>,
    pub date_time: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub numero_identifiant: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub numero_vehicule: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub numero_moniteur: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub numero: Option<String>,
}

/// Identifiers arrive as strings or bare numbers depending on the client.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

impl RelayPayload {
    /// First non-empty identifier, checked in the order clients have used.
    pub fn identifier(&self) -> Option<&str> {
        [
            &self.numero_identifiant,
            &self.numero_vehicule,
            &self.numero_moniteur,
            &self.numero,
        ]
        .into_iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
    }
}

/// Composed message, ready for a [`super::MailProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionEmail {
    pub subject: String,
    pub html: String,
}

impl InspectionEmail {
    pub fn compose(form_type: &str, payload: &RelayPayload, now: NaiveDateTime) -> Self {
        Self {
            subject: subject(form_type, payload),
            html: body(form_type, payload, now),
        }
    }
}

pub fn subject(form_type: &str, payload: &RelayPayload) -> String {
    let base = match FormType::from_tag(form_type) {
        Some(form) => form.definition().subject.to_string(),
        None => format!("Inspection {form_type}"),
    };
    match payload.identifier() {
        Some(identifier) => format!("{base} - {identifier}"),
        None => base,
    }
}

fn style_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex"))
}

fn body_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("body regex"))
}

/// `<style>` blocks and `<body>` content of a report; the whole document
/// when it has no body tag.
pub fn extract_report(html: &str) -> (String, String) {
    let styles: String = style_pattern()
        .find_iter(html)
        .map(|found| found.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let content = body_pattern()
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_string())
        .unwrap_or_else(|| html.to_string());
    (styles, content)
}

pub fn body(form_type: &str, payload: &RelayPayload, now: NaiveDateTime) -> String {
    let form_label = FormType::from_tag(form_type)
        .map(|form| form.label().to_string())
        .unwrap_or_else(|| form_type.to_string());
    let submitted = payload
        .date_time
        .clone()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| now.format("%Y-%m-%d %H:%M").to_string());

    let (styles, report) = match payload.html_content.as_deref() {
        Some(html) if !html.trim().is_empty() => extract_report(html),
        _ => (String::new(), MISSING_REPORT.to_string()),
    };

    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&styles);
    html.push_str("\n</head>\n<body>\n<table class=\"meta\">\n");
    let rows = [
        ("Type d'inspection", form_label.as_str()),
        ("Identifiant", payload.identifier().unwrap_or("")),
        ("Matricule", payload.matricule.as_deref().unwrap_or("")),
        (
            "Point de service",
            payload.point_de_service.as_deref().unwrap_or(""),
        ),
        ("Soumis le", submitted.as_str()),
    ];
    for (label, value) in rows {
        writeln!(
            html,
            "<tr><td>{label}</td><td>{}</td></tr>",
            escape_html(value)
        )
        .expect("write summary row");
    }
    html.push_str("</table>\n<hr>\n");
    html.push_str(&report);
    html.push_str("\n</body>\n</html>\n");
    html
}
