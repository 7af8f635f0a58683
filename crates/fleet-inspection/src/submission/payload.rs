use crate::inspection::{Checklist, FormType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire format of one completed checklist, shared by every transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(rename = "type")]
    pub form_type: FormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,
    pub date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_de_service: Option<String>,
    pub numero_identifiant: String,
    pub html_content: String,
    pub file_name: String,
    pub mime_type: String,
}

impl SubmissionPayload {
    /// Snapshot the checklist and its session into a payload. The checklist
    /// is expected to have passed validation.
    pub fn build(checklist: &Checklist, submitted_at: NaiveDateTime) -> Self {
        let session = checklist.session().snapshot();
        let identifier = checklist.identifier(&session);
        let definition = checklist.definition();

        Self {
            form_type: checklist.form(),
            matricule: Some(session.matricule.clone()).filter(|value| !value.is_empty()),
            date_time: submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            point_de_service: session.service_point.map(|point| point.label().to_string()),
            file_name: file_name(definition.file_prefix, &identifier, submitted_at),
            numero_identifiant: identifier,
            html_content: checklist.render(submitted_at),
            mime_type: mime::TEXT_HTML.essence_str().to_string(),
        }
    }
}

/// `<prefix>_<identifier>_<YYYY-MM-DD_HHMM>.html`
pub fn file_name(prefix: &str, identifier: &str, submitted_at: NaiveDateTime) -> String {
    format!(
        "{prefix}_{identifier}_{}.html",
        submitted_at.format("%Y-%m-%d_%H%M")
    )
}
