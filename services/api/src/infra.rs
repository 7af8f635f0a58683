use fleet_inspection::inspection::{
    AuxiliaryKind, Checklist, FormType, InspectionError, SharedSession,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_form(raw: &str) -> Result<FormType, String> {
    FormType::from_tag(raw).ok_or_else(|| {
        let known: Vec<&str> = FormType::ordered().iter().map(|form| form.tag()).collect();
        format!("unknown form '{raw}', expected one of: {}", known.join(", "))
    })
}

/// Shared HTTP client for the mail provider and outbound transports.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .user_agent(concat!("fleet-inspection/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn sample_session() -> Result<SharedSession, InspectionError> {
    let session = SharedSession::new();
    session.set_matricule("N-0100");
    session.set_vehicle_number("9123");
    session.set_service_point("Sainte-Adèle")?;
    Ok(session)
}

fn sample_value(kind: AuxiliaryKind) -> &'static str {
    match kind {
        AuxiliaryKind::Expiration => "12/27",
        AuxiliaryKind::Psi => "2000",
        AuxiliaryKind::Glucose => "5.5",
        AuxiliaryKind::Quantity => "24",
        AuxiliaryKind::UnitNumber => "0042",
    }
}

/// A checklist filled the way an operator would on a clean unit. The
/// mechanical sample records one minor defect so the banner shows up.
pub(crate) fn sample_checklist(
    form: FormType,
    session: SharedSession,
) -> Result<Checklist, InspectionError> {
    let mut checklist = Checklist::new(form, session);

    let mut categories: Vec<String> = Vec::new();
    for item in checklist.items() {
        if let Some(category) = &item.category {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
    }
    for category in &categories {
        checklist.mark_category_done(category);
    }

    if form == FormType::Mechanical {
        checklist.toggle("eclairage2-1")?;
        checklist.set_comment("eclairage2-1", "Feu de position arrière gauche brûlé")?;
    }

    for field in checklist.auxiliary_fields() {
        checklist.set_auxiliary(field.key, sample_value(field.kind))?;
    }
    Ok(checklist)
}
