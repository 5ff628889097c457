//! Session context passed in by the page
//!
//! The page keeps the physician chosen for the session and hands it over
//! as JSON; nothing here reads browser storage.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Physician {
    pub id: u64,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default)]
    pub crm: String,
    #[serde(default, alias = "especialidade")]
    pub specialty: String,
    #[serde(default, alias = "assinatura")]
    pub has_signature: bool,
}

impl Physician {
    /// "name crm", as written into the report's physician fields
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.crm).trim_end().to_string()
    }

    fn matches(&self, term: &str) -> bool {
        [&self.name, &self.crm, &self.specialty]
            .iter()
            .any(|s| s.to_lowercase().contains(term))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionContext {
    pub physician: Option<Physician>,
}

impl SessionContext {
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn select(&mut self, physician: Physician) {
        debug!("Physician selected: {}", physician.id);
        self.physician = Some(physician);
    }

    pub fn physician_label(&self) -> Option<String> {
        self.physician.as_ref().map(Physician::label)
    }

    /// Value for the responsible-physician field: the selected physician's
    /// label, but only when the field is still blank
    pub fn autofill(&self, current: &str) -> Option<String> {
        if !current.trim().is_empty() {
            return None;
        }
        self.physician_label()
    }
}

/// Physicians whose name, CRM or specialty contains `term`, ignoring case.
/// A blank term matches everyone.
pub fn search_physicians<'a>(physicians: &'a [Physician], term: &str) -> Vec<&'a Physician> {
    let term = term.trim().to_lowercase();
    physicians.iter().filter(|p| p.matches(&term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physicians() -> Vec<Physician> {
        vec![
            Physician {
                id: 1,
                name: "Ana Costa".to_string(),
                crm: "CRM:111111".to_string(),
                specialty: "Cardiologia".to_string(),
                has_signature: true,
            },
            Physician {
                id: 2,
                name: "Bruno Lima".to_string(),
                crm: "CRM:222222".to_string(),
                specialty: "Ecocardiografia".to_string(),
                has_signature: false,
            },
        ]
    }

    #[test]
    fn test_context_from_page_json() {
        let json = r#"{"physician": {"id": 7, "nome": "Carla Dias", "crm": "CRM:777", "assinatura": true}}"#;
        let context = SessionContext::from_json(json).unwrap();
        let physician = context.physician.as_ref().unwrap();
        assert_eq!(physician.name, "Carla Dias");
        assert!(physician.has_signature);
        assert_eq!(context.physician_label().as_deref(), Some("Carla Dias CRM:777"));
    }

    #[test]
    fn test_autofill_only_blank_fields() {
        let mut context = SessionContext::default();
        assert_eq!(context.autofill(""), None);

        context.select(physicians()[0].clone());
        assert_eq!(context.autofill("  ").as_deref(), Some("Ana Costa CRM:111111"));
        assert_eq!(context.autofill("Dr. Someone"), None);
    }

    #[test]
    fn test_label_without_crm() {
        let mut physician = physicians()[0].clone();
        physician.crm.clear();
        assert_eq!(physician.label(), "Ana Costa");
    }

    #[test]
    fn test_search_physicians() {
        let list = physicians();
        let ids = |term: &str| search_physicians(&list, term).iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids("ana"), vec![1]);
        assert_eq!(ids("222"), vec![2]);
        assert_eq!(ids("ECO"), vec![2]);
        assert_eq!(ids(""), vec![1, 2]);
    }
}
