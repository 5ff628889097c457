//! Report text templates
//!
//! A template is a canned paragraph for one section of the report form.
//! Applying it replaces the section's text; the catalog itself is supplied
//! by the page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ReportError;

/// A canned paragraph and the form field it fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub field: String,
    pub text: String,
}

/// Text to write into a form field, replacing its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInsertion {
    pub field: String,
    pub text: String,
}

/// Templates by key (the `data-template` attribute of the page's buttons)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, ReportTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from `{"key": {"field": ..., "text": ...}, ...}`
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let catalog: Self = serde_json::from_str(json)?;
        info!("Loaded {} report template(s)", catalog.len());
        Ok(catalog)
    }

    /// Add or replace a template
    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        debug!("Template registered: {}", key);
        self.templates.insert(
            key,
            ReportTemplate {
                field: field.into(),
                text: text.into(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&ReportTemplate> {
        self.templates.get(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Resolve a template key to the text insertion it performs
    pub fn apply(&self, key: &str) -> Result<TemplateInsertion, ReportError> {
        let template = self
            .templates
            .get(key)
            .ok_or_else(|| ReportError::UnknownTemplate(key.to_string()))?;
        debug!("Template applied: {} -> {}", key, template.field);
        Ok(TemplateInsertion {
            field: template.field.clone(),
            text: template.text.clone(),
        })
    }
}
