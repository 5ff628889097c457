//! Calculation, template and session bindings for the report form

use calculations::{CalculationGraph, Field, Measurements, Sex, check_ranges};
use report::{Physician, SessionContext, TemplateCatalog, search_physicians};
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::bridge::js_error;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// Derived-parameter engine. Values come in as JSON objects keyed by form
/// field id, holding the field's text or a number; unrelated ids and blank
/// or unparsable text are ignored. Results go out as numbers.
#[wasm_bindgen]
pub struct ReportCalculator {
    graph: CalculationGraph,
}

#[wasm_bindgen]
impl ReportCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReportCalculator {
        ReportCalculator {
            graph: CalculationGraph::standard(),
        }
    }

    /// Run every calculation; returns all values, entered and derived
    #[wasm_bindgen(js_name = evaluateAll)]
    pub fn evaluate_all(&self, values_json: &str) -> Result<String, JsValue> {
        let mut values = Measurements::from_form_json(values_json).map_err(js_error)?;
        self.graph.evaluate_all(&mut values);
        values.to_json().map_err(js_error)
    }

    /// Recompute what depends on `field_id`; returns only the outputs
    /// that changed
    pub fn recompute(&self, values_json: &str, field_id: &str) -> Result<String, JsValue> {
        let field = Field::from_form_id(field_id)
            .ok_or_else(|| js_error(format!("unknown form field: {field_id}")))?;
        let mut values = Measurements::from_form_json(values_json).map_err(js_error)?;
        let updated: Measurements = self
            .graph
            .recompute(&mut values, &[field])
            .into_iter()
            .collect();
        debug!("{} changed, {} output(s) updated", field, updated.len());
        updated.to_json().map_err(js_error)
    }

    /// Reference-range checks as `[{field, value, normal, reference}]`
    #[wasm_bindgen(js_name = checkRanges)]
    pub fn check_ranges(
        &self,
        values_json: &str,
        age: Option<u32>,
        sex: Option<String>,
    ) -> Result<String, JsValue> {
        let values = Measurements::from_form_json(values_json).map_err(js_error)?;
        let sex = sex
            .as_deref()
            .map(str::parse::<Sex>)
            .transpose()
            .map_err(js_error)?;
        to_json(&check_ranges(&values, age, sex))
    }
}

impl Default for ReportCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Template buttons: key to `{field, text}` replacement
#[wasm_bindgen]
pub struct ReportTemplates {
    catalog: TemplateCatalog,
}

#[wasm_bindgen]
impl ReportTemplates {
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str) -> Result<ReportTemplates, JsValue> {
        let catalog = TemplateCatalog::from_json(catalog_json).map_err(js_error)?;
        Ok(ReportTemplates { catalog })
    }

    /// Add or replace a template
    pub fn insert(&mut self, key: &str, field: &str, text: &str) {
        self.catalog.insert(key, field, text);
    }

    /// `{field, text}` for the template; throws for an unknown key
    pub fn apply(&self, key: &str) -> Result<String, JsValue> {
        let insertion = self.catalog.apply(key).map_err(js_error)?;
        to_json(&insertion)
    }
}

/// Label for the responsible-physician field, or undefined if the field
/// already has a value or no physician is selected
#[wasm_bindgen(js_name = autofillPhysician)]
pub fn autofill_physician(context_json: &str, current: &str) -> Result<Option<String>, JsValue> {
    let context = SessionContext::from_json(context_json).map_err(js_error)?;
    Ok(context.autofill(current))
}

/// Filter a physician list by name, CRM or specialty
#[wasm_bindgen(js_name = searchPhysicians)]
pub fn search_physicians_json(list_json: &str, term: &str) -> Result<String, JsValue> {
    let physicians: Vec<Physician> = serde_json::from_str(list_json).map_err(js_error)?;
    to_json(&search_physicians(&physicians, term))
}
