//! Measurement values keyed by form field

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::CalculationError;
use crate::field::Field;

/// Current numeric values of the report form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurements {
    values: BTreeMap<Field, f64>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn set(&mut self, field: Field, value: f64) {
        self.values.insert(field, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }

    /// Value usable as a calculation input: present, finite and non-zero
    pub fn usable(&self, field: Field) -> Option<f64> {
        self.get(field).filter(|v| v.is_finite() && *v != 0.0)
    }

    /// Collect values from `(form id, text)` pairs as read off the form.
    /// Unknown ids and blank or unparsable text are skipped.
    pub fn from_form<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut measurements = Self::new();
        for (id, text) in entries {
            let Some(field) = Field::from_form_id(id) else {
                debug!("Ignoring unknown form field {:?}", id);
                continue;
            };
            if let Some(value) = parse_measurement(text) {
                measurements.set(field, value);
            }
        }
        measurements
    }

    /// Collect values from a form snapshot `{"id": "text" | number, ...}`.
    /// Text goes through [`parse_measurement`]. Unknown ids and values that
    /// are neither text nor numbers are skipped.
    pub fn from_form_json(json: &str) -> Result<Self, CalculationError> {
        let entries: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let texts: Vec<(&str, String)> = entries
            .iter()
            .filter_map(|(id, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some((id.as_str(), text))
            })
            .collect();
        Ok(Self::from_form(
            texts.iter().map(|(id, text)| (*id, text.as_str())),
        ))
    }

    pub fn to_json(&self) -> Result<String, CalculationError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FromIterator<(Field, f64)> for Measurements {
    fn from_iter<T: IntoIterator<Item = (Field, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse form text as a number. Accepts `,` as the decimal separator.
pub fn parse_measurement(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement(" 52 "), Some(52.0));
        assert_eq!(parse_measurement("1,75"), Some(1.75));
        assert_eq!(parse_measurement("0.9"), Some(0.9));
        assert_eq!(parse_measurement(""), None);
        assert_eq!(parse_measurement("abc"), None);
        assert_eq!(parse_measurement("inf"), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(66.66666, 1), 66.7);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_from_form_skips_unknown_and_blank() {
        let m = Measurements::from_form([
            ("peso", "70,5"),
            ("altura", ""),
            ("observacoes", "12"),
            ("raiz_aorta", "x"),
        ]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(Field::Weight), Some(70.5));
    }

    #[test]
    fn test_from_form_json_reads_text_and_numbers() {
        let m = Measurements::from_form_json(
            r#"{"peso":"70,5","altura":175,"observacoes":"x","raiz_aorta":null,"atrio_esquerdo":" 35 "}"#,
        )
        .unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(Field::Weight), Some(70.5));
        assert_eq!(m.get(Field::Height), Some(175.0));
        assert_eq!(m.get(Field::LeftAtrium), Some(35.0));
    }

    #[test]
    fn test_from_form_json_tolerates_unrelated_fields() {
        let m = Measurements::from_form_json(r#"{"peso":"70,5","observacoes":"x"}"#).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(Field::Weight), Some(70.5));
        assert!(matches!(
            Measurements::from_form_json("[1]"),
            Err(CalculationError::Json(_))
        ));
    }

    #[test]
    fn test_usable_rejects_zero() {
        let mut m = Measurements::new();
        m.set(Field::Weight, 0.0);
        m.set(Field::Height, f64::NAN);
        assert_eq!(m.usable(Field::Weight), None);
        assert_eq!(m.usable(Field::Height), None);
        assert_eq!(m.usable(Field::AorticRoot), None);
    }

    #[test]
    fn test_json_keys_are_form_ids() {
        let m: Measurements = [(Field::Weight, 70.0), (Field::Height, 175.0)]
            .into_iter()
            .collect();
        let json = m.to_json().unwrap();
        assert_eq!(json, r#"{"peso":70.0,"altura":175.0}"#);
        assert_eq!(serde_json::from_str::<Measurements>(&json).unwrap(), m);
    }
}
