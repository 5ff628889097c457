//! Adult reference ranges
//!
//! Dimensions use the same units as the form (millimetres).

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalculationError;
use crate::field::Field;
use crate::measurements::Measurements;

/// Age above which the E/A lower bound is relaxed
pub const ELDERLY_AGE: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "masculino" => Ok(Sex::Male),
            "f" | "female" | "feminino" => Ok(Sex::Female),
            _ => Err(CalculationError::UnknownSex(s.to_string())),
        }
    }
}

/// Inclusive bounds; an absent bound is open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ReferenceRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min: Some(min), max: None }
    }

    pub const fn at_most(max: f64) -> Self {
        Self { min: None, max: Some(max) }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Range as printed next to a value in the report
    pub fn label(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            (Some(min), None) => format!("≥{min}"),
            (None, Some(max)) => format!("≤{max}"),
            (None, None) => String::new(),
        }
    }
}

/// Outcome of comparing one value with its reference range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCheck {
    pub field: Field,
    pub value: f64,
    pub normal: bool,
    pub reference: String,
}

/// Reference ranges for an adult, adjusted for sex and age where known
pub fn reference_ranges(age: Option<u32>, sex: Option<Sex>) -> BTreeMap<Field, ReferenceRange> {
    let mut ranges = BTreeMap::from([
        (Field::HeartRate, ReferenceRange::between(60.0, 100.0)),
        (Field::LeftAtrium, ReferenceRange::between(27.0, 38.0)),
        (Field::AorticRoot, ReferenceRange::between(21.0, 34.0)),
        (Field::LvEndDiastolicDiameter, ReferenceRange::between(35.0, 56.0)),
        (Field::LvEndSystolicDiameter, ReferenceRange::between(21.0, 40.0)),
        (Field::FractionalShortening, ReferenceRange::between(25.0, 45.0)),
        (Field::EjectionFraction, ReferenceRange::at_least(55.0)),
        (Field::SeptalThickness, ReferenceRange::between(6.0, 11.0)),
        (Field::PosteriorWallThickness, ReferenceRange::between(6.0, 11.0)),
        (Field::EaRatio, ReferenceRange::between(0.8, 1.5)),
        (Field::RvSystolicPressure, ReferenceRange::at_most(35.0)),
    ]);

    match sex {
        Some(Sex::Male) => {
            ranges.insert(Field::LvMassIndex, ReferenceRange::at_most(115.0));
        }
        Some(Sex::Female) => {
            ranges.insert(Field::LvMassIndex, ReferenceRange::at_most(95.0));
        }
        None => {}
    }

    if age.is_some_and(|age| age > ELDERLY_AGE) {
        ranges.insert(Field::EaRatio, ReferenceRange::between(0.7, 1.5));
    }

    ranges
}

/// Compare every usable value that has a reference range
pub fn check_ranges(values: &Measurements, age: Option<u32>, sex: Option<Sex>) -> Vec<RangeCheck> {
    reference_ranges(age, sex)
        .into_iter()
        .filter_map(|(field, range)| {
            let value = values.usable(field)?;
            Some(RangeCheck {
                field,
                value,
                normal: range.contains(value),
                reference: range.label(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_inclusive() {
        let range = ReferenceRange::between(25.0, 45.0);
        assert!(range.contains(25.0));
        assert!(range.contains(45.0));
        assert!(!range.contains(45.1));
        assert!(ReferenceRange::at_least(55.0).contains(80.0));
        assert!(!ReferenceRange::at_most(35.0).contains(36.0));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ReferenceRange::between(60.0, 100.0).label(), "60-100");
        assert_eq!(ReferenceRange::at_least(55.0).label(), "≥55");
        assert_eq!(ReferenceRange::at_most(0.5).label(), "≤0.5");
    }

    #[test]
    fn test_mass_index_limit_by_sex() {
        let male = reference_ranges(None, Some(Sex::Male));
        let female = reference_ranges(None, Some(Sex::Female));
        assert_eq!(male[&Field::LvMassIndex].max, Some(115.0));
        assert_eq!(female[&Field::LvMassIndex].max, Some(95.0));
        assert!(!reference_ranges(None, None).contains_key(&Field::LvMassIndex));
    }

    #[test]
    fn test_elderly_ea_ratio() {
        assert_eq!(reference_ranges(Some(70), None)[&Field::EaRatio].min, Some(0.7));
        assert_eq!(reference_ranges(Some(65), None)[&Field::EaRatio].min, Some(0.8));
    }

    #[test]
    fn test_check_ranges() {
        let values: Measurements = [
            (Field::EjectionFraction, 48.0),
            (Field::LvMassIndex, 100.0),
            (Field::HeartRate, 72.0),
        ]
        .into_iter()
        .collect();

        let checks = check_ranges(&values, None, Some(Sex::Female));
        let find = |field| checks.iter().find(|c| c.field == field).unwrap();

        assert_eq!(checks.len(), 3);
        assert!(!find(Field::EjectionFraction).normal);
        assert_eq!(find(Field::EjectionFraction).reference, "≥55");
        assert!(!find(Field::LvMassIndex).normal);
        assert!(find(Field::HeartRate).normal);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Masculino".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("f".parse::<Sex>().unwrap(), Sex::Female);
        assert!("x".parse::<Sex>().is_err());
    }
}
