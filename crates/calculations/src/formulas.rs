//! Derived-parameter formulas
//!
//! Linear dimensions are entered in millimetres; the volume and mass
//! formulas work in centimetres.

use crate::field::Field;

/// A pure function of named inputs producing one named output.
///
/// The formula receives inputs in the order of `inputs` and may return
/// None when the result would be meaningless.
#[derive(Debug, Clone)]
pub struct Calculation {
    pub name: &'static str,
    pub inputs: Vec<Field>,
    pub output: Field,
    /// Decimal places the output is stored with
    pub decimals: u32,
    pub formula: fn(&[f64]) -> Option<f64>,
}

impl Calculation {
    pub fn new(
        name: &'static str,
        inputs: &[Field],
        output: Field,
        decimals: u32,
        formula: fn(&[f64]) -> Option<f64>,
    ) -> Self {
        Self {
            name,
            inputs: inputs.to_vec(),
            output,
            decimals,
            formula,
        }
    }

    /// Apply the formula, rejecting non-finite results
    pub fn apply(&self, inputs: &[f64]) -> Option<f64> {
        (self.formula)(inputs).filter(|v| v.is_finite())
    }
}

/// Assumed right atrial pressure added to the tricuspid gradient (mmHg)
pub const RIGHT_ATRIAL_PRESSURE: f64 = 10.0;

/// DuBois body surface area in m² from weight (kg) and height (cm)
pub fn body_surface_area(v: &[f64]) -> Option<f64> {
    let &[weight, height] = v else {
        return None;
    };
    if weight <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(0.007184 * height.powf(0.725) * weight.powf(0.425))
}

pub fn ratio(v: &[f64]) -> Option<f64> {
    let &[numerator, denominator] = v else {
        return None;
    };
    Some(numerator / denominator)
}

/// (LVEDD - LVESD) / LVEDD, as a percentage
pub fn fractional_shortening(v: &[f64]) -> Option<f64> {
    let &[diastolic, systolic] = v else {
        return None;
    };
    Some((diastolic - systolic) / diastolic * 100.0)
}

/// Teichholz volume (mL) from a diameter in mm
pub fn teichholz_volume(v: &[f64]) -> Option<f64> {
    let &[diameter] = v else {
        return None;
    };
    let d = diameter / 10.0;
    if d <= 0.0 {
        return None;
    }
    Some(7.0 * d.powi(3) / (2.4 + d))
}

pub fn stroke_volume(v: &[f64]) -> Option<f64> {
    let &[edv, esv] = v else {
        return None;
    };
    Some(edv - esv)
}

/// (EDV - ESV) / EDV, as a percentage
pub fn ejection_fraction(v: &[f64]) -> Option<f64> {
    let &[edv, esv] = v else {
        return None;
    };
    Some((edv - esv) / edv * 100.0)
}

/// ASE-corrected cube formula; inputs LVEDD, septum and posterior wall in mm
pub fn lv_mass(v: &[f64]) -> Option<f64> {
    let &[lvedd, septum, wall] = v else {
        return None;
    };
    let (lvedd, septum, wall) = (lvedd / 10.0, septum / 10.0, wall / 10.0);
    let total = lvedd + septum + wall;
    Some(0.8 * (1.04 * (total.powi(3) - lvedd.powi(3))) + 0.6)
}

/// Simplified Bernoulli pressure gradient (mmHg) from a velocity in m/s
pub fn bernoulli_gradient(v: &[f64]) -> Option<f64> {
    let &[velocity] = v else {
        return None;
    };
    if velocity <= 0.0 {
        return None;
    }
    Some(4.0 * velocity * velocity)
}

pub fn rv_systolic_pressure(v: &[f64]) -> Option<f64> {
    let &[gradient] = v else {
        return None;
    };
    if gradient <= 0.0 {
        return None;
    }
    Some(gradient + RIGHT_ATRIAL_PRESSURE)
}

/// The report's derived parameters
pub fn standard_calculations() -> Vec<Calculation> {
    use Field::*;

    vec![
        Calculation::new("body_surface_area", &[Weight, Height], BodySurfaceArea, 2, body_surface_area),
        Calculation::new("la_ao_ratio", &[LeftAtrium, AorticRoot], LaAoRatio, 2, ratio),
        Calculation::new(
            "fractional_shortening",
            &[LvEndDiastolicDiameter, LvEndSystolicDiameter],
            FractionalShortening,
            1,
            fractional_shortening,
        ),
        Calculation::new(
            "septum_wall_ratio",
            &[SeptalThickness, PosteriorWallThickness],
            SeptumWallRatio,
            2,
            ratio,
        ),
        Calculation::new(
            "end_diastolic_volume",
            &[LvEndDiastolicDiameter],
            EndDiastolicVolume,
            1,
            teichholz_volume,
        ),
        Calculation::new(
            "end_systolic_volume",
            &[LvEndSystolicDiameter],
            EndSystolicVolume,
            1,
            teichholz_volume,
        ),
        Calculation::new(
            "stroke_volume",
            &[EndDiastolicVolume, EndSystolicVolume],
            StrokeVolume,
            1,
            stroke_volume,
        ),
        Calculation::new(
            "ejection_fraction",
            &[EndDiastolicVolume, EndSystolicVolume],
            EjectionFraction,
            1,
            ejection_fraction,
        ),
        Calculation::new(
            "lv_mass",
            &[LvEndDiastolicDiameter, SeptalThickness, PosteriorWallThickness],
            LvMass,
            1,
            lv_mass,
        ),
        Calculation::new("lv_mass_index", &[LvMass, BodySurfaceArea], LvMassIndex, 1, ratio),
        Calculation::new("rv_pa_gradient", &[PulmonaryFlow], RvPaGradient, 1, bernoulli_gradient),
        Calculation::new("lv_ao_gradient", &[AorticFlow], LvAoGradient, 1, bernoulli_gradient),
        Calculation::new("la_lv_gradient", &[MitralFlow], LaLvGradient, 1, bernoulli_gradient),
        Calculation::new("ra_rv_gradient", &[TricuspidFlow], RaRvGradient, 1, bernoulli_gradient),
        Calculation::new(
            "tricuspid_gradient",
            &[TricuspidFlow],
            TricuspidGradient,
            1,
            bernoulli_gradient,
        ),
        Calculation::new(
            "rv_systolic_pressure",
            &[TricuspidGradient],
            RvSystolicPressure,
            1,
            rv_systolic_pressure,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_body_surface_area() {
        let bsa = body_surface_area(&[70.0, 175.0]).unwrap();
        assert!((bsa - 1.8481).abs() < 1e-3, "bsa = {bsa}");
        assert!(body_surface_area(&[-70.0, 175.0]).is_none());
    }

    #[test]
    fn test_wrong_input_count_gives_no_result() {
        assert!(ratio(&[1.0]).is_none());
        assert!(lv_mass(&[50.0, 10.0]).is_none());
        assert!(teichholz_volume(&[]).is_none());
        assert!(bernoulli_gradient(&[2.0, 3.0]).is_none());
    }

    #[test]
    fn test_teichholz_uses_centimetres() {
        // d = 5 cm: 7 * 125 / 7.4
        let v = teichholz_volume(&[50.0]).unwrap();
        assert!((v - 875.0 / 7.4).abs() < EPS);
    }

    #[test]
    fn test_lv_mass() {
        // d = 5, s = p = 1 cm: 0.8 * 1.04 * (343 - 125) + 0.6
        let mass = lv_mass(&[50.0, 10.0, 10.0]).unwrap();
        assert!((mass - (0.8 * 1.04 * 218.0 + 0.6)).abs() < 1e-9);
    }

    #[test]
    fn test_gradients() {
        assert!((bernoulli_gradient(&[2.5]).unwrap() - 25.0).abs() < EPS);
        assert_eq!(rv_systolic_pressure(&[25.0]), Some(35.0));
        assert!(bernoulli_gradient(&[-1.0]).is_none());
    }

    #[test]
    fn test_apply_rejects_non_finite() {
        let calc = Calculation::new("ratio", &[Field::LeftAtrium, Field::AorticRoot], Field::LaAoRatio, 2, ratio);
        assert_eq!(calc.apply(&[1.0, 0.0]), None);
        assert_eq!(calc.apply(&[3.0, 2.0]), Some(1.5));
    }

    #[test]
    fn test_standard_outputs_are_unique() {
        let calcs = standard_calculations();
        let mut outputs: Vec<_> = calcs.iter().map(|c| c.output).collect();
        outputs.sort();
        outputs.dedup();
        assert_eq!(outputs.len(), calcs.len());
    }
}
