//! Report form fields that take part in calculations

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric field of the echocardiogram report form.
///
/// Linear dimensions are in millimetres, velocities in m/s, weight in kg,
/// height in cm. Each field maps to the element id used by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Entered measurements
    Weight,
    Height,
    HeartRate,
    LeftAtrium,
    AorticRoot,
    LvEndDiastolicDiameter,
    LvEndSystolicDiameter,
    SeptalThickness,
    PosteriorWallThickness,
    PulmonaryFlow,
    AorticFlow,
    MitralFlow,
    TricuspidFlow,
    EaRatio,

    // Derived parameters
    BodySurfaceArea,
    LaAoRatio,
    FractionalShortening,
    SeptumWallRatio,
    EndDiastolicVolume,
    EndSystolicVolume,
    StrokeVolume,
    EjectionFraction,
    LvMass,
    LvMassIndex,
    RvPaGradient,
    LvAoGradient,
    LaLvGradient,
    RaRvGradient,
    TricuspidGradient,
    RvSystolicPressure,
}

impl Field {
    pub const ALL: [Field; 30] = [
        Field::Weight,
        Field::Height,
        Field::HeartRate,
        Field::LeftAtrium,
        Field::AorticRoot,
        Field::LvEndDiastolicDiameter,
        Field::LvEndSystolicDiameter,
        Field::SeptalThickness,
        Field::PosteriorWallThickness,
        Field::PulmonaryFlow,
        Field::AorticFlow,
        Field::MitralFlow,
        Field::TricuspidFlow,
        Field::EaRatio,
        Field::BodySurfaceArea,
        Field::LaAoRatio,
        Field::FractionalShortening,
        Field::SeptumWallRatio,
        Field::EndDiastolicVolume,
        Field::EndSystolicVolume,
        Field::StrokeVolume,
        Field::EjectionFraction,
        Field::LvMass,
        Field::LvMassIndex,
        Field::RvPaGradient,
        Field::LvAoGradient,
        Field::LaLvGradient,
        Field::RaRvGradient,
        Field::TricuspidGradient,
        Field::RvSystolicPressure,
    ];

    /// Element id of the field in the report form
    pub fn form_id(self) -> &'static str {
        match self {
            Field::Weight => "peso",
            Field::Height => "altura",
            Field::HeartRate => "frequencia_cardiaca",
            Field::LeftAtrium => "atrio_esquerdo",
            Field::AorticRoot => "raiz_aorta",
            Field::LvEndDiastolicDiameter => "diametro_diastolico_final_ve",
            Field::LvEndSystolicDiameter => "diametro_sistolico_final",
            Field::SeptalThickness => "espessura_diastolica_septo",
            Field::PosteriorWallThickness => "espessura_diastolica_ppve",
            Field::PulmonaryFlow => "fluxo_pulmonar",
            Field::AorticFlow => "fluxo_aortico",
            Field::MitralFlow => "fluxo_mitral",
            Field::TricuspidFlow => "fluxo_tricuspide",
            Field::EaRatio => "relacao_e_a",
            Field::BodySurfaceArea => "superficie_corporal",
            Field::LaAoRatio => "relacao_atrio_esquerdo_aorta",
            Field::FractionalShortening => "percentual_encurtamento",
            Field::SeptumWallRatio => "relacao_septo_parede_posterior",
            Field::EndDiastolicVolume => "volume_diastolico_final",
            Field::EndSystolicVolume => "volume_sistolico_final",
            Field::StrokeVolume => "volume_ejecao",
            Field::EjectionFraction => "fracao_ejecao",
            Field::LvMass => "massa_ve",
            Field::LvMassIndex => "indice_massa_ve",
            Field::RvPaGradient => "gradiente_vd_ap",
            Field::LvAoGradient => "gradiente_ve_ao",
            Field::LaLvGradient => "gradiente_ae_ve",
            Field::RaRvGradient => "gradiente_ad_vd",
            Field::TricuspidGradient => "gradiente_tricuspide",
            Field::RvSystolicPressure => "pressao_sistolica_vd",
        }
    }

    pub fn from_form_id(id: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.form_id() == id)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.form_id())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.form_id())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Field::from_form_id(&id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown form field: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_ids_are_unique_and_resolvable() {
        for field in Field::ALL {
            assert_eq!(Field::from_form_id(field.form_id()), Some(field));
        }
        let mut ids: Vec<_> = Field::ALL.iter().map(|f| f.form_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Field::ALL.len());
    }

    #[test]
    fn test_unknown_form_id() {
        assert_eq!(Field::from_form_id("observacoes"), None);
    }

    #[test]
    fn test_serde_uses_form_id() {
        let json = serde_json::to_string(&Field::EjectionFraction).unwrap();
        assert_eq!(json, r#""fracao_ejecao""#);
        let field: Field = serde_json::from_str(r#""massa_ve""#).unwrap();
        assert_eq!(field, Field::LvMass);
    }
}
