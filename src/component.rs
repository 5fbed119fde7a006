//! Per-substance physical and thermodynamic constants.
use crate::errors::VleResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Universal gas constant in J/(kmol K).
pub const R: f64 = 8314.472;
/// Universal gas constant in J/(mol K).
pub const RGAS: f64 = 8.314472;
/// Conversion factor from mmHg to kPa for the Antoine correlation.
pub const KPA_PER_MMHG: f64 = 0.133322;
/// Offset between the Celsius and Kelvin scales.
pub const CELSIUS_TO_KELVIN: f64 = 273.16;
/// Absolute tolerance shared by all equilibrium iterations.
pub const EPSILON: f64 = 1e-5;

fn nan() -> f64 {
    f64::NAN
}

/// Raw component data as provided by external tabular sources.
///
/// Missing values are represented by NaN so that absence propagates
/// through arithmetic instead of silently becoming zero.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ComponentRecord {
    pub id: i32,
    pub name: String,
    /// critical temperature in Kelvin
    #[serde(default = "nan")]
    pub tc: f64,
    /// critical pressure in kPa
    #[serde(default = "nan")]
    pub pc: f64,
    /// critical compressibility factor
    #[serde(default = "nan")]
    pub zc: f64,
    /// acentric factor
    #[serde(default = "nan")]
    pub acentric_factor: f64,
    /// Antoine constants on the mmHg/°C basis
    #[serde(default = "nan")]
    pub antoine_a: f64,
    #[serde(default = "nan")]
    pub antoine_b: f64,
    #[serde(default = "nan")]
    pub antoine_c: f64,
}

/// Per-substance constants, built once at load time and shared
/// read-only across all calculations.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ComponentRecord")]
pub struct Component {
    pub id: i32,
    pub name: String,
    pub tc: f64,
    pub pc: f64,
    pub zc: f64,
    pub acentric_factor: f64,
    pub antoine_a: f64,
    pub antoine_b: f64,
    pub antoine_c: f64,
    vc: f64,
}

impl From<ComponentRecord> for Component {
    fn from(record: ComponentRecord) -> Self {
        Self {
            vc: R * record.zc * record.tc / record.pc,
            id: record.id,
            name: record.name,
            tc: record.tc,
            pc: record.pc,
            zc: record.zc,
            acentric_factor: record.acentric_factor,
            antoine_a: record.antoine_a,
            antoine_b: record.antoine_b,
            antoine_c: record.antoine_c,
        }
    }
}

impl Component {
    pub fn new(record: ComponentRecord) -> Self {
        record.into()
    }

    /// Critical molar volume in m³/kmol, derived from Tc, Pc and Zc
    /// at construction.
    pub fn vc(&self) -> f64 {
        self.vc
    }

    /// Whether all critical properties required by the fugacity models
    /// are present.
    pub fn critical_data_available(&self) -> bool {
        self.tc.is_finite() && self.pc.is_finite() && self.zc.is_finite()
    }

    /// Whether all three Antoine constants are present.
    pub fn antoine_data_available(&self) -> bool {
        self.antoine_a.is_finite() && self.antoine_b.is_finite() && self.antoine_c.is_finite()
    }

    /// Read a list of components from a JSON array of records.
    pub fn from_json_str(json: &str) -> VleResult<Vec<Self>> {
        let records: Vec<ComponentRecord> = serde_json::from_str(json)?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vc_is_derived_from_critical_data() {
        let records = r#"[
            {
                "id": 1,
                "name": "ethanol",
                "tc": 513.9,
                "pc": 6148.0,
                "zc": 0.24,
                "acentric_factor": 0.645,
                "antoine_a": 8.04494,
                "antoine_b": 1554.3,
                "antoine_c": 222.65
            }
        ]"#;
        let components = Component::from_json_str(records).unwrap();
        let ethanol = &components[0];
        assert!(ethanol.critical_data_available());
        assert!(ethanol.antoine_data_available());
        assert_relative_eq!(
            ethanol.vc(),
            R * 0.24 * 513.9 / 6148.0,
            max_relative = 1e-14
        );
    }

    #[test]
    fn missing_fields_deserialize_to_nan() {
        let records = r#"[{"id": 7, "name": "unknown", "antoine_a": 8.0}]"#;
        let components = Component::from_json_str(records).unwrap();
        let comp = &components[0];
        assert!(comp.tc.is_nan());
        assert!(comp.vc().is_nan());
        assert!(!comp.critical_data_available());
        assert!(!comp.antoine_data_available());
    }
}
