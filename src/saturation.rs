//! Antoine correlation for pure-component saturation properties.
use crate::component::{Component, KPA_PER_MMHG};
use ndarray::Array1;

/// Saturation pressure in kPa at the temperature `t` in °C.
pub fn vapor_pressure(component: &Component, t: f64) -> f64 {
    KPA_PER_MMHG
        * 10.0f64.powf(component.antoine_a - component.antoine_b / (component.antoine_c + t))
}

/// Saturation temperature in °C at the pressure `p` in kPa.
pub fn saturation_temperature(component: &Component, p: f64) -> f64 {
    component.antoine_b / (component.antoine_a - (p / KPA_PER_MMHG).log10()) - component.antoine_c
}

/// Saturation pressures of all components at the temperature `t` in °C.
pub fn vapor_pressures(components: &[Component], t: f64) -> Array1<f64> {
    components.iter().map(|c| vapor_pressure(c, t)).collect()
}

/// Saturation temperatures of all components at the pressure `p` in kPa.
pub fn saturation_temperatures(components: &[Component], p: f64) -> Array1<f64> {
    components
        .iter()
        .map(|c| saturation_temperature(c, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn water() -> Component {
        let records = r#"[
            {
                "id": 2,
                "name": "water",
                "antoine_a": 7.96681,
                "antoine_b": 1668.21,
                "antoine_c": 228.0
            }
        ]"#;
        Component::from_json_str(records).unwrap().remove(0)
    }

    #[test]
    fn water_boils_near_atmospheric_pressure() {
        let p = vapor_pressure(&water(), 100.0);
        assert_relative_eq!(p, 101.32, max_relative = 1e-2);
    }

    #[test]
    fn saturation_temperature_inverts_vapor_pressure() {
        let water = water();
        for t in [25.0, 60.0, 100.0] {
            let p = vapor_pressure(&water, t);
            assert_relative_eq!(saturation_temperature(&water, p), t, max_relative = 1e-12);
        }
    }
}
