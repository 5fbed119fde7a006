//! Truncated virial equation with the Pitzer correlation for the second
//! virial coefficient and pairwise combining rules for the critical
//! properties.
use super::FugacityModel;
use crate::component::{Component, CELSIUS_TO_KELVIN, R};
use crate::errors::{VleError, VleResult};
use ndarray::{Array1, Array2};

const B0_A: f64 = 0.083;
const B0_B: f64 = 0.422;
const B0_EXP: f64 = 1.6;
const B1_A: f64 = 0.139;
const B1_B: f64 = 0.172;
const B1_EXP: f64 = 4.2;

/// Generalized virial correlation.
///
/// The combined critical properties of all ordered pairs are computed once
/// per component set. The combining rules are symmetric, so `_ij == _ji`
/// holds by construction.
pub struct Virial {
    omega: Array2<f64>,
    tc: Array2<f64>,
    pc: Array2<f64>,
}

impl Virial {
    /// Bind the correlation to a component set and precompute the pairwise
    /// combined critical properties.
    pub fn new(components: &[Component]) -> VleResult<Self> {
        for c in components {
            if !c.critical_data_available() || !c.acentric_factor.is_finite() {
                return Err(VleError::MissingParameters(format!(
                    "critical data for {}",
                    c.name
                )));
            }
        }
        let n = components.len();
        let omega = Array2::from_shape_fn((n, n), |(i, j)| {
            0.5 * (components[i].acentric_factor + components[j].acentric_factor)
        });
        let zc = Array2::from_shape_fn((n, n), |(i, j)| {
            0.5 * (components[i].zc + components[j].zc)
        });
        let tc = Array2::from_shape_fn((n, n), |(i, j)| {
            (components[i].tc * components[j].tc).sqrt()
        });
        let vc = Array2::from_shape_fn((n, n), |(i, j)| {
            let half_sum = 0.5 * (components[i].vc().cbrt() + components[j].vc().cbrt());
            half_sum.powi(3)
        });
        let pc = R * &zc * &tc / &vc;
        Ok(Self { omega, tc, pc })
    }

    /// Second virial coefficients of all ordered pairs at the temperature
    /// `tk` in Kelvin.
    fn second_virial_coefficients(&self, tk: f64) -> Array2<f64> {
        let n = self.tc.nrows();
        Array2::from_shape_fn((n, n), |(i, j)| {
            let tr = tk / self.tc[(i, j)];
            let b0 = B0_A - B0_B / tr.powf(B0_EXP);
            let b1 = B1_A - B1_B / tr.powf(B1_EXP);
            R * self.tc[(i, j)] / self.pc[(i, j)] * (b0 + self.omega[(i, j)] * b1)
        })
    }
}

impl FugacityModel for Virial {
    fn fugacity_coefficients(
        &self,
        t: f64,
        p: f64,
        psat: &Array1<f64>,
        y: &Array1<f64>,
    ) -> VleResult<Array1<f64>> {
        let n = self.tc.nrows();
        let tk = t + CELSIUS_TO_KELVIN;
        let b = self.second_virial_coefficients(tk);
        let delta = Array2::from_shape_fn((n, n), |(i, j)| {
            2.0 * b[(i, j)] - b[(i, i)] - b[(j, j)]
        });

        let mut phi = Array1::zeros(n);
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                for k in 0..n {
                    sum += y[j] * y[k] * (2.0 * delta[(j, i)] - delta[(j, k)]);
                }
            }
            phi[i] = ((b[(i, i)] * (p - psat[i]) + 0.5 * p * sum) / (R * tk)).exp();
        }

        if phi.iter().any(|v| !v.is_finite()) {
            return Err(VleError::IterationFailed(String::from(
                "virial fugacity coefficients",
            )));
        }
        Ok(phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn binary() -> Vec<Component> {
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
            },
            {
                "id": 2,
                "name": "water",
                "tc": 647.1,
                "pc": 22055.0,
                "zc": 0.229,
                "acentric_factor": 0.345,
                "antoine_a": 7.96681,
                "antoine_b": 1668.21,
                "antoine_c": 228.0
            }
        ]"#;
        Component::from_json_str(records).unwrap()
    }

    #[test]
    fn combined_properties_are_symmetric() {
        let components = binary();
        let virial = Virial::new(&components).unwrap();
        assert_relative_eq!(virial.tc[(0, 1)], virial.tc[(1, 0)], max_relative = 1e-14);
        assert_relative_eq!(virial.pc[(0, 1)], virial.pc[(1, 0)], max_relative = 1e-14);
        assert_relative_eq!(
            virial.omega[(0, 1)],
            virial.omega[(1, 0)],
            max_relative = 1e-14
        );
        // the combining rules reduce to the pure component properties
        // on the diagonal
        assert_relative_eq!(virial.tc[(0, 0)], components[0].tc, max_relative = 1e-14);
        assert_relative_eq!(virial.pc[(1, 1)], components[1].pc, max_relative = 1e-12);
    }

    #[test]
    fn pure_component_at_saturation_is_ideal() {
        let mut components = binary();
        components.truncate(1);
        let virial = Virial::new(&components).unwrap();
        // at P = Psat the pressure correction vanishes for a pure vapor
        let phi = virial
            .fugacity_coefficients(78.0, 100.0, &array![100.0], &array![1.0])
            .unwrap();
        assert_relative_eq!(phi[0], 1.0, max_relative = 1e-14);
    }

    #[test]
    fn missing_critical_data_is_rejected() {
        let records = r#"[{"id": 3, "name": "mystery", "antoine_a": 8.0}]"#;
        let components = Component::from_json_str(records).unwrap();
        assert!(Virial::new(&components).is_err());
    }
}
