//! Peng-Robinson cubic equation of state for the vapor-phase fugacity
//! coefficient.
use super::FugacityModel;
use crate::component::{Component, CELSIUS_TO_KELVIN, RGAS};
use crate::errors::{VleError, VleResult};
use ndarray::Array1;
use std::f64::consts::{PI, SQRT_2};

const COEF_A: f64 = 0.457;
const COEF_B: f64 = 0.077;

/// Peng-Robinson equation of state bound to a component set.
///
/// The pure-component coefficients are precomputed; the mixture
/// coefficients depend on the vapor composition and are evaluated per call.
pub struct PengRobinson {
    a: Array1<f64>,
    b: Array1<f64>,
}

impl PengRobinson {
    /// Bind the equation of state to a component set and precompute the
    /// pure-component coefficients.
    pub fn new(components: &[Component]) -> VleResult<Self> {
        for c in components {
            if !c.critical_data_available() {
                return Err(VleError::MissingParameters(format!(
                    "critical data for {}",
                    c.name
                )));
            }
        }
        let a = components
            .iter()
            .map(|c| COEF_A * (RGAS * c.tc).powi(2) / c.pc / 1e5)
            .collect();
        let b = components
            .iter()
            .map(|c| COEF_B * RGAS * c.tc / c.pc / 1e5)
            .collect();
        Ok(Self { a, b })
    }
}

impl FugacityModel for PengRobinson {
    fn fugacity_coefficients(
        &self,
        t: f64,
        p: f64,
        psat: &Array1<f64>,
        y: &Array1<f64>,
    ) -> VleResult<Array1<f64>> {
        let n = self.a.len();
        let tk = t + CELSIUS_TO_KELVIN;

        // mixing rules
        let mut a_mix = 0.0;
        for i in 0..n {
            for j in 0..n {
                a_mix += y[i] * y[j] * (self.a[i] * self.a[j]).sqrt();
            }
        }
        let b_mix = y.dot(&self.b);

        let cap_a = a_mix * p * 1000.0 / (RGAS * tk).powi(2);
        let cap_b = b_mix * p * 1000.0 / (RGAS * tk);

        // vapor-phase compressibility factor from the cubic
        // Z³ - (1 - B)Z² + (A - 2B - 3B²)Z - (AB - B² - B³) = 0
        let c2 = cap_b - 1.0;
        let c1 = cap_a - 2.0 * cap_b - 3.0 * cap_b * cap_b;
        let c0 = -cap_a * cap_b + cap_b * cap_b * (cap_b + 1.0);
        let z = largest_root(c2, c1, c0);

        if !z.is_finite() || z - b_mix <= 0.0 {
            return Err(VleError::InvalidState(
                String::from("Peng-Robinson"),
                String::from("Z"),
                z,
            ));
        }

        let ln_pr_term = ((z + cap_b * (SQRT_2 + 1.0)) / (z - cap_b * (SQRT_2 - 1.0))).ln();
        let mut phi = Array1::zeros(n);
        for i in 0..n {
            let departure = a_mix * (self.b[i] / b_mix - 2.0 * (self.a[i] / a_mix).sqrt())
                * ln_pr_term
                / (2.0 * SQRT_2 * b_mix * RGAS * tk);
            let ln_phi = self.b[i] * (z - 1.0) / b_mix - (z - b_mix).ln() + departure;
            let ln_psat = self.b[i] * p * psat[i] / (RGAS * 1e5 * tk).powi(2);
            phi[i] = (ln_phi - ln_psat).exp();
        }

        if phi.iter().any(|v| !v.is_finite()) {
            return Err(VleError::IterationFailed(String::from(
                "Peng-Robinson fugacity coefficients",
            )));
        }
        Ok(phi)
    }
}

/// Largest real root of the cubic Z³ + c2·Z² + c1·Z + c0 = 0.
///
/// The cubic is depressed by the substitution Z = t - c2/3 and solved by
/// the discriminant cases of Cardano's method. For three real roots the
/// trigonometric form is used and the largest root is selected, which is
/// the vapor branch of the equation of state. For a repeated root both
/// distinct root values are compared.
fn largest_root(c2: f64, c1: f64, c0: f64) -> f64 {
    let p = c1 - c2 * c2 / 3.0;
    let q = 2.0 * c2 * c2 * c2 / 27.0 - c2 * c1 / 3.0 + c0;
    let shift = -c2 / 3.0;
    let d = q * q / 4.0 + p * p * p / 27.0;

    if d > 0.0 {
        let sqrt_d = d.sqrt();
        (-q / 2.0 + sqrt_d).cbrt() + (-q / 2.0 - sqrt_d).cbrt() + shift
    } else if d == 0.0 {
        let double = (q / 2.0).cbrt() + shift;
        let single = -2.0 * (q / 2.0).cbrt() + shift;
        double.max(single)
    } else {
        let m = 2.0 * (-p / 3.0).sqrt();
        let theta = (3.0 * q / (p * m)).clamp(-1.0, 1.0).acos();
        (0..3)
            .map(|k| m * ((theta - 2.0 * PI * k as f64) / 3.0).cos() + shift)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
