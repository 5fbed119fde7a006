//! Two-parameter Margules excess Gibbs energy model.
use super::ActivityModel;
use crate::errors::{VleError, VleResult};
use ndarray::{array, Array1};

/// The two-parameter Margules equation for binary mixtures.
pub struct Margules;

impl ActivityModel for Margules {
    fn required_params(&self, components: usize) -> Vec<&'static str> {
        if components != 2 {
            return Vec::new();
        }
        vec!["Margules-a12", "Margules-a21"]
    }

    fn multicomponent(&self) -> bool {
        false
    }

    fn activity_coefficients(&self, x: &Array1<f64>, params: &[f64]) -> VleResult<Array1<f64>> {
        let &[a12, a21] = params else {
            return Err(VleError::MissingParameters(String::from(
                "the Margules equation requires a12 and a21",
            )));
        };
        let gamma1 = (x[1] * x[1] * (a12 + 2.0 * (a21 - a12) * x[0])).exp();
        let gamma2 = (x[0] * x[0] * (a21 + 2.0 * (a12 - a21) * x[1])).exp();
        Ok(array![gamma1, gamma2])
    }
}
