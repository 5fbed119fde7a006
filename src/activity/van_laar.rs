//! Van Laar activity coefficient model.
use super::ActivityModel;
use crate::errors::{VleError, VleResult};
use ndarray::{array, Array1};

/// The Van Laar equation for binary mixtures.
pub struct VanLaar;

impl ActivityModel for VanLaar {
    fn required_params(&self, components: usize) -> Vec<&'static str> {
        if components != 2 {
            return Vec::new();
        }
        vec!["VanLaar-a12", "VanLaar-a21"]
    }

    fn multicomponent(&self) -> bool {
        false
    }

    fn activity_coefficients(&self, x: &Array1<f64>, params: &[f64]) -> VleResult<Array1<f64>> {
        let &[a12, a21] = params else {
            return Err(VleError::MissingParameters(String::from(
                "the Van Laar equation requires a12 and a21",
            )));
        };
        let r1 = 1.0 + (a12 * x[0]) / (a21 * x[1]);
        let r2 = 1.0 + (a21 * x[1]) / (a12 * x[0]);
        Ok(array![(a12 / (r1 * r1)).exp(), (a21 / (r2 * r2)).exp()])
    }
}
