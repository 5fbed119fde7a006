//! Liquid-phase activity coefficient models.
//!
//! An activity model corrects the liquid phase for non-ideality. Models are
//! stateless: every call receives the current liquid composition and the
//! dense, ordered parameter array aligned with [`ActivityModel::required_params`].
use crate::errors::VleResult;
use ndarray::Array1;

mod margules;
mod van_laar;
pub use margules::Margules;
pub use van_laar::VanLaar;

/// A liquid-phase activity coefficient model.
pub trait ActivityModel {
    /// The ordered list of parameter names required for a system with the
    /// given number of components.
    ///
    /// Binary-only models return an empty list for any other component count.
    fn required_params(&self, components: usize) -> Vec<&'static str>;

    /// Whether the model supports systems with more than two components.
    fn multicomponent(&self) -> bool;

    /// Activity coefficients for the given liquid composition.
    fn activity_coefficients(&self, x: &Array1<f64>, params: &[f64]) -> VleResult<Array1<f64>>;
}

/// Ideal solution, γ = 1 for every component.
pub struct IdealSolution;

impl ActivityModel for IdealSolution {
    fn required_params(&self, _components: usize) -> Vec<&'static str> {
        Vec::new()
    }

    fn multicomponent(&self) -> bool {
        true
    }

    fn activity_coefficients(&self, x: &Array1<f64>, _params: &[f64]) -> VleResult<Array1<f64>> {
        Ok(Array1::ones(x.len()))
    }
}
