//! Vapor-phase fugacity coefficient models.
//!
//! A fugacity model corrects the vapor phase for the deviation from ideal
//! gas behavior. Models are bound to a component set when they are
//! constructed; composition dependent pair coefficients are precomputed
//! into immutable tables at that point.
use crate::errors::VleResult;
use ndarray::Array1;

mod peng_robinson;
mod virial;
pub use peng_robinson::PengRobinson;
pub use virial::Virial;

/// A vapor-phase fugacity coefficient model bound to a component set.
pub trait FugacityModel {
    /// Fugacity coefficients at the temperature `t` in °C and pressure `p`
    /// in kPa for the given vapor composition.
    ///
    /// `psat` holds the saturation pressures of all components at `t`.
    fn fugacity_coefficients(
        &self,
        t: f64,
        p: f64,
        psat: &Array1<f64>,
        y: &Array1<f64>,
    ) -> VleResult<Array1<f64>>;
}

/// Ideal gas, φ = 1 for every component.
pub struct IdealGas;

impl FugacityModel for IdealGas {
    fn fugacity_coefficients(
        &self,
        _t: f64,
        _p: f64,
        _psat: &Array1<f64>,
        y: &Array1<f64>,
    ) -> VleResult<Array1<f64>> {
        Ok(Array1::ones(y.len()))
    }
}
