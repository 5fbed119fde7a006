//! Isothermal and isobaric phase diagrams for binary systems.
use crate::equilibrium::Equilibrium;
use crate::errors::{VleError, VleResult};
use crate::SolverOptions;
use ndarray::array;

const DEFAULT_POINTS: usize = 51;

/// Bubble and dew curves of a binary system along a composition sweep.
///
/// Every sweep point is an independent bubble point calculation, so the
/// sweep can be parallelized externally by running each point on its own
/// engine without changing the single-call contract.
pub struct PhaseDiagram {
    /// Liquid mole fractions of the first component.
    pub liquid_molefracs: Vec<f64>,
    /// Vapor mole fractions of the first component.
    pub vapor_molefracs: Vec<f64>,
    /// Bubble point pressure in kPa (Pxy) or temperature in °C (Txy)
    /// at every sweep point.
    pub values: Vec<f64>,
}

impl PhaseDiagram {
    /// Isothermal Pxy diagram at the temperature `t` in °C.
    pub fn pxy(
        system: &mut Equilibrium,
        t: f64,
        npoints: Option<usize>,
        options: SolverOptions,
    ) -> VleResult<Self> {
        Self::sweep(system, npoints, |system, x1| {
            system.set_liquid_molefracs(array![x1, 1.0 - x1])?;
            system.bubl_p(t, options)
        })
    }

    /// Isobaric Txy diagram at the pressure `p` in kPa.
    pub fn txy(
        system: &mut Equilibrium,
        p: f64,
        npoints: Option<usize>,
        options: SolverOptions,
    ) -> VleResult<Self> {
        Self::sweep(system, npoints, |system, x1| {
            system.set_liquid_molefracs(array![x1, 1.0 - x1])?;
            system.bubl_t(p, options)
        })
    }

    fn sweep(
        system: &mut Equilibrium,
        npoints: Option<usize>,
        mut bubble_point: impl FnMut(&mut Equilibrium, f64) -> VleResult<f64>,
    ) -> VleResult<Self> {
        if system.components().len() != 2 {
            return Err(VleError::IncompatibleComponents(
                2,
                system.components().len(),
            ));
        }
        let npoints = npoints.unwrap_or(DEFAULT_POINTS);

        // sweep the open interval (0, 1); the pure-component limits are
        // excluded since mole fractions have to stay positive
        let mut liquid_molefracs = Vec::with_capacity(npoints);
        let mut vapor_molefracs = Vec::with_capacity(npoints);
        let mut values = Vec::with_capacity(npoints);
        for i in 0..npoints {
            let x1 = (i + 1) as f64 / (npoints + 1) as f64;
            let value = bubble_point(system, x1)?;
            liquid_molefracs.push(x1);
            vapor_molefracs.push(system.vapor_molefracs()[0]);
            values.push(value);
        }
        Ok(Self {
            liquid_molefracs,
            vapor_molefracs,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityMethod, Component, FugacityMethod};

    fn ideal_binary() -> Equilibrium {
        let records = r#"[
            {
                "id": 1,
                "name": "ethanol",
                "antoine_a": 8.04494,
                "antoine_b": 1554.3,
                "antoine_c": 222.65
            },
            {
                "id": 2,
                "name": "water",
                "antoine_a": 7.96681,
                "antoine_b": 1668.21,
                "antoine_c": 228.0
            }
        ]"#;
        let mut system = Equilibrium::new(Component::from_json_str(records).unwrap());
        system
            .set_activity_method(ActivityMethod::Ideal, vec![])
            .unwrap();
        system.set_fugacity_method(FugacityMethod::Ideal).unwrap();
        system
    }

    #[test]
    fn ideal_pxy_is_monotonic_in_the_light_component() {
        let mut system = ideal_binary();
        let diagram =
            PhaseDiagram::pxy(&mut system, 78.0, Some(9), SolverOptions::default()).unwrap();
        assert_eq!(diagram.values.len(), 9);
        // ethanol is the more volatile component, so the bubble pressure
        // increases with its liquid mole fraction
        assert!(diagram.values.windows(2).all(|w| w[0] < w[1]));
        assert!(diagram
            .liquid_molefracs
            .iter()
            .all(|&x| x > 0.0 && x < 1.0));
    }

    #[test]
    fn ideal_txy_is_decreasing_in_the_light_component() {
        let mut system = ideal_binary();
        let diagram =
            PhaseDiagram::txy(&mut system, 101.3, Some(9), SolverOptions::default()).unwrap();
        assert!(diagram.values.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn sweep_requires_a_binary_system() {
        let records = r#"[{"id": 1, "name": "ethanol", "antoine_a": 8.04494, "antoine_b": 1554.3, "antoine_c": 222.65}]"#;
        let mut system = Equilibrium::new(Component::from_json_str(records).unwrap());
        assert!(matches!(
            PhaseDiagram::pxy(&mut system, 78.0, None, SolverOptions::default()),
            Err(VleError::IncompatibleComponents(2, 1))
        ));
    }
}
