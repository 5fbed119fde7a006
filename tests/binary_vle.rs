//! Binary vapor-liquid equilibrium scenarios for an ethanol/water-like
//! system.
use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::array;
use vle_core::{
    saturation, ActivityMethod, Component, Equilibrium, FugacityMethod, MethodRegistry,
    SolverOptions, VleError, VleResult, EPSILON,
};

fn ethanol_water() -> Vec<Component> {
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

fn margules_system(a12: f64, a21: f64) -> Equilibrium {
    let mut system = Equilibrium::new(ethanol_water());
    system
        .set_activity_method(ActivityMethod::Margules, vec![a12, a21])
        .unwrap();
    system.set_fugacity_method(FugacityMethod::Ideal).unwrap();
    system
}

#[test]
fn margules_bubble_pressure_matches_the_modified_raoult_law() -> VleResult<()> {
    let (a12, a21) = (1.2, 0.9);
    let (x1, x2) = (0.4, 0.6);
    let mut system = margules_system(a12, a21);
    system.set_liquid_molefracs(array![x1, x2])?;
    let p = system.bubl_p(78.0, SolverOptions::default())?;

    let psat = saturation::vapor_pressures(system.components(), 78.0);
    let gamma1 = (x2 * x2 * (a12 + 2.0 * (a21 - a12) * x1)).exp();
    let gamma2 = (x1 * x1 * (a21 + 2.0 * (a12 - a21) * x2)).exp();
    let expected = x1 * gamma1 * psat[0] + x2 * gamma2 * psat[1];
    assert_abs_diff_eq!(p, expected, epsilon = EPSILON);
    assert_abs_diff_eq!(system.vapor_molefracs().sum(), 1.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn margules_dew_pressure_stays_below_the_bubble_pressure() -> VleResult<()> {
    let mut system = margules_system(1.2, 0.9);
    system.set_liquid_molefracs(array![0.4, 0.6])?;
    let bubl_p = system.bubl_p(78.0, SolverOptions::default())?;
    let y = system.vapor_molefracs().clone();
    system.set_vapor_molefracs(y)?;
    let dew_p = system.dew_p(78.0, SolverOptions::default())?;
    assert!(dew_p <= bubl_p + EPSILON);
    assert_abs_diff_eq!(system.liquid_molefracs().sum(), 1.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn van_laar_bubble_pressure_with_virial_fugacity() -> VleResult<()> {
    let mut system = Equilibrium::new(ethanol_water());
    system.set_activity_method(ActivityMethod::VanLaar, vec![1.2, 0.9])?;
    system.set_fugacity_method(FugacityMethod::Virial)?;
    system.set_liquid_molefracs(array![0.4, 0.6])?;
    let p = system.bubl_p(78.0, SolverOptions::default())?;
    assert!(p.is_finite() && p > 0.0);
    assert_abs_diff_eq!(system.vapor_molefracs().sum(), 1.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn bubble_temperature_inverts_bubble_pressure() -> VleResult<()> {
    let mut system = margules_system(1.2, 0.9);
    system.set_liquid_molefracs(array![0.4, 0.6])?;
    let p = system.bubl_p(78.0, SolverOptions::default())?;
    let t = system.bubl_t(p, SolverOptions::default())?;
    assert_relative_eq!(t, 78.0, max_relative = 1e-3);
    Ok(())
}

#[test]
fn methods_resolve_through_the_registry() -> VleResult<()> {
    let registry = MethodRegistry::default();
    let mut system = Equilibrium::new(ethanol_water());
    // index 1 is Margules, index 0 the ideal gas
    system.set_activity_method_index(&registry, 1, vec![1.2, 0.9])?;
    system.set_fugacity_method_index(&registry, 0)?;
    system.set_liquid_molefracs(array![0.4, 0.6])?;
    assert!(system.bubl_p(78.0, SolverOptions::default())? > 0.0);
    assert!(matches!(
        system.set_fugacity_method_index(&registry, 9),
        Err(VleError::MethodNotFound(9))
    ));
    Ok(())
}

#[test]
fn missing_antoine_data_fails_before_the_iteration() {
    let records = r#"[
        {"id": 1, "name": "ethanol", "antoine_a": 8.04494, "antoine_b": 1554.3, "antoine_c": 222.65},
        {"id": 2, "name": "mystery"}
    ]"#;
    let mut system = Equilibrium::new(Component::from_json_str(records).unwrap());
    system
        .set_activity_method(ActivityMethod::Ideal, vec![])
        .unwrap();
    system.set_fugacity_method(FugacityMethod::Ideal).unwrap();
    system
        .set_liquid_molefracs(array![0.4, 0.6])
        .unwrap();
    assert!(matches!(
        system.bubl_p(78.0, SolverOptions::default()),
        Err(VleError::MissingParameters(_))
    ));
}
