//! The equilibrium engine: bubble point, dew point and flash calculations.
use crate::activity::ActivityModel;
use crate::component::{Component, EPSILON};
use crate::errors::{VleError, VleResult};
use crate::fugacity::FugacityModel;
use crate::registry::{ActivityMethod, FugacityMethod, MethodRegistry};
use crate::saturation;
use crate::{log_iter, log_result, SolverOptions, Verbosity};
use ndarray::Array1;

const MAX_ITER: usize = 500;
const TOL: f64 = EPSILON;

/// The state of the current system together with the selected models.
///
/// The engine owns the composition buffers: the arrays returned by
/// [`liquid_molefracs`](Self::liquid_molefracs) and
/// [`vapor_molefracs`](Self::vapor_molefracs) are mutated in place by every
/// calculation, so callers that need a stable snapshot have to copy them
/// before the next call.
pub struct Equilibrium {
    components: Vec<Component>,
    x: Array1<f64>,
    y: Array1<f64>,
    activity: Option<(Box<dyn ActivityModel>, Vec<f64>)>,
    fugacity: Option<Box<dyn FugacityModel>>,
}

impl Equilibrium {
    pub fn new(components: Vec<Component>) -> Self {
        let n = components.len();
        Self {
            components,
            x: Array1::from_elem(n, f64::NAN),
            y: Array1::from_elem(n, f64::NAN),
            activity: None,
            fugacity: None,
        }
    }

    /// Replace the component list.
    ///
    /// Both mole fraction arrays are reset to unset (NaN) arrays of the
    /// new length and the model selections are cleared, since the
    /// fugacity models are bound to the previous component set.
    pub fn set_components(&mut self, components: Vec<Component>) {
        let n = components.len();
        self.components = components;
        self.x = Array1::from_elem(n, f64::NAN);
        self.y = Array1::from_elem(n, f64::NAN);
        self.activity = None;
        self.fugacity = None;
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn liquid_molefracs(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn vapor_molefracs(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn set_liquid_molefracs(&mut self, x: Array1<f64>) -> VleResult<()> {
        if x.len() != self.components.len() {
            return Err(VleError::IncompatibleComponents(
                self.components.len(),
                x.len(),
            ));
        }
        self.x = x;
        Ok(())
    }

    pub fn set_vapor_molefracs(&mut self, y: Array1<f64>) -> VleResult<()> {
        if y.len() != self.components.len() {
            return Err(VleError::IncompatibleComponents(
                self.components.len(),
                y.len(),
            ));
        }
        self.y = y;
        Ok(())
    }

    /// Select the activity method together with its dense, ordered
    /// parameter array.
    pub fn set_activity_method(
        &mut self,
        method: ActivityMethod,
        params: Vec<f64>,
    ) -> VleResult<()> {
        let n = self.components.len();
        if n == 0 {
            return Err(VleError::UndeterminedState(String::from(
                "no components configured",
            )));
        }
        let model = method.build();
        if !model.multicomponent() && n != 2 {
            return Err(VleError::BinarySystemsOnly(method.name().to_owned(), n));
        }
        let required = model.required_params(n);
        if params.len() != required.len() {
            return Err(VleError::MissingParameters(format!(
                "{} expects {} parameter(s): [{}]",
                method.name(),
                required.len(),
                required.join(", ")
            )));
        }
        if params.iter().any(|v| !v.is_finite()) {
            return Err(VleError::MissingParameters(format!(
                "{} parameters contain missing values",
                method.name()
            )));
        }
        self.activity = Some((model, params));
        Ok(())
    }

    /// Select the fugacity method, binding it to the current component set.
    pub fn set_fugacity_method(&mut self, method: FugacityMethod) -> VleResult<()> {
        if self.components.is_empty() {
            return Err(VleError::UndeterminedState(String::from(
                "no components configured",
            )));
        }
        self.fugacity = Some(method.bind(&self.components)?);
        Ok(())
    }

    /// Select the activity method by its registry index.
    pub fn set_activity_method_index(
        &mut self,
        registry: &MethodRegistry,
        index: usize,
        params: Vec<f64>,
    ) -> VleResult<()> {
        self.set_activity_method(registry.activity_method(index)?, params)
    }

    /// Select the fugacity method by its registry index.
    pub fn set_fugacity_method_index(
        &mut self,
        registry: &MethodRegistry,
        index: usize,
    ) -> VleResult<()> {
        self.set_fugacity_method(registry.fugacity_method(index)?)
    }

    /// Bubble point pressure in kPa at the temperature `t` in °C for the
    /// current liquid composition. Updates the vapor composition in place.
    pub fn bubl_p(&mut self, t: f64, options: SolverOptions) -> VleResult<f64> {
        self.check_ready()?;
        check_input(t, "temperature")?;
        self.validate_molefracs(true)?;
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER, TOL);

        let psat = saturation::vapor_pressures(&self.components, t);
        let gamma = self.gammas(&self.x)?;
        let mut phi = Array1::ones(self.components.len());
        let mut p = (&self.x * &gamma * &psat).sum();

        log_iter!(verbosity, " iter |    residual    |    pressure");
        log_iter!(verbosity, "{:-<46}", "");
        for k in 1..=max_iter {
            let p_old = p;
            self.y = &self.x * &gamma * &psat / (&phi * p);
            phi = self.phis(t, p, &psat)?;
            p = (&self.x * &gamma * &psat / &phi).sum();
            if !p.is_finite() {
                return Err(VleError::IterationFailed(String::from(
                    "bubble point pressure",
                )));
            }
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.6} kPa",
                k,
                (p - p_old).abs(),
                p
            );
            if (p - p_old).abs() < tol {
                log_result!(
                    verbosity,
                    "BUBL P: calculation converged in {} step(s)\n",
                    k
                );
                return Ok(p);
            }
        }
        Err(VleError::NotConverged(String::from("bubble point pressure")))
    }

    /// Dew point pressure in kPa at the temperature `t` in °C for the
    /// current vapor composition. Updates the liquid composition in place.
    pub fn dew_p(&mut self, t: f64, options: SolverOptions) -> VleResult<f64> {
        self.check_ready()?;
        check_input(t, "temperature")?;
        self.validate_molefracs(false)?;
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER, TOL);

        let psat = saturation::vapor_pressures(&self.components, t);
        let mut gamma = Array1::ones(self.components.len());
        let mut phi = Array1::ones(self.components.len());
        let mut p = (&self.y * &phi / (&gamma * &psat)).sum().recip();

        log_iter!(verbosity, " iter |    residual    |    pressure");
        log_iter!(verbosity, "{:-<46}", "");
        for k in 1..=max_iter {
            let p_old = p;
            phi = self.phis(t, p, &psat)?;
            gamma = self.converge_liquid_composition(p, &psat, &phi, gamma, max_iter, tol)?;
            p = (&self.y * &phi / (&gamma * &psat)).sum().recip();
            if !p.is_finite() {
                return Err(VleError::IterationFailed(String::from(
                    "dew point pressure",
                )));
            }
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.6} kPa",
                k,
                (p - p_old).abs(),
                p
            );
            if (p - p_old).abs() < tol {
                log_result!(verbosity, "DEW P: calculation converged in {} step(s)\n", k);
                return Ok(p);
            }
        }
        Err(VleError::NotConverged(String::from("dew point pressure")))
    }

    /// Bubble point temperature in °C at the pressure `p` in kPa for the
    /// current liquid composition. Updates the vapor composition in place.
    pub fn bubl_t(&mut self, p: f64, options: SolverOptions) -> VleResult<f64> {
        self.check_ready()?;
        check_input(p, "pressure")?;
        self.validate_molefracs(true)?;
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER, TOL);

        // seed with the mole-fraction-weighted average of the pure-component
        // saturation temperatures
        let tsat = saturation::saturation_temperatures(&self.components, p);
        let mut t = (&self.x * &tsat).sum();
        let gamma = self.gammas(&self.x)?;
        let mut phi = Array1::ones(self.components.len());

        log_iter!(verbosity, " iter |    residual    |   temperature");
        log_iter!(verbosity, "{:-<46}", "");
        for k in 1..=max_iter {
            let t_old = t;
            let psat = saturation::vapor_pressures(&self.components, t);
            self.y = &self.x * &gamma * &psat / (&phi * p);
            phi = self.phis(t, p, &psat)?;
            // solve Raoult's law for the reference component saturation
            // pressure and invert the Antoine equation for T
            let psat0 = p / ((&self.x * &gamma * &psat / &phi).sum() / psat[0]);
            t = saturation::saturation_temperature(&self.components[0], psat0);
            if !t.is_finite() {
                return Err(VleError::IterationFailed(String::from(
                    "bubble point temperature",
                )));
            }
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.6} °C",
                k,
                (t - t_old).abs(),
                t
            );
            if (t - t_old).abs() < tol {
                log_result!(
                    verbosity,
                    "BUBL T: calculation converged in {} step(s)\n",
                    k
                );
                return Ok(t);
            }
        }
        Err(VleError::NotConverged(String::from(
            "bubble point temperature",
        )))
    }

    /// Dew point temperature in °C at the pressure `p` in kPa for the
    /// current vapor composition. Updates the liquid composition in place.
    pub fn dew_t(&mut self, p: f64, options: SolverOptions) -> VleResult<f64> {
        self.check_ready()?;
        check_input(p, "pressure")?;
        self.validate_molefracs(false)?;
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER, TOL);

        let tsat = saturation::saturation_temperatures(&self.components, p);
        let mut t = (&self.y * &tsat).sum();
        let mut gamma = Array1::ones(self.components.len());
        let mut phi;

        log_iter!(verbosity, " iter |    residual    |   temperature");
        log_iter!(verbosity, "{:-<46}", "");
        for k in 1..=max_iter {
            let t_old = t;
            let psat = saturation::vapor_pressures(&self.components, t);
            phi = self.phis(t, p, &psat)?;
            gamma = self.converge_liquid_composition(p, &psat, &phi, gamma, max_iter, tol)?;
            let psat0 = p * (&self.y * &phi * psat[0] / (&gamma * &psat)).sum();
            t = saturation::saturation_temperature(&self.components[0], psat0);
            if !t.is_finite() {
                return Err(VleError::IterationFailed(String::from(
                    "dew point temperature",
                )));
            }
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.6} °C",
                k,
                (t - t_old).abs(),
                t
            );
            if (t - t_old).abs() < tol {
                log_result!(verbosity, "DEW T: calculation converged in {} step(s)\n", k);
                return Ok(t);
            }
        }
        Err(VleError::NotConverged(String::from("dew point temperature")))
    }

    /// Two-phase flash at the pressure `p` in kPa and temperature `t` in °C.
    ///
    /// The overall (feed) composition is taken from the liquid mole
    /// fractions. Returns the vapor fraction and updates both phase
    /// compositions in place. Fails if the feed is outside the two-phase
    /// region at the given conditions.
    pub fn flash(&mut self, p: f64, t: f64, options: SolverOptions) -> VleResult<f64> {
        self.check_ready()?;
        check_input(p, "pressure")?;
        check_input(t, "temperature")?;
        self.validate_molefracs(true)?;
        let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER, TOL);

        // bracket the two-phase region with the bubble and dew pressures
        // of the feed
        let z = self.x.clone();
        let bubl_p = self.bubl_p(t, options)?;
        self.y.assign(&z);
        let dew_p = self.dew_p(t, options)?;
        if p > bubl_p {
            return Err(VleError::Superheated);
        }
        if p < dew_p {
            return Err(VleError::Subcooled);
        }

        self.x.assign(&z);
        self.y.assign(&z);
        let psat = saturation::vapor_pressures(&self.components, t);
        let mut gamma = self.gammas(&self.x)?;
        let mut phi = self.phis(t, p, &psat)?;
        let mut beta = 0.5;

        log_iter!(verbosity, " iter |    residual    | vapor fraction");
        log_iter!(verbosity, "{:-<46}", "");
        for k in 1..=max_iter {
            let beta_old = beta;
            let kfac = &gamma * &psat / (&phi * p);

            // Newton-Raphson step on the Rachford-Rice function
            let mut f = 0.0;
            let mut df = 0.0;
            for i in 0..z.len() {
                let km1 = kfac[i] - 1.0;
                let denom = 1.0 + beta * km1;
                f += z[i] * km1 / denom;
                df -= z[i] * km1 * km1 / (denom * denom);
            }
            beta -= f / df;
            if !beta.is_finite() {
                return Err(VleError::IterationFailed(String::from("flash")));
            }

            let x_old = std::mem::replace(
                &mut self.x,
                z.iter()
                    .zip(kfac.iter())
                    .map(|(&zi, &ki)| zi / (1.0 + beta * (ki - 1.0)))
                    .collect(),
            );
            let y_old = std::mem::replace(&mut self.y, &kfac * &self.x);
            let delta = (&self.x - &x_old).mapv(f64::abs).sum()
                + (&self.y - &y_old).mapv(f64::abs).sum();

            gamma = self.gammas(&self.x)?;
            phi = self.phis(t, p, &psat)?;

            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.8}",
                k,
                (beta - beta_old).abs(),
                beta
            );
            if (beta - beta_old).abs() < tol && delta < tol {
                log_result!(verbosity, "Flash: calculation converged in {} step(s)\n", k);
                return Ok(beta);
            }
        }
        Err(VleError::NotConverged(String::from("flash")))
    }

    /// Fixed-point iteration for the liquid composition at fixed pressure:
    /// x from the current γ, renormalized to sum 1, then γ from x, until γ
    /// is stationary component-wise.
    fn converge_liquid_composition(
        &mut self,
        p: f64,
        psat: &Array1<f64>,
        phi: &Array1<f64>,
        mut gamma: Array1<f64>,
        max_iter: usize,
        tol: f64,
    ) -> VleResult<Array1<f64>> {
        for _ in 0..max_iter {
            let gamma_old = gamma;
            let mut x = &self.y * phi * p / (&gamma_old * psat);
            let sum = x.sum();
            x /= sum;
            self.x = x;
            gamma = self.gammas(&self.x)?;
            if gamma
                .iter()
                .zip(gamma_old.iter())
                .all(|(g, g_old)| (g - g_old).abs() < tol)
            {
                return Ok(gamma);
            }
        }
        Err(VleError::NotConverged(String::from("dew point composition")))
    }

    fn gammas(&self, x: &Array1<f64>) -> VleResult<Array1<f64>> {
        let (model, params) = self.activity.as_ref().ok_or_else(|| {
            VleError::UndeterminedState(String::from("no activity method selected"))
        })?;
        let gamma = model.activity_coefficients(x, params)?;
        if gamma.iter().any(|v| !v.is_finite()) {
            return Err(VleError::IterationFailed(String::from(
                "activity coefficients",
            )));
        }
        Ok(gamma)
    }

    fn phis(&self, t: f64, p: f64, psat: &Array1<f64>) -> VleResult<Array1<f64>> {
        let model = self.fugacity.as_ref().ok_or_else(|| {
            VleError::UndeterminedState(String::from("no fugacity method selected"))
        })?;
        model.fugacity_coefficients(t, p, psat, &self.y)
    }

    fn check_ready(&self) -> VleResult<()> {
        if self.components.is_empty() {
            return Err(VleError::UndeterminedState(String::from(
                "no components configured",
            )));
        }
        if self.activity.is_none() {
            return Err(VleError::UndeterminedState(String::from(
                "no activity method selected",
            )));
        }
        if self.fugacity.is_none() {
            return Err(VleError::UndeterminedState(String::from(
                "no fugacity method selected",
            )));
        }
        for c in &self.components {
            if !c.antoine_data_available() {
                return Err(VleError::MissingParameters(format!(
                    "Antoine constants for {}",
                    c.name
                )));
            }
        }
        Ok(())
    }

    fn validate_molefracs(&self, liquid: bool) -> VleResult<()> {
        let (fracs, desc) = if liquid {
            (&self.x, "liquid")
        } else {
            (&self.y, "vapor")
        };
        if fracs.iter().any(|v| v.is_nan()) {
            return Err(VleError::InvalidMoleFractions(format!(
                "{desc} mole fractions are not set"
            )));
        }
        if fracs.iter().any(|&v| v <= 0.0) {
            return Err(VleError::InvalidMoleFractions(format!(
                "{desc} mole fractions must be positive"
            )));
        }
        if (fracs.sum() - 1.0).abs() > EPSILON {
            return Err(VleError::InvalidMoleFractions(format!(
                "{desc} mole fractions must sum to 1"
            )));
        }
        Ok(())
    }
}

fn check_input(value: f64, name: &str) -> VleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(VleError::InvalidInput(format!(
            "{name} is not a finite number"
        )))
    }
}
