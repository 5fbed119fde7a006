//! Resolution of user-facing method indices to model implementations.
//!
//! The desktop application configures the available methods from an external
//! name list. The registry maps every name to a statically known model kind
//! and resolves the integer index selected in the UI to that kind, keeping
//! the insertion order of the external list.
use crate::activity::{ActivityModel, IdealSolution, Margules, VanLaar};
use crate::component::Component;
use crate::errors::{VleError, VleResult};
use crate::fugacity::{FugacityModel, IdealGas, PengRobinson, Virial};
use indexmap::IndexMap;
use std::str::FromStr;

/// The closed set of activity coefficient methods.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivityMethod {
    Ideal,
    Margules,
    VanLaar,
}

impl ActivityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ideal => "Ideal",
            Self::Margules => "Margules",
            Self::VanLaar => "Van Laar",
        }
    }

    pub fn build(&self) -> Box<dyn ActivityModel> {
        match self {
            Self::Ideal => Box::new(IdealSolution),
            Self::Margules => Box::new(Margules),
            Self::VanLaar => Box::new(VanLaar),
        }
    }
}

impl FromStr for ActivityMethod {
    type Err = VleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ideal" => Ok(Self::Ideal),
            "margules" => Ok(Self::Margules),
            "vanlaar" | "van laar" => Ok(Self::VanLaar),
            _ => Err(VleError::Error(format!("unknown activity method: {s}"))),
        }
    }
}

/// The closed set of fugacity coefficient methods.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FugacityMethod {
    Ideal,
    Virial,
    PengRobinson,
}

impl FugacityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ideal => "Ideal",
            Self::Virial => "Virial",
            Self::PengRobinson => "Peng-Robinson",
        }
    }

    /// Bind the method to a component set, precomputing the coefficient
    /// tables and failing fast on missing critical data.
    pub fn bind(&self, components: &[Component]) -> VleResult<Box<dyn FugacityModel>> {
        Ok(match self {
            Self::Ideal => Box::new(IdealGas),
            Self::Virial => Box::new(Virial::new(components)?),
            Self::PengRobinson => Box::new(PengRobinson::new(components)?),
        })
    }
}

impl FromStr for FugacityMethod {
    type Err = VleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ideal" => Ok(Self::Ideal),
            "virial" => Ok(Self::Virial),
            "pengrobinson" | "peng-robinson" => Ok(Self::PengRobinson),
            _ => Err(VleError::Error(format!("unknown fugacity method: {s}"))),
        }
    }
}

/// Ordered registry of the methods exposed to the user interface.
pub struct MethodRegistry {
    activity: IndexMap<String, ActivityMethod>,
    fugacity: IndexMap<String, FugacityMethod>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        let mut registry = Self {
            activity: IndexMap::new(),
            fugacity: IndexMap::new(),
        };
        for method in [
            ActivityMethod::Ideal,
            ActivityMethod::Margules,
            ActivityMethod::VanLaar,
        ] {
            registry.register_activity(method.name(), method);
        }
        for method in [
            FugacityMethod::Ideal,
            FugacityMethod::Virial,
            FugacityMethod::PengRobinson,
        ] {
            registry.register_fugacity(method.name(), method);
        }
        registry
    }
}

impl MethodRegistry {
    /// Build a registry from external display-name/method-name lists.
    pub fn from_names<'a>(
        activity: impl IntoIterator<Item = (&'a str, &'a str)>,
        fugacity: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> VleResult<Self> {
        let mut registry = Self {
            activity: IndexMap::new(),
            fugacity: IndexMap::new(),
        };
        for (display, name) in activity {
            registry.register_activity(display, name.parse()?);
        }
        for (display, name) in fugacity {
            registry.register_fugacity(display, name.parse()?);
        }
        Ok(registry)
    }

    pub fn register_activity(&mut self, display_name: &str, method: ActivityMethod) {
        self.activity.insert(display_name.to_owned(), method);
    }

    pub fn register_fugacity(&mut self, display_name: &str, method: FugacityMethod) {
        self.fugacity.insert(display_name.to_owned(), method);
    }

    pub fn activity_method(&self, index: usize) -> VleResult<ActivityMethod> {
        self.activity
            .get_index(index)
            .map(|(_, &method)| method)
            .ok_or(VleError::MethodNotFound(index))
    }

    pub fn fugacity_method(&self, index: usize) -> VleResult<FugacityMethod> {
        self.fugacity
            .get_index(index)
            .map(|(_, &method)| method)
            .ok_or(VleError::MethodNotFound(index))
    }

    pub fn activity_method_names(&self) -> impl Iterator<Item = &str> {
        self.activity.keys().map(String::as_str)
    }

    pub fn fugacity_method_names(&self) -> impl Iterator<Item = &str> {
        self.fugacity.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_resolve_in_list_order() {
        let registry = MethodRegistry::default();
        assert_eq!(registry.activity_method(1).unwrap(), ActivityMethod::Margules);
        assert_eq!(
            registry.fugacity_method(2).unwrap(),
            FugacityMethod::PengRobinson
        );
        assert!(registry.activity_method(3).is_err());
    }

    #[test]
    fn registry_from_external_name_list() {
        let registry = MethodRegistry::from_names(
            [("Van Laar equation", "vanlaar")],
            [("Virial equation", "virial")],
        )
        .unwrap();
        assert_eq!(registry.activity_method(0).unwrap(), ActivityMethod::VanLaar);
        assert_eq!(registry.fugacity_method(0).unwrap(), FugacityMethod::Virial);
        assert!("NRTL".parse::<ActivityMethod>().is_err());
    }
}
