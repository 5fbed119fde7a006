use thiserror::Error;

/// Error type for improperly configured systems and convergence problems.
#[derive(Error, Debug)]
pub enum VleError {
    // generic error with custom message
    #[error("{0}")]
    Error(String),

    // errors related to algorithms
    #[error("`{0}` did not converge within the maximum number of iterations.")]
    NotConverged(String),
    #[error("`{0}` encountered illegal values during the iteration.")]
    IterationFailed(String),
    #[error("Invalid state in {0}: {1} = {2}.")]
    InvalidState(String, String, f64),

    // errors related to the system configuration
    #[error("The {0} method is restricted to binary systems while {1} components are configured.")]
    BinarySystemsOnly(String, usize),
    #[error("The system is configured for {0} components while the input specifies {1} components.")]
    IncompatibleComponents(usize, usize),
    #[error("Missing parameters: {0}")]
    MissingParameters(String),
    #[error("The method index {0} is not registered.")]
    MethodNotFound(usize),
    #[error("Undetermined state: {0}.")]
    UndeterminedState(String),

    // errors related to user input
    #[error("Invalid mole fractions: {0}")]
    InvalidMoleFractions(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // flash infeasibility
    #[error("The mixture is superheated at the given conditions. Flash calculation is not possible.")]
    Superheated,
    #[error("The mixture is subcooled at the given conditions. Flash calculation is not possible.")]
    Subcooled,

    // json errors
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Convenience type for `Result<T, VleError>`.
pub type VleResult<T> = Result<T, VleError>;
