use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Ensemble contains no trials")]
    EmptyEnsemble,

    #[error("Monte Carlo run cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },
}
