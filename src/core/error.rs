//! Error types for machine operations.

use thiserror::Error;

/// Underlying reason a preparation could not go ahead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// Every outlet is busy; the request was rejected without waiting.
    #[error("all slots are occupied")]
    AllSlotsOccupied,
    /// The requested beverage has no recipe.
    #[error("beverage not found")]
    BeverageNotFound,
    /// A required ingredient has never been registered.
    #[error("{0} is not available")]
    IngredientNotFound(String),
    /// A required ingredient exists but its stock is below the requirement.
    #[error("{0} is not sufficient")]
    InsufficientQuantity(String),
}

/// Caller-visible preparation failure carrying the beverage name and its cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{beverage} cannot be prepared because {cause}")]
pub struct PreparationError {
    /// Beverage that was requested.
    pub beverage: String,
    /// What stopped the preparation.
    #[source]
    pub cause: MachineError,
}

impl PreparationError {
    /// Wrap a cause for the given beverage.
    pub fn new(beverage: impl Into<String>, cause: MachineError) -> Self {
        Self {
            beverage: beverage.into(),
            cause,
        }
    }

    /// True when the request never got an outlet.
    pub const fn is_rejection(&self) -> bool {
        matches!(self.cause, MachineError::AllSlotsOccupied)
    }
}

/// Errors raised while loading or validating machine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Document parsed but holds invalid values.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Config file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Required environment variable is missing.
    #[error("environment variable `{0}` not set")]
    MissingEnv(&'static str),
}

/// Outcome of a single ingredient ledger operation.
pub type MachineResult<T> = Result<T, MachineError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
