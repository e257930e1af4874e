//! Defines the error types for the bn_oracle library

use std::result;

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = result::Result<T, OracleError>;

#[derive(Debug, Error)]
pub enum OracleError {

    /// Malformed model parameters or evidence. Always detected before any computation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The evidence has zero probability under every hidden-state hypothesis, so the posterior
    /// cannot be normalized.
    #[error("Evidence {evidence} has zero probability under the model")]
    DegenerateEvidence { evidence: String },

    /// The model configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

}

impl OracleError {

    /// Check if this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, OracleError::Validation(_))
    }

    /// Check if this error was raised because the evidence is impossible under the model
    pub fn is_degenerate(&self) -> bool {
        matches!(self, OracleError::DegenerateEvidence { .. })
    }

}

/// Every way the inputs to model construction or a query can be malformed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {

    /// A name did not match any of the six variables in the network
    #[error("Unknown variable `{0}`")]
    UnknownVariable(String),

    /// A hidden cause was supplied where only observed effects are allowed
    #[error("Hidden cause `{0}` may only be queried, never observed")]
    HiddenCauseObserved(String),

    /// The same effect was observed with two different values
    #[error("Conflicting observations for `{0}`")]
    ConflictingEvidence(String),

    /// A hidden cause has no prior
    #[error("Missing prior for `{0}`")]
    MissingPrior(String),

    /// An effect has no conditional probability table
    #[error("Missing CPT for `{0}`")]
    MissingCpt(String),

    /// A CPT is missing one of the four parent configurations
    #[error("CPT for `{effect}` is missing parent configuration (PPH={pph}, PPR={ppr})")]
    MissingParentConfig { effect: String, pph: u8, ppr: u8 },

    /// A parent configuration key was not a pair of states in {0, 1}
    #[error("Invalid parent configuration `{0}`")]
    InvalidParentConfig(String),

    /// A probability was outside [0, 1] or not a finite number
    #[error("Probability {value} for `{context}` is outside [0, 1]")]
    ProbabilityOutOfRange { context: String, value: f64 },

    /// An observed value could not be read as a boolean
    #[error("Invalid observed value `{0}`, expected true/false/1/0")]
    InvalidObservation(String),

    /// A variable was given a distribution of the wrong kind
    #[error("Invalid initialization for `{0}`")]
    InvalidInitialization(String),

    /// An assignment was missing variables where a complete assignment was required. Holds the
    /// names of the missing variables.
    #[error("Missing assignments to the following required variables: {0:?}")]
    IncompleteAssignment(Vec<String>),

    /// A variable was added to the model more than once
    #[error("Variable `{0}` was encountered twice")]
    DuplicateVariable(String),

}

/// Check that ```p``` is a probability, reporting ```context``` when it is not.
pub fn check_probability(context: &str, p: f64) -> result::Result<f64, ValidationError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ValidationError::ProbabilityOutOfRange { context: String::from(context), value: p })
    }
}
