use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("Invalid job definition: {0}")]
    InvalidJobDefinition(String),

    #[error("Invalid policy parameter: {0}")]
    InvalidPolicyParameter(String),

    #[error("Unknown scheduling policy: {0}")]
    UnknownPolicy(String),

    #[error("A print run is already in progress")]
    RunInProgress,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PrintError>;
