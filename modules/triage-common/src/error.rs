use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analyzer error: {0}")]
    Analyzer(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TriageError {
    /// Structurally invalid input, as opposed to a failure inside the service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TriageError::InvalidInput(_))
    }
}
