use thiserror::Error;

use crate::lots::CalculatorError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lot calculation failed: {0}")]
    Calculator(#[from] CalculatorError),

    #[error("Input validation failed: {0}")]
    Validation(String),
}

// Add From implementation for serde_json::Error
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}
