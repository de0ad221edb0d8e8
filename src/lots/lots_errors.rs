use thiserror::Error;

// --- Define Result Type ---
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Failures of the allocation engine itself. Data-quality conditions
/// (over-selling, missing fields, bad dates) are tolerated by contract and
/// never surface here.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Internal error: {0}")]
    Internal(String), // For unexpected logic failures
}
