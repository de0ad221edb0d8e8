pub mod lot_calculator;
pub mod lots_errors;
pub mod lots_model;

pub use lot_calculator::process_instruments;
pub use lots_errors::{CalculatorError, Result};
pub use lots_model::{InstrumentHolding, Lot};
