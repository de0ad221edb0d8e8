pub mod constants;
pub mod errors;
pub mod instruments;
pub mod lots;
pub mod math;
pub mod portfolio;
pub mod records;
pub mod utils;

pub use errors::{Error, Result};
pub use instruments::RawInstrument;
pub use lots::{InstrumentHolding, Lot};
pub use portfolio::*;
pub use records::{RawRecord, RecordKind, TransactionRecord};
