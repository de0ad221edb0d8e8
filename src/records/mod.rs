pub mod records_model;
pub mod records_normalizer;

pub use records_model::{RawRecord, RecordKind, TransactionRecord};
pub use records_normalizer::normalize_records;
