pub mod safe_math;

pub use safe_math::{safe_add, safe_divide, safe_multiply, safe_subtract};
