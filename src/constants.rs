/// Decimal precision for derived monetary values when serialized
pub const DECIMAL_PRECISION: u32 = 8;

/// Minimum fractional digits kept by `safe_divide`
pub const DEFAULT_DIVIDE_PRECISION: u32 = 8;

/// Base URL of the quote site the per-instrument display link points at
pub const INVESTING_BASE_URL: &str = "https://es.investing.com";
