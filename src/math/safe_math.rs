use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DEFAULT_DIVIDE_PRECISION;

/// Number of fractional digits an input actually carries, ignoring
/// trailing zeros (`1.50` carries one decimal place, not two).
fn decimal_places(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// Exact decimal addition. Both operands are scaled to
/// `10^max(decimalsOf(a), decimalsOf(b))`, added in the integer domain and
/// rescaled back; `Decimal` performs exactly this, so no drift is possible.
pub fn safe_add(a: Decimal, b: Decimal) -> Decimal {
    (a + b).normalize()
}

/// Exact decimal subtraction. Same scaling contract as [`safe_add`].
pub fn safe_subtract(a: Decimal, b: Decimal) -> Decimal {
    (a - b).normalize()
}

/// Exact decimal multiplication at `10^(decimalsOf(a) + decimalsOf(b))`.
pub fn safe_multiply(a: Decimal, b: Decimal) -> Decimal {
    (a * b).normalize()
}

/// Division with the engine's explicit zero policy: `b == 0` yields 0,
/// never an error. Otherwise the quotient is rounded half-away-from-zero
/// to `max(decimalsOf(a), decimalsOf(b), DEFAULT_DIVIDE_PRECISION)`
/// fractional digits, so results never carry more precision than the
/// inputs plus the configured floor.
pub fn safe_divide(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        return Decimal::ZERO;
    }
    let digits = decimal_places(a)
        .max(decimal_places(b))
        .max(DEFAULT_DIVIDE_PRECISION);
    (a / b)
        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
