//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64` rounded to 2 decimal places. All arithmetic
//! goes through `Decimal` and is converted back only at the edges.

use rust_decimal::prelude::*;

/// Stored precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// 单价上限 (food.price / order_item.unit_price)
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Convert f64 to Decimal via its shortest decimal representation
///
/// `9.995_f64` is really `9.99499999…` in binary; going through the
/// shortest round-trip string yields `9.995` so the midpoint rounds up.
/// Returns `None` for non-finite values and values outside `Decimal`'s range.
#[inline]
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a price to 2 dp, half away from zero
///
/// Values `Decimal` cannot hold (non-finite, or far beyond [`MAX_PRICE`])
/// are returned unchanged; callers reject them with [`validate_price`].
pub fn round2(value: f64) -> f64 {
    match to_decimal(value) {
        Some(d) => to_f64(d),
        None => value,
    }
}

/// Check a unit price and return it rounded to 2 dp
pub fn validate_price(value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err("price must be a finite number".to_string());
    }
    if value < 0.0 {
        return Err("price must be non-negative".to_string());
    }
    if value > MAX_PRICE {
        return Err(format!("price must not exceed {}", MAX_PRICE));
    }
    Ok(round2(value))
}

/// `price × quantity`, `None` on overflow
pub fn line_total(price: f64, quantity: i64) -> Option<Decimal> {
    to_decimal(price)?.checked_mul(Decimal::from(quantity))
}

/// Exact sum of monetary values, rounded to 2 dp
///
/// `None` when a value is not representable or the sum overflows.
pub fn sum_money<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(to_decimal(v)?))
        .map(to_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_midpoint_away_from_zero() {
        assert_eq!(round2(9.995), 10.0);
        assert_eq!(round2(3.001), 3.0);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(-1.005), -1.01);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_is_idempotent() {
        for raw in [0.1, 9.995, 3.001, 12.3456, 1e6 + 0.005, 0.004, 99.999] {
            let once = round2(raw);
            assert_eq!(round2(once), once, "round2 not idempotent for {raw}");
        }
    }

    #[test]
    fn test_round2_non_finite_passthrough() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_sum_money_precision() {
        // 0.1 + 0.2 != 0.3 in f64
        assert_ne!(0.1_f64 + 0.2_f64, 0.3);
        assert_eq!(sum_money([0.1, 0.2]), Some(0.3));

        let total = sum_money(std::iter::repeat_n(0.01, 1000));
        assert_eq!(total, Some(10.0));
    }

    #[test]
    fn test_sum_money_empty() {
        assert_eq!(sum_money(Vec::<f64>::new()), Some(0.0));
    }

    #[test]
    fn test_round2_huge_value_not_zeroed() {
        // 1e30 is beyond Decimal::MAX (~7.9e28)
        assert!(to_decimal(1e30).is_none());
        assert_eq!(round2(1e30), 1e30);
        assert_eq!(round2(-1e30), -1e30);
    }

    #[test]
    fn test_validate_price_bounds() {
        assert_eq!(validate_price(0.0), Ok(0.0));
        assert_eq!(validate_price(9.995), Ok(10.0));
        assert_eq!(validate_price(MAX_PRICE), Ok(MAX_PRICE));
        assert!(validate_price(MAX_PRICE + 0.01).is_err());
        assert!(validate_price(1e30).is_err());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_sum_money_overflow_is_none() {
        assert_eq!(sum_money([5e28, 5e28]), None);
        assert_eq!(sum_money([1.0, 1e30]), None);
        assert_eq!(sum_money([1.0, f64::NAN]), None);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(9.99, 3).map(to_f64), Some(29.97));
        assert_eq!(line_total(MAX_PRICE, 9999).map(to_f64), Some(9_999_000_000.0));
        assert_eq!(line_total(5e28, 9999), None);
    }
}
