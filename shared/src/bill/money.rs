//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` (that is what the backend sends). Every sum or
//! division goes through `Decimal`. Derived bill figures come back unrounded;
//! amounts handed to the payment step are rounded to the cent.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal; NaN and infinities become zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Convert Decimal back to f64 without rounding
#[inline]
pub fn to_f64_exact(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Sum a sequence of amounts
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().map(to_decimal).sum()
}

/// Divide an amount evenly, zero when there is nobody to divide by
pub fn share(amount: Decimal, people: usize) -> Decimal {
    if people == 0 {
        return Decimal::ZERO;
    }
    amount / Decimal::from(people)
}

/// Positive, finite amount
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && to_decimal(value) > Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_accumulation_precision() {
        let total = sum(std::iter::repeat_n(0.01, 1000));
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_share() {
        assert_eq!(to_f64(share(to_decimal(10.0), 3)), 3.33);
        assert_eq!(to_f64(share(to_decimal(10.0), 0)), 0.0);
        assert_eq!(to_f64(share(to_decimal(0.05), 2)), 0.03);
    }

    #[test]
    fn test_exact_keeps_sub_cent_values() {
        assert_eq!(to_f64_exact(to_decimal(0.005)), 0.005);
        assert_eq!(to_f64(to_decimal(0.005)), 0.01);
        let third = to_f64_exact(share(to_decimal(10.0), 3));
        assert!((third * 3.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_positive() {
        assert!(is_positive(0.01));
        assert!(!is_positive(0.0));
        assert!(!is_positive(-1.0));
        assert!(!is_positive(f64::NAN));
    }
}
