//! Fixed-precision value types: [`Price`], [`Money`], [`Quantity`].
//!
//! All three wrap [`rust_decimal::Decimal`]. `Price` additionally enforces a per-instrument tick
//! precision at construction via banker's rounding, matching the quantisation rule of a
//! deterministic backtest (same inputs must always produce the same rounded prices).

use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A price quantised to an instrument's tick precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    /// Quantise `value` to `tick_precision` fractional digits using banker's rounding.
    pub fn quantize(value: Decimal, tick_precision: u32) -> Self {
        Price(value.round_dp_with_strategy(tick_precision, RoundingStrategy::MidpointNearestEven))
    }

    pub fn raw(self) -> Decimal {
        self.0
    }

    /// Shift this price by a tick-multiple amount (slippage application), re-quantising to
    /// `tick_precision`.
    pub fn shift(self, amount: Decimal, tick_precision: u32) -> Self {
        Price::quantize(self.0 + amount, tick_precision)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add<Decimal> for Price {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        self.0 + rhs
    }
}

impl Sub<Price> for Price {
    type Output = Decimal;
    fn sub(self, rhs: Price) -> Decimal {
        self.0 - rhs.0
    }
}

/// A signed cash amount. Carries no fixed precision of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    pub fn raw(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

/// A strictly-positive order or position size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Result<Self, SimError> {
        if value <= Decimal::ZERO {
            return Err(SimError::NonPositiveQuantity(value));
        }
        Ok(Quantity(value))
    }

    pub fn raw(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantizes_to_tick_precision() {
        let p = Price::quantize(dec!(1.10005), 4);
        // midpoint-nearest-even on the 5th digit (0) rounds down
        assert_eq!(p.raw(), dec!(1.1000));
    }

    #[test]
    fn shift_requantizes() {
        let p = Price::quantize(dec!(1.1000), 4);
        let shifted = p.shift(dec!(0.0001), 4);
        assert_eq!(shifted.raw(), dec!(1.1001));
    }

    #[test]
    fn quantity_rejects_non_positive() {
        assert!(Quantity::new(dec!(0)).is_err());
        assert!(Quantity::new(dec!(-1)).is_err());
        assert!(Quantity::new(dec!(1)).is_ok());
    }

    proptest! {
        /// Quantizing an already-quantized price is a no-op, for any tick precision.
        #[test]
        fn quantize_is_idempotent(raw in -10_000_i64..10_000, precision in 0u32..8) {
            let value = Decimal::new(raw, 0);
            let once = Price::quantize(value, precision);
            let twice = Price::quantize(once.raw(), precision);
            prop_assert_eq!(once, twice);
        }

        /// Shifting by zero never changes a price that is already at the target precision.
        #[test]
        fn shift_by_zero_is_identity(raw in -10_000_i64..10_000, precision in 0u32..8) {
            let value = Decimal::new(raw, 0);
            let price = Price::quantize(value, precision);
            prop_assert_eq!(price.shift(Decimal::ZERO, precision), price);
        }
    }
}
