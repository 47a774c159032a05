use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::MoneyError;

/// An exact amount of the journal's single currency.
///
/// The value is kept as a whole number of cents, so every amount carries exactly two
/// fractional digits and arithmetic never drifts.  Amounts are written the same way in
/// journal files:
///
/// ```text
/// 2021-03-02 UBER EATS
///     Liabilities:Amex  -23.10
///     expenses:unknown  23.10
/// ```
///
/// The operators behave like the ones on integers and must not overflow.  Amounts read from
/// files or sources are combined with the `checked_*` methods.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Number of fractional digits of every amount.
    pub const SCALE: u32 = 2;

    pub const fn from_cents(cents: i64) -> Self {
        Money { cents }
    }

    pub const fn zero() -> Self {
        Money { cents: 0 }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub fn abs(self) -> Self {
        Money::from_cents(self.cents.abs())
    }

    pub fn is_zero(self) -> bool {
        self.cents == 0
    }

    pub fn is_positive(self) -> bool {
        self.cents > 0
    }

    pub fn is_negative(self) -> bool {
        self.cents < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.cents.checked_sub(rhs.cents).map(Money::from_cents)
    }

    pub fn checked_abs(self) -> Option<Money> {
        self.cents.checked_abs().map(Money::from_cents)
    }

    pub fn checked_neg(self) -> Option<Money> {
        self.cents.checked_neg().map(Money::from_cents)
    }

    /// Adds up `amounts`, or `None` when the total does not fit.
    ///
    /// Running totals may leave the representable range as long as the final one is back in it.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        let total: i128 = amounts.into_iter().map(|money| i128::from(money.cents)).sum();
        i64::try_from(total).ok().map(Money::from_cents)
    }

    /// Divides the amount into `parts` values that add back up to it exactly.
    ///
    /// Every part gets the magnitude divided by `parts`; the cents left over are handed out
    /// one at a time starting with the first part.  The sign of the original amount is
    /// applied to every part, so `-1.01` splits in two as `[-0.51, -0.50]`.
    pub fn split(self, parts: usize) -> Result<Vec<Money>, MoneyError> {
        if parts == 0 {
            return Err(MoneyError::ZeroParts);
        }
        let count = i64::try_from(parts).map_err(|_| MoneyError::Overflow)?;
        let magnitude = self.cents.checked_abs().ok_or(MoneyError::Overflow)?;
        let (share, leftover) = (magnitude / count, magnitude % count);
        let sign = self.cents.signum();

        Ok((0..count)
            .map(|i| {
                let extra = if i < leftover { 1 } else { 0 };
                Money::from_cents(sign * (share + extra))
            })
            .collect())
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.cents, Self::SCALE)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::Overflow)?;
        if !cents.fract().is_zero() {
            return Err(MoneyError::TooPrecise(value.to_string()));
        }
        cents
            .trunc()
            .to_i64()
            .map(Money::from_cents)
            .ok_or(MoneyError::Overflow)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed).map_err(|e| MoneyError::Malformed {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        Money::try_from(decimal)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents + rhs.cents)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.cents += rhs.cents;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::from_cents(self.cents - rhs.cents)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_cents(-self.cents)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
