use anyhow::bail;
use rust_decimal::{Decimal, RoundingStrategy};

use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

/// Largest amount accepted for a single transaction, in dollars.
///
/// Sums of this many dollars stay far inside [`Decimal`]'s range for any
/// number of lines a log can hold.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Represents an amount of money in USD currency.
///
/// The amount is stored exactly as parsed, with no rounding, so totals are
/// the true sums of their parts. The [`Display`] implementation rounds to 2
/// decimal places (half away from zero).
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Usd(Decimal);

impl Usd {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dollars = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        dollars.rescale(2);
        write!(f, "{dollars}")
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    /// Parses a decimal dollar amount, such as `20.00` or `2.5e1`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let dollars = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))?;
        if dollars.abs() > Decimal::from(MAX_AMOUNT) {
            bail!("amount out of range: {s}");
        }
        Ok(Self(dollars))
    }
}

impl Add for Usd {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Usd {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
