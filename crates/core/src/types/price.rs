//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront sells in Indian rupees only, so a [`Price`] is a bare
//! decimal amount. Catalog prices are whole rupees; fractional amounts are
//! still representable and display with two decimals.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A rupee amount.
///
/// ```
/// use puja_samagri_core::Price;
///
/// let kit = Price::from_rupees(849);
/// assert_eq!(kit.to_string(), "₹849");
/// assert_eq!((kit * 2).to_string(), "₹1,698");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self((self.0 - other.0).max(Decimal::ZERO))
    }

    /// `percent`% of this amount, rounded to the nearest whole rupee.
    ///
    /// Halves round away from zero, so ₹1,245 at 10% is ₹125.
    #[must_use]
    pub fn percent(self, percent: u8) -> Self {
        let raw = self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        Self(raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0.normalize();
        let sign = if amount.is_sign_negative() { "-" } else { "" };
        let abs = amount.abs();

        if abs.fract().is_zero() {
            let whole = abs.trunc().to_string();
            write!(f, "{sign}₹{}", group_thousands(&whole))
        } else {
            let fixed = format!("{:.2}", abs.round_dp(2));
            let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            write!(f, "{sign}₹{}.{fraction}", group_thousands(whole))
        }
    }
}

/// Insert a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
