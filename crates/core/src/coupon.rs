//! Coupon codes.
//!
//! The coupon table is fixed at build time. Codes are matched
//! case-insensitively and stored in their canonical uppercase form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Every redeemable code and its percentage discount.
pub const COUPONS: &[(&str, u8)] = &[
    ("FIRST10", 10),
    ("DIWALI20", 20),
    ("WELCOME15", 15),
    ("PUJA25", 25),
];

/// Percentage for a canonical (uppercase) code.
#[must_use]
pub fn lookup(code: &str) -> Option<u8> {
    COUPONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|&(_, percent)| percent)
}

/// Rejected coupon input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCouponError {
    /// Nothing was entered.
    #[error("Please enter a coupon code")]
    Empty,
    /// The code is not in the coupon table.
    #[error("Invalid coupon code")]
    Unknown(String),
}

/// A code known to be in the coupon table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode {
    code: String,
    percent: u8,
}

impl CouponCode {
    /// Look up user input in the coupon table.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCouponError::Empty`] for blank input and
    /// [`InvalidCouponError::Unknown`] for codes not in the table.
    pub fn parse(input: &str) -> Result<Self, InvalidCouponError> {
        let code = input.trim().to_uppercase();
        if code.is_empty() {
            return Err(InvalidCouponError::Empty);
        }
        lookup(&code).map_or_else(
            || Err(InvalidCouponError::Unknown(input.trim().to_owned())),
            |percent| Ok(Self { code, percent }),
        )
    }

    /// The canonical uppercase code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Percentage discount, 0-100.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = InvalidCouponError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(coupon: CouponCode) -> Self {
        coupon.code
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        let lower = CouponCode::parse("first10").unwrap();
        let upper = CouponCode::parse("FIRST10").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "FIRST10");
        assert_eq!(lower.percent(), 10);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(CouponCode::parse("  puja25 ").unwrap().percent(), 25);
    }

    #[test]
    fn test_unknown_and_empty_codes() {
        assert_eq!(
            CouponCode::parse("BOGUS"),
            Err(InvalidCouponError::Unknown("BOGUS".to_string()))
        );
        assert_eq!(CouponCode::parse("   "), Err(InvalidCouponError::Empty));
    }

    #[test]
    fn test_every_table_entry_parses() {
        for (code, percent) in COUPONS {
            assert_eq!(CouponCode::parse(code).unwrap().percent(), *percent);
        }
    }

    #[test]
    fn test_serializes_as_plain_code() {
        let coupon = CouponCode::parse("diwali20").unwrap();
        assert_eq!(serde_json::to_string(&coupon).unwrap(), "\"DIWALI20\"");

        let parsed: CouponCode = serde_json::from_str("\"welcome15\"").unwrap();
        assert_eq!(parsed.percent(), 15);
        assert!(serde_json::from_str::<CouponCode>("\"NOPE\"").is_err());
    }
}
