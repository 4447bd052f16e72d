//! Non-negative catalog prices in Sri Lankan rupees.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative")]
    Negative,
    #[error("price must be below 10,000,000,000")]
    TooLarge,
    #[error("price cannot have more than 2 decimal places")]
    TooPrecise,
}

/// Decimal places stored per price (`NUMERIC(12, 2)`).
const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound that fits `NUMERIC(12, 2)`.
const PRICE_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// A price in LKR.
///
/// Serialized as a decimal string (`"1250.00"`) so no precision is lost in
/// JSON; numeric JSON input is accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// # Errors
    ///
    /// Returns [`PriceError`] for amounts below zero, at or above ten
    /// billion, or with more than two significant decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount >= PRICE_LIMIT {
            return Err(PriceError::TooLarge);
        }
        if amount.normalize().scale() > PRICE_SCALE {
            return Err(PriceError::TooPrecise);
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs. {:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Price::new(Decimal::new(-1, 2)), Err(PriceError::Negative));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_fits_numeric_12_2() {
        let just_below = Decimal::new(999_999_999_999, 2);
        assert!(Price::new(just_below).is_ok());
        assert_eq!(
            Price::new(Decimal::new(10_000_000_000, 0)),
            Err(PriceError::TooLarge)
        );
        assert_eq!(PRICE_LIMIT, Decimal::new(10_000_000_000, 0));

        assert_eq!(Price::new(Decimal::new(12_345, 3)), Err(PriceError::TooPrecise));
        // Trailing zeros are not extra precision
        assert!(Price::new(Decimal::new(12_500, 3)).is_ok());
    }

    #[test]
    fn test_json_accepts_number_and_string() {
        let from_str: Price = serde_json::from_str("\"1250.50\"").unwrap();
        let from_num: Price = serde_json::from_str("1250.5").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"1250.50\"");
        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(95, 0)).unwrap();
        assert_eq!(price.to_string(), "Rs. 95.00");
    }
}
