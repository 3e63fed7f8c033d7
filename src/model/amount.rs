//! Amount type for reading and printing monetary values in Brazilian reais.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles values written with or
//! without the `R$` symbol and with or without `.` thousands separators, e.g. `R$ 1.234,56`,
//! `1234,56` or `1234.56`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

const SYMBOL: &str = "R$";

/// Represents how an amount was (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ symbol: true, grouping: true }` -> `-R$ 60.000,00`
///  - `AmountFormat{ symbol: false, grouping: true }` -> `-60.000,00`
///  - `AmountFormat{ symbol: false, grouping: false }` -> `-60000,00`
///  - `AmountFormat{ symbol: true, grouping: false }` -> `-R$ 60000,00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether the `R$` symbol is present.
    symbol: bool,
    /// Whether `.` is present as a thousands separator.
    grouping: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format has the currency symbol and thousands separators: e.g. `R$ 60.000,00`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    symbol: true,
    grouping: true,
};

/// Represents an amount of money.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
///
/// A `,` in the input marks the decimal separator, in which case every `.` is a thousands
/// separator. Input without a `,` is read as a plain decimal number.
///
/// # Examples
///
/// ```
/// # use famfin::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("R$ 1.234,50").unwrap();
/// assert_eq!(amount.to_string(), "R$ 1.234,50");
///
/// let plain = Amount::from_str("1234.5").unwrap();
/// assert_eq!(plain.value(), amount.value());
/// assert_eq!(plain.to_string(), "1234,50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    pub const fn new_with_format(value: Decimal, format: AmountFormat) -> Self {
        Self { value, format }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let (symbol, number) = match unsigned.strip_prefix(SYMBOL) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, unsigned),
        };

        // With a comma present, dots can only be thousands separators
        let (grouping, normalized) = if number.contains(',') {
            (number.contains('.'), number.replace('.', "").replace(',', "."))
        } else {
            (false, number.to_string())
        };

        let mut value = Decimal::from_str(&normalized).map_err(AmountError)?;
        if negative {
            value.set_sign_negative(true);
        }
        Ok(Amount {
            value,
            format: AmountFormat { symbol, grouping },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value().abs().round_dp(2);
        let sym = if self.format.symbol { "R$ " } else { "" };

        let digits = if self.format.grouping {
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
                .chars()
                .map(|c| match c {
                    ',' => '.',
                    '.' => ',',
                    other => other,
                })
                .collect::<String>()
        } else {
            format!("{num:.2}").replace('.', ",")
        };

        write!(f, "{sign}{sym}{digits}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_with_symbol_and_grouping() {
        let amount = Amount::from_str("R$ 1.234,56").unwrap();
        assert_eq!(amount.value(), dec("1234.56"));
    }

    #[test]
    fn test_parse_symbol_without_space() {
        let amount = Amount::from_str("R$50,00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_plain_decimal_point() {
        let amount = Amount::from_str("50.25").unwrap();
        assert_eq!(amount.value(), dec("50.25"));
    }

    #[test]
    fn test_parse_comma_decimal() {
        let amount = Amount::from_str("50,25").unwrap();
        assert_eq!(amount.value(), dec("50.25"));
    }

    #[test]
    fn test_parse_negative_with_symbol() {
        let amount = Amount::from_str("-R$ 50,00").unwrap();
        assert_eq!(amount.value(), dec("-50.00"));
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_multiple_groups() {
        let amount = Amount::from_str("1.234.567,89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("  ").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("R$ abc").is_err());
    }

    #[test]
    fn test_display_default_format() {
        let amount = Amount::new(dec("60000"));
        assert_eq!(amount.to_string(), "R$ 60.000,00");
    }

    #[test]
    fn test_display_negative() {
        let amount = Amount::new(dec("-50.5"));
        assert_eq!(amount.to_string(), "-R$ 50,50");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Amount::new(Decimal::ZERO).to_string(), "R$ 0,00");
    }

    #[test]
    fn test_display_retains_input_format() {
        let s = "1.000.000,00";
        assert_eq!(Amount::from_str(s).unwrap().to_string(), s);

        let s = "-R$ 1000000,00";
        assert_eq!(Amount::from_str(s).unwrap().to_string(), s);
    }

    #[test]
    fn test_serde_as_string() {
        let amount = Amount::new(dec("5000"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"R$ 5.000,00\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_equality_is_format_sensitive() {
        let a = Amount::from_str("R$ 50,00").unwrap();
        let b = Amount::from_str("50.00").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let zero = Amount::from_str("0,00").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }
}
