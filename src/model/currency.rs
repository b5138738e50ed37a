//! Parsing of currency-formatted price text such as `$1234.56`.
//!
//! The conventions (symbol, decimal separator, grouping separator) are carried by an explicit
//! `CurrencyFormat` value rather than by any process-wide locale setting.

use crate::error::SalesError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Describes how prices are written in the sales data.
///
/// # Examples
///  - `CurrencyFormat{ symbol: "$", decimal_separator: '.', grouping_separator: None }`
///    parses `$1234.56`
///  - `CurrencyFormat{ symbol: "€", decimal_separator: ',', grouping_separator: Some('.') }`
///    parses `€1.234,56`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// The currency symbol that may prefix the number.
    pub symbol: String,
    /// The character separating the integer part from the fraction.
    pub decimal_separator: char,
    /// The thousands separator, if the data uses one.
    pub grouping_separator: Option<char>,
}

impl Default for CurrencyFormat {
    /// US dollars in the `C.UTF-8` convention: `$1234.56`, no grouping.
    fn default() -> Self {
        Self {
            symbol: String::from("$"),
            decimal_separator: '.',
            grouping_separator: None,
        }
    }
}

impl CurrencyFormat {
    /// Parses `text` into an exact decimal value. No rounding is performed.
    ///
    /// # Errors
    /// Returns `SalesError::MalformedCurrency` if, once the symbol and any configured grouping
    /// separators are removed, the remainder is not a plain decimal number.
    pub fn parse(&self, text: &str) -> Result<Decimal, SalesError> {
        let malformed = || SalesError::MalformedCurrency {
            text: text.to_string(),
        };

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        // The symbol may sit before or after the sign: "-$5.00" or "$-5.00"
        let mut number = unsigned;
        if !self.symbol.is_empty() {
            if let Some(rest) = number.strip_prefix(self.symbol.as_str()) {
                number = rest;
            }
        }
        let (negative, number) = match number.strip_prefix('-') {
            Some(rest) if !negative => (true, rest),
            Some(_) => return Err(malformed()),
            None => (negative, number),
        };

        let mut normalized = String::with_capacity(number.len() + 1);
        if negative {
            normalized.push('-');
        }
        let mut digits = 0usize;
        let mut seen_decimal = false;
        for c in number.chars() {
            if Some(c) == self.grouping_separator {
                continue;
            } else if c == self.decimal_separator && !seen_decimal {
                seen_decimal = true;
                if digits == 0 {
                    normalized.push('0');
                }
                normalized.push('.');
            } else if c.is_ascii_digit() {
                digits += 1;
                normalized.push(c);
            } else {
                return Err(malformed());
            }
        }
        if digits == 0 {
            return Err(malformed());
        }
        // "500." is accepted as "500"
        if normalized.ends_with('.') {
            normalized.pop();
        }

        Decimal::from_str(&normalized).map_err(|_| malformed())
    }
}

/// Parses `text` with the given `format`. See [`CurrencyFormat::parse`].
pub fn parse_currency(text: &str, format: &CurrencyFormat) -> Result<Decimal, SalesError> {
    format.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(s: &str) -> Result<Decimal, SalesError> {
        parse_currency(s, &CurrencyFormat::default())
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        assert_eq!(usd("$1234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn test_parse_without_dollar_sign() {
        assert_eq!(usd("50.00").unwrap(), dec!(50.00));
    }

    #[test]
    fn test_parse_keeps_precision() {
        let value = usd("$18731.7899").unwrap();
        assert_eq!(value, dec!(18731.7899));
        assert_eq!(value.scale(), 4);
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(usd("-$50.00").unwrap(), dec!(-50.00));
        assert_eq!(usd("$-50.00").unwrap(), dec!(-50.00));
        assert!(usd("-$-50.00").is_err());
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(usd("  $50.00  ").unwrap(), dec!(50.00));
    }

    #[test]
    fn test_parse_integer_and_bare_fraction() {
        assert_eq!(usd("$500").unwrap(), dec!(500));
        assert_eq!(usd("$.5").unwrap(), dec!(0.5));
    }

    #[test]
    fn test_malformed() {
        for text in ["", "$", "abc", "$12a.00", "$1.2.3", "$1,000.00", "1e5", "$ 5", "$."] {
            let err = usd(text).unwrap_err();
            assert_eq!(
                err,
                SalesError::MalformedCurrency {
                    text: text.to_string()
                },
                "{text}"
            );
        }
    }

    #[test]
    fn test_grouping_separator_when_configured() {
        let format = CurrencyFormat {
            grouping_separator: Some(','),
            ..CurrencyFormat::default()
        };
        assert_eq!(format.parse("$1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn test_european_format() {
        let format = CurrencyFormat {
            symbol: String::from("€"),
            decimal_separator: ',',
            grouping_separator: Some('.'),
        };
        assert_eq!(format.parse("€1.234,56").unwrap(), dec!(1234.56));
        assert!(format.parse("€1,2,3").is_err());
    }

    #[test]
    fn test_empty_symbol() {
        let format = CurrencyFormat {
            symbol: String::new(),
            ..CurrencyFormat::default()
        };
        assert_eq!(format.parse("42.10").unwrap(), dec!(42.10));
        assert!(format.parse("$42.10").is_err());
    }

    #[test]
    fn test_deserialize_partial_format() {
        let format: CurrencyFormat = serde_json::from_str(r#"{"symbol": "£"}"#).unwrap();
        assert_eq!(format.symbol, "£");
        assert_eq!(format.decimal_separator, '.');
        assert_eq!(format.grouping_separator, None);
    }
}
