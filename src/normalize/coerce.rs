// src/normalize/coerce.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::CoerceError;

/// A signed decimal, either grouped in threes by one separator kind
/// (`,`, `_`, space, NBSP) or a plain digit run.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[-+]?(?:\d{1,3}(?:,\d{3})+|\d{1,3}(?:_\d{3})+|\d{1,3}(?: \d{3})+|\d{1,3}(?:\x{a0}\d{3})+|\d+)(?:\.\d+)?$",
    )
    .unwrap()
});

/// A symbol prefix, then a single amount, then nothing but whitespace.
static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\D*?)((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)\s*$").unwrap()
});

fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '\u{a0}'))
        .collect()
}

fn number_text(raw: &str) -> Result<String, CoerceError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CoerceError::Empty("number"));
    }
    if !NUMBER.is_match(s) {
        return Err(CoerceError::NotANumber(raw.to_string()));
    }
    Ok(strip_separators(s))
}

/// `"1,965"` → `1965`.
pub fn parse_integer(raw: &str) -> Result<i64, CoerceError> {
    number_text(raw)?
        .parse()
        .map_err(|_| CoerceError::NotANumber(raw.to_string()))
}

/// `"4,715,691,000"` → `4.715691e9`. Rejects anything that is not finite.
pub fn parse_number(raw: &str) -> Result<f64, CoerceError> {
    number_text(raw)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoerceError::NotANumber(raw.to_string()))
}

/// `"£51.77"` → `51.77`. Any leading currency symbol (or mis-decoded `Â£`) is ignored.
pub fn parse_currency(raw: &str) -> Result<f64, CoerceError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CoerceError::Empty("price"));
    }
    let caps = PRICE
        .captures(s)
        .ok_or_else(|| CoerceError::NotAPrice(raw.to_string()))?;
    // Only currency symbols may precede the amount.
    if caps[1]
        .chars()
        .any(|c| (c.is_alphanumeric() && c != 'Â') || c == '-')
    {
        return Err(CoerceError::NotAPrice(raw.to_string()));
    }
    strip_separators(&caps[2])
        .parse::<f64>()
        .map_err(|_| CoerceError::NotAPrice(raw.to_string()))
}

/// Star rating as a word (`"Three"`) or digit (`"3"`), always within 1..=5.
pub fn parse_rating(raw: &str) -> Result<u8, CoerceError> {
    let stars = match raw.trim().to_ascii_lowercase().as_str() {
        "one" | "1" => 1,
        "two" | "2" => 2,
        "three" | "3" => 3,
        "four" | "4" => 4,
        "five" | "5" => 5,
        _ => return Err(CoerceError::BadRating(raw.to_string())),
    };
    Ok(stars)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
}

/// `"In stock"`, `"In stock (22 available)"`, `"Out of stock"`.
pub fn parse_availability(raw: &str) -> Result<Availability, CoerceError> {
    let s = raw.trim().to_ascii_lowercase();
    if s.starts_with("out of stock") || s.starts_with("unavailable") {
        Ok(Availability::OutOfStock)
    } else if s.starts_with("in stock") || s.starts_with("available") {
        Ok(Availability::InStock)
    } else {
        Err(CoerceError::BadAvailability(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_strips_separators() {
        assert_eq!(parse_integer("1965"), Ok(1965));
        assert_eq!(parse_integer(" 2,020 "), Ok(2020));
        assert_eq!(parse_integer("-44"), Ok(-44));
        assert!(parse_integer("20.5").is_err());
        assert!(parse_integer("n/a").is_err());
        assert_eq!(parse_integer(""), Err(CoerceError::Empty("number")));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("4,715,691,000"), Ok(4_715_691_000.0));
        assert_eq!(parse_number("5\u{a0}259\u{a0}144"), Ok(5_259_144.0));
        assert_eq!(parse_number("12.5"), Ok(12.5));
        assert!(parse_number("1,2,3").is_err());
        assert!(parse_number("1234,567").is_err());
        assert!(parse_number("1,234_567").is_err());
        assert_eq!(parse_number("1_000.25"), Ok(1000.25));
        assert!(parse_number("-10.5%").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("£51.77"), Ok(51.77));
        assert_eq!(parse_currency("Â£53.74"), Ok(53.74));
        assert_eq!(parse_currency("$1,299.00"), Ok(1299.0));
        assert_eq!(parse_currency(" € 10 "), Ok(10.0));
        assert!(parse_currency("free").is_err());
        assert!(parse_currency("GBP 10").is_err());
        assert!(parse_currency("£51.77abc").is_err());
        assert!(parse_currency("£1.2.3").is_err());
        assert!(parse_currency("£12,34").is_err());
        assert!(parse_currency("£5 - £9").is_err());
        assert!(parse_currency("£-5").is_err());
        assert_eq!(parse_currency(""), Err(CoerceError::Empty("price")));
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("Three"), Ok(3));
        assert_eq!(parse_rating("five"), Ok(5));
        assert_eq!(parse_rating("1"), Ok(1));
        assert!(parse_rating("Zero").is_err());
        assert!(parse_rating("6").is_err());
    }

    #[test]
    fn test_parse_availability() {
        assert_eq!(parse_availability("In stock"), Ok(Availability::InStock));
        assert_eq!(
            parse_availability("In stock (22 available)"),
            Ok(Availability::InStock)
        );
        assert_eq!(parse_availability("Out of stock"), Ok(Availability::OutOfStock));
        assert!(parse_availability("Preorder").is_err());
    }
}
