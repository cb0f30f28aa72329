//! Data models for meterlog
//!
//! A `Reading` is one recorded meter index for a `Category` at a date. The
//! value is the cumulative index in cubic meters, never a delta.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The utility being metered
///
/// Persisted as the tags `"agua"` and `"gas"`. Any other tag found in the
/// store is kept verbatim in `Unknown` and displayed untranslated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Water,
    Gas,
    Unknown(String),
}

impl Category {
    /// Tag used in the persisted store
    pub fn tag(&self) -> &str {
        match self {
            Category::Water => "agua",
            Category::Gas => "gas",
            Category::Unknown(tag) => tag,
        }
    }

    /// Display label, shared by the history table and both exporters
    pub fn label(&self) -> &str {
        match self {
            Category::Water => "Água",
            Category::Gas => "Gás",
            Category::Unknown(tag) => tag,
        }
    }

    /// Next known category, wrapping (used by the TUI form toggle)
    pub fn toggle(&self) -> Self {
        match self {
            Category::Water => Category::Gas,
            _ => Category::Water,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "agua" => Category::Water,
            "gas" => Category::Gas,
            _ => Category::Unknown(tag),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

/// Parses user input; only the two known categories are accepted
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" | "agua" | "água" => Ok(Category::Water),
            "gas" | "gás" => Ok(Category::Gas),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date is required")]
    EmptyDate,
    #[error("Reading '{0}' is not a number")]
    InvalidValue(String),
    #[error("Unknown category '{0}' (expected water or gas)")]
    UnknownCategory(String),
}

/// One recorded meter index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "type")]
    pub category: Category,
    pub date: String,
    pub value: f64,
}

impl Reading {
    pub fn new(category: Category, date: impl Into<String>, value: f64) -> Self {
        Self {
            category,
            date: date.into(),
            value,
        }
    }

    /// Validate raw form input and build a reading
    ///
    /// The date must be non-empty and the value must parse as a finite
    /// number. Nothing else is checked.
    pub fn from_input(category: Category, date: &str, value: &str) -> Result<Self, ValidationError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(ValidationError::EmptyDate);
        }

        let value = value.trim();
        let parsed: f64 = value
            .parse()
            .map_err(|_| ValidationError::InvalidValue(value.to_string()))?;
        if !parsed.is_finite() {
            return Err(ValidationError::InvalidValue(value.to_string()));
        }

        Ok(Self::new(category, date, parsed))
    }

    /// Calendar date used for ordering, if the date string is recognised
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Raw value as displayed and exported (`50`, `80.5`)
    pub fn display_value(&self) -> String {
        format_value(self.value)
    }
}

/// Parse a date string in ISO (`2024-03-01`), locale (`01/03/2024`) or
/// RFC 3339 form
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Shortest decimal form of a meter index
///
/// Negative zero prints as `0`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Water.label(), "Água");
        assert_eq!(Category::Gas.label(), "Gás");
        assert_eq!(Category::Unknown("luz".to_string()).label(), "luz");
    }

    #[test]
    fn test_category_from_input() {
        assert_eq!("water".parse::<Category>().unwrap(), Category::Water);
        assert_eq!("Água".parse::<Category>().unwrap(), Category::Water);
        assert_eq!(" GAS ".parse::<Category>().unwrap(), Category::Gas);
        assert_eq!(
            "power".parse::<Category>(),
            Err(ValidationError::UnknownCategory("power".to_string()))
        );
    }

    #[test]
    fn test_category_toggle() {
        assert_eq!(Category::Water.toggle(), Category::Gas);
        assert_eq!(Category::Gas.toggle(), Category::Water);
    }

    #[test]
    fn test_reading_serialization_format() {
        let reading = Reading::new(Category::Water, "2024-01-01", 100.5);
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "agua", "date": "2024-01-01", "value": 100.5})
        );
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let json = r#"{"type": "luz", "date": "2024-01-01", "value": 3}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.category, Category::Unknown("luz".to_string()));

        let back = serde_json::to_value(&reading).unwrap();
        assert_eq!(back["type"], "luz");
    }

    #[test]
    fn test_from_input_valid() {
        let reading = Reading::from_input(Category::Gas, " 2024-03-01 ", " 50 ").unwrap();
        assert_eq!(reading, Reading::new(Category::Gas, "2024-03-01", 50.0));
    }

    #[test]
    fn test_from_input_rejects_empty_date() {
        assert_eq!(
            Reading::from_input(Category::Water, "  ", "10"),
            Err(ValidationError::EmptyDate)
        );
    }

    #[test]
    fn test_from_input_rejects_bad_values() {
        for value in ["", "abc", "NaN", "inf", "12,5"] {
            assert!(
                matches!(
                    Reading::from_input(Category::Water, "2024-01-01", value),
                    Err(ValidationError::InvalidValue(_))
                ),
                "expected '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("01/03/2024"), expected);
        assert_eq!(parse_date("2024-03-01T10:00:00Z"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(50.0), "50");
        assert_eq!(format_value(80.5), "80.5");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-3.5), "-3.5");
    }
}
