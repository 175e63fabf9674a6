//! Timestamp formatting and parsing with a user-chosen strftime pattern

use crate::error::{MatterTimeError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_yaml::Value;
use std::fmt;

/// Pattern matching what note apps show as a date-time property
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A validated strftime pattern used to read and write timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    /// Validate `pattern` and wrap it
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let invalid = pattern.trim().is_empty()
            || StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(MatterTimeError::invalid_date_format(pattern));
        }
        Ok(Self { pattern })
    }

    /// The raw strftime pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a timestamp
    pub fn format<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        time.format(&self.pattern).to_string()
    }

    /// Parse a string written with this pattern
    ///
    /// Patterns without time fields parse to midnight.
    pub fn parse_str(&self, input: &str) -> Option<NaiveDateTime> {
        let input = input.trim();
        NaiveDateTime::parse_from_str(input, &self.pattern)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(input, &self.pattern)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Read a front matter value as a local timestamp
    ///
    /// Strings are parsed with the pattern and numbers are taken as epoch
    /// milliseconds. Anything else yields `None`.
    pub fn parse_value(&self, value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::String(s) => self.parse_str(s),
            Value::Number(n) => {
                let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
                DateTime::from_timestamp_millis(millis)
                    .map(|utc| utc.with_timezone(&Local).naive_local())
            }
            _ => None,
        }
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
