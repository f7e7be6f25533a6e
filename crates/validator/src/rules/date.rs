//! Date strings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::Rule;
use crate::schema::SchemaAccumulator;
use crate::value::Value;

/// Strings must parse with a `chrono` format and fall inside an optional
/// inclusive range.
#[derive(Debug, Clone)]
pub struct Date {
    layout: String,
    min: Option<NaiveDateTime>,
    max: Option<NaiveDateTime>,
}

/// Strings must parse with `layout` (a `chrono` format string such as
/// `"%Y-%m-%d"`). Layouts without a time component parse as midnight.
///
/// ```rust
/// use apivalid::prelude::*;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let rule = date("%Y-%m-%d").min(start);
///
/// assert!(rule.validate(&String::from("2024-06-30")).is_ok());
/// assert!(rule.validate(&String::from("2023-12-31")).is_err());
/// assert!(rule.validate(&String::from("30/06/2024")).is_err());
/// ```
#[must_use]
pub fn date(layout: impl Into<String>) -> Date {
    Date {
        layout: layout.into(),
        min: None,
        max: None,
    }
}

impl Date {
    /// Earliest accepted instant.
    #[must_use]
    pub fn min(mut self, min: NaiveDateTime) -> Self {
        self.min = Some(min);
        self
    }

    /// Latest accepted instant.
    #[must_use]
    pub fn max(mut self, max: NaiveDateTime) -> Self {
        self.max = Some(max);
        self
    }

    fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, &self.layout)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, &self.layout)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
    }
}

impl Rule for Date {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let value = value.value();
        if value.is_empty() {
            return Ok(());
        }
        let Value::Str(s) = value else {
            return Err(ValidationError::new("type", "must be either a string or byte slice").into());
        };

        let Some(parsed) = self.parse(&s) else {
            return Err(ValidationError::new("date_invalid", "must be a valid date")
                .with_param("layout", self.layout.clone())
                .into());
        };

        let too_early = self.min.is_some_and(|min| parsed < min);
        let too_late = self.max.is_some_and(|max| parsed > max);
        if too_early || too_late {
            return Err(ValidationError::new("date_out_of_range", "the date is out of range").into());
        }
        Ok(())
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.property().format = Some(self.layout.clone());
        if let Some(min) = self.min {
            acc.append_description(&format!("> {min}"));
        }
        if let Some(max) = self.max {
            acc.append_description(&format!("< {max}"));
        }
        Ok(())
    }
}
