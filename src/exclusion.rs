use crate::duration::is_iso_date;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A token of the `excludes` directive: days the chart skips when laying out
/// task spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    Weekends,
    Weekday(Weekday),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid exclusion '{0}': expected 'weekends', a weekday name or a YYYY-MM-DD date")]
pub struct ExclusionParseError(pub String);

impl Exclusion {
    const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

    /// Check whether `date` falls on an excluded day.
    pub fn excludes(&self, date: NaiveDate) -> bool {
        match self {
            Exclusion::Weekends => Self::WEEKEND.contains(&date.weekday()),
            Exclusion::Weekday(day) => date.weekday() == *day,
            Exclusion::Date(excluded) => *excluded == date,
        }
    }

    /// Parse a comma separated list such as `weekends, 2024-12-25`.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ExclusionParseError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl FromStr for Exclusion {
    type Err = ExclusionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = value.trim();
        if token.eq_ignore_ascii_case("weekends") {
            return Ok(Exclusion::Weekends);
        }
        if is_iso_date(token) {
            return NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .map(Exclusion::Date)
                .map_err(|_| ExclusionParseError(value.to_string()));
        }
        token
            .parse::<Weekday>()
            .map(Exclusion::Weekday)
            .map_err(|_| ExclusionParseError(value.to_string()))
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Weekends => f.write_str("weekends"),
            Exclusion::Weekday(day) => f.write_str(weekday_name(*day)),
            Exclusion::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Exclusion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Exclusion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
