use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unit of a structured task duration.
///
/// Unknown units are kept as `Unrecognized` so that a schedule read from
/// JSON reaches the validator, which reports them with the offending task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Day,
    Week,
    Hour,
    Minute,
    Unrecognized(String),
}

impl DurationUnit {
    /// Accepts the unit letters as well as the singular and plural names.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => DurationUnit::Day,
            "w" | "week" | "weeks" => DurationUnit::Week,
            "h" | "hour" | "hours" => DurationUnit::Hour,
            "m" | "minute" | "minutes" => DurationUnit::Minute,
            _ => DurationUnit::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DurationUnit::Day => "d",
            DurationUnit::Week => "w",
            DurationUnit::Hour => "h",
            DurationUnit::Minute => "m",
            DurationUnit::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Placeholder for a structured duration that names no unit.
    pub fn missing() -> Self {
        DurationUnit::Unrecognized(String::new())
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DurationUnit::Unrecognized(_))
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'd' => Some(DurationUnit::Day),
            'w' => Some(DurationUnit::Week),
            'h' => Some(DurationUnit::Hour),
            'm' => Some(DurationUnit::Minute),
            _ => None,
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DurationUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DurationUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DurationUnit::parse(&raw))
    }
}

/// A task length expressed as a number of units, e.g. five days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub value: f64,
    #[serde(default = "DurationUnit::missing")]
    pub unit: DurationUnit,
}

impl Duration {
    pub fn new(value: f64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    pub fn days(value: f64) -> Self {
        Self::new(value, DurationUnit::Day)
    }

    pub fn weeks(value: f64) -> Self {
        Self::new(value, DurationUnit::Week)
    }

    pub fn hours(value: f64) -> Self {
        Self::new(value, DurationUnit::Hour)
    }

    pub fn minutes(value: f64) -> Self {
        Self::new(value, DurationUnit::Minute)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self))
    }
}

/// The length of a task: either a structured [`Duration`] or a raw string
/// holding a shorthand token (`"5d"`) or an ISO end date (`"2024-01-31"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskDuration {
    Fixed(Duration),
    Raw(String),
}

impl From<Duration> for TaskDuration {
    fn from(value: Duration) -> Self {
        TaskDuration::Fixed(value)
    }
}

impl From<&str> for TaskDuration {
    fn from(value: &str) -> Self {
        TaskDuration::Raw(value.to_string())
    }
}

impl From<String> for TaskDuration {
    fn from(value: String) -> Self {
        TaskDuration::Raw(value)
    }
}

/// Renders a duration as `<value><unit-letter>`, e.g. `5d`. Negative zero
/// is written as `0`.
pub fn format_duration(duration: &Duration) -> String {
    let value = if duration.value == 0.0 {
        0.0
    } else {
        duration.value
    };
    format!("{}{}", value, duration.unit)
}

/// True iff `value` is one or more ASCII digits followed by exactly one of
/// the unit letters `d`, `w`, `h` or `m`.
pub fn is_duration_shorthand(value: &str) -> bool {
    let Some(letter) = value.chars().last() else {
        return false;
    };
    let digits = &value[..value.len() - letter.len_utf8()];
    DurationUnit::from_letter(letter).is_some()
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// True iff `value` is a strict `YYYY-MM-DD` string naming a real calendar day.
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != 4 && *idx != 7)
        .all(|(_, b)| b.is_ascii_digit());
    digits_ok && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
