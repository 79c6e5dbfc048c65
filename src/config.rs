use crate::exclusion::Exclusion;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the renderer packs task bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Standard,
    Compact,
}

/// Chart-level settings. Every field is optional; an absent or empty field
/// is left out of the emitted text rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Format of the dates in task lines, e.g. `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// strftime-style format of the axis labels, e.g. `%m/%d`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_format: Option<String>,
    /// Axis tick spacing, e.g. `1week`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<Exclusion>,
    /// Reserved for renderers that take excluded dates directly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_dates: Vec<NaiveDate>,
    /// Reserved for the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
    /// Reserved for the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_click: Option<bool>,
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn with_axis_format(mut self, format: impl Into<String>) -> Self {
        self.axis_format = Some(format.into());
        self
    }

    pub fn with_tick_interval(mut self, interval: impl Into<String>) -> Self {
        self.tick_interval = Some(interval.into());
        self
    }

    pub fn with_excludes(mut self, excludes: impl IntoIterator<Item = Exclusion>) -> Self {
        self.excludes = excludes.into_iter().collect();
        self
    }

    /// Check if a date is skipped by either the `excludes` tokens or the
    /// reserved `exclude_dates` list.
    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.exclude_dates.contains(&date) || self.excludes.iter().any(|rule| rule.excludes(date))
    }
}
