//! Mermaid `gantt` text emission.
//!
//! Output layout:
//!
//! ```text
//! gantt
//!     title Release plan
//!     dateFormat YYYY-MM-DD
//!     section Development
//!     Task One : done : task1 : 2024-01-01 : 5d
//!     Task Two : task2 : after task1 : 3d
//! ```

use crate::config::ChartConfig;
use crate::duration::{TaskDuration, format_duration};
use crate::schedule::Schedule;
use crate::task::{Task, format_status_list};
use crate::validation::{ValidationError, ValidationOptions, validate_with};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DIAGRAM_HEADER: &str = "gantt";
const INDENT: &str = "    ";
const FIELD_SEPARATOR: &str = " : ";

/// Serialize a schedule that already passed validation.
pub fn emit(schedule: &Schedule) -> String {
    let mut lines = vec![DIAGRAM_HEADER.to_string()];
    if let Some(config) = &schedule.config {
        lines.extend(config_directives(config));
    }
    for section in &schedule.sections {
        lines.push(format!("{INDENT}section {}", section.name));
        lines.extend(section.tasks.iter().map(task_line));
    }
    lines.join("\n")
}

/// Directive lines in fixed order: title, dateFormat, axisFormat,
/// tickInterval, excludes. Unset or empty settings are skipped.
pub fn config_directives(config: &ChartConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let settings = [
        ("title", &config.title),
        ("dateFormat", &config.date_format),
        ("axisFormat", &config.axis_format),
        ("tickInterval", &config.tick_interval),
    ];
    for (directive, value) in settings {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            lines.push(format!("{INDENT}{directive} {value}"));
        }
    }
    if !config.excludes.is_empty() {
        let excludes = config
            .excludes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("{INDENT}excludes {excludes}"));
    }
    lines
}

/// `name : [status : ]id : start|after <id> : duration`
pub fn task_line(task: &Task) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(5);
    fields.push(task.name.clone());
    if !task.status.is_empty() {
        fields.push(format_status_list(&task.status));
    }
    fields.push(task.id.clone());
    match task.dependency() {
        Some(dependency) => fields.push(format!("after {dependency}")),
        None => fields.push(task.start.clone()),
    }
    match task.duration_spec() {
        Some(TaskDuration::Fixed(duration)) => fields.push(format_duration(duration)),
        Some(TaskDuration::Raw(raw)) => fields.push(raw.clone()),
        None => {}
    }
    format!("{INDENT}{}", fields.join(FIELD_SEPARATOR))
}

/// Validate with the default rules, then emit.
pub fn convert(schedule: Option<&Schedule>) -> Result<String, ValidationError> {
    convert_with(schedule, ValidationOptions::default())
}

pub fn convert_with(
    schedule: Option<&Schedule>,
    options: ValidationOptions,
) -> Result<String, ValidationError> {
    validate_with(schedule, options)?;
    let schedule = schedule.ok_or(ValidationError::MissingData)?;
    let text = emit(schedule);
    debug!(
        sections = schedule.sections.len(),
        tasks = schedule.task_count(),
        bytes = text.len(),
        "emitted gantt definition"
    );
    Ok(text)
}

/// Outcome of a conversion as handed to callers over a serialized boundary.
/// Exactly one of `text` or `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(message.into()),
        }
    }
}

impl From<Result<String, ValidationError>> for ConversionResult {
    fn from(value: Result<String, ValidationError>) -> Self {
        match value {
            Ok(text) => Self::success(text),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
