use crate::duration::TaskDuration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status '{0}'")]
pub struct UnknownStatus(pub String);

/// Status tag attached to a task line. Tags keep the order they were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Done,
    Active,
    Critical,
    Milestone,
}

impl TaskStatus {
    /// Keyword written into the diagram text.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Done => "done",
            TaskStatus::Active => "active",
            TaskStatus::Critical => "crit",
            TaskStatus::Milestone => "milestone",
        }
    }

    pub fn variants() -> [(&'static str, &'static str); 4] {
        [
            ("done", "Completed work"),
            ("active", "Work in progress"),
            ("crit", "On the critical path (also accepts 'critical')"),
            ("milestone", "Point-in-time marker, may have zero duration"),
        ]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "done" => Ok(TaskStatus::Done),
            "active" => Ok(TaskStatus::Active),
            "crit" | "critical" => Ok(TaskStatus::Critical),
            "milestone" => Ok(TaskStatus::Milestone),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Renders status tags as a comma-space separated list in declared order.
pub fn format_status_list(status: &[TaskStatus]) -> String {
    status
        .iter()
        .map(TaskStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// ISO start date, or empty when the task starts after another one.
    #[serde(default)]
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TaskDuration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<TaskStatus>,
    /// Id of the task this one follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: impl Into<TaskDuration>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start: String::new(),
            duration: Some(duration.into()),
            status: Vec::new(),
            after: None,
        }
    }

    pub fn starting(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    pub fn after(mut self, task_id: impl Into<String>) -> Self {
        self.after = Some(task_id.into());
        self
    }

    pub fn with_status(mut self, status: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.status = status.into_iter().collect();
        self
    }

    /// The referenced predecessor, ignoring an empty `after`.
    pub fn dependency(&self) -> Option<&str> {
        self.after.as_deref().filter(|after| !after.is_empty())
    }

    /// The duration, treating an empty raw string as absent.
    pub fn duration_spec(&self) -> Option<&TaskDuration> {
        match &self.duration {
            Some(TaskDuration::Raw(raw)) if raw.is_empty() => None,
            other => other.as_ref(),
        }
    }

    pub fn is_milestone(&self) -> bool {
        self.status.contains(&TaskStatus::Milestone)
    }
}
