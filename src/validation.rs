use crate::duration::{TaskDuration, is_duration_shorthand, is_iso_date};
use crate::graph::DependencyGraph;
use crate::schedule::{Schedule, Section};
use crate::task::Task;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// The first structural problem found in a schedule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Gantt data is required")]
    MissingData,
    #[error("Gantt data must have at least one section")]
    NoSections,
    #[error("Section at index {index} is missing a name")]
    SectionMissingName { index: usize },
    #[error("Section \"{section}\" has no tasks")]
    EmptySection { section: String },
    #[error("Task at index {index} in section \"{section}\" is missing an ID")]
    TaskMissingId { section: String, index: usize },
    #[error("Task \"{task}\" is missing a name")]
    TaskMissingName { task: String },
    #[error("Task \"{task}\" is missing a start date or dependency")]
    MissingStart { task: String },
    #[error("Task \"{task}\" is missing a duration")]
    MissingDuration { task: String },
    #[error("Task \"{task}\" has an invalid duration format: {raw}")]
    InvalidDurationFormat { task: String, raw: String },
    #[error("Task \"{task}\" has an invalid duration value: {value}")]
    InvalidDurationValue { task: String, value: f64 },
    #[error("Task \"{task}\" has an invalid duration unit: {unit}")]
    InvalidDurationUnit { task: String, unit: String },
    #[error("Duplicate task ID: {task}")]
    DuplicateTaskId { task: String },
    #[error("Task \"{task}\" depends on non-existent task: {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("Dependency cycle detected: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject `after` chains that loop back on themselves. Off by default.
    pub detect_cycles: bool,
}

impl ValidationOptions {
    pub fn with_cycle_detection() -> Self {
        Self {
            detect_cycles: true,
        }
    }
}

/// Validate with the default rule set. Stops at the first problem.
pub fn validate(schedule: Option<&Schedule>) -> Result<(), ValidationError> {
    validate_with(schedule, ValidationOptions::default())
}

pub fn validate_with(
    schedule: Option<&Schedule>,
    options: ValidationOptions,
) -> Result<(), ValidationError> {
    let result = run_checks(schedule, options);
    if let Err(err) = &result {
        debug!(error = %err, "schedule failed validation");
    }
    result
}

fn run_checks(
    schedule: Option<&Schedule>,
    options: ValidationOptions,
) -> Result<(), ValidationError> {
    let schedule = schedule.ok_or(ValidationError::MissingData)?;
    if schedule.sections.is_empty() {
        return Err(ValidationError::NoSections);
    }

    for (index, section) in schedule.sections.iter().enumerate() {
        validate_section(index, section)?;
    }

    validate_unique_ids(schedule)?;
    validate_dependencies(schedule)?;

    if options.detect_cycles {
        if let Some(path) = DependencyGraph::build(schedule).find_cycle() {
            return Err(ValidationError::DependencyCycle { path });
        }
    }

    Ok(())
}

pub fn validate_section(index: usize, section: &Section) -> Result<(), ValidationError> {
    if section.name.trim().is_empty() {
        return Err(ValidationError::SectionMissingName { index });
    }
    if section.tasks.is_empty() {
        return Err(ValidationError::EmptySection {
            section: section.name.clone(),
        });
    }
    for (task_index, task) in section.tasks.iter().enumerate() {
        if task.id.trim().is_empty() {
            return Err(ValidationError::TaskMissingId {
                section: section.name.clone(),
                index: task_index,
            });
        }
        validate_task(task)?;
    }
    Ok(())
}

/// Per-task structural checks. The task id is assumed non-empty.
pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    if task.name.trim().is_empty() {
        return Err(ValidationError::TaskMissingName {
            task: task.id.clone(),
        });
    }

    if task.dependency().is_none() && task.start.trim().is_empty() {
        return Err(ValidationError::MissingStart {
            task: task.id.clone(),
        });
    }

    match task.duration_spec() {
        None => Err(ValidationError::MissingDuration {
            task: task.id.clone(),
        }),
        Some(TaskDuration::Raw(raw)) => {
            if is_duration_shorthand(raw) || is_iso_date(raw) {
                Ok(())
            } else {
                Err(ValidationError::InvalidDurationFormat {
                    task: task.id.clone(),
                    raw: raw.clone(),
                })
            }
        }
        Some(TaskDuration::Fixed(duration)) => {
            let value = duration.value;
            let zero_allowed = task.is_milestone();
            if !value.is_finite() || value < 0.0 || (value == 0.0 && !zero_allowed) {
                return Err(ValidationError::InvalidDurationValue {
                    task: task.id.clone(),
                    value,
                });
            }
            if !duration.unit.is_recognized() {
                return Err(ValidationError::InvalidDurationUnit {
                    task: task.id.clone(),
                    unit: duration.unit.to_string(),
                });
            }
            Ok(())
        }
    }
}

fn validate_unique_ids(schedule: &Schedule) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(schedule.task_count());
    for task in schedule.tasks() {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(ValidationError::DuplicateTaskId {
                task: task.id.clone(),
            });
        }
    }
    Ok(())
}

fn validate_dependencies(schedule: &Schedule) -> Result<(), ValidationError> {
    let known: HashSet<&str> = schedule.tasks().map(|task| task.id.as_str()).collect();
    for task in schedule.tasks() {
        if let Some(dependency) = task.dependency() {
            if !known.contains(dependency) {
                return Err(ValidationError::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }
    Ok(())
}
