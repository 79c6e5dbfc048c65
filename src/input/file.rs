use super::{InputError, InputResult};
use crate::{Schedule, Section, Task, TaskDuration, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a schedule document. `null` yields `Ok(None)`.
pub fn parse_schedule_json(input: &str) -> InputResult<Option<Schedule>> {
    Ok(serde_json::from_str(input)?)
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> InputResult<Option<Schedule>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// One task per row; rows are grouped into sections in the order each
/// section name first appears.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    section: String,
    id: String,
    name: String,
    #[serde(default)]
    start: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    after: String,
}

impl TaskCsvRecord {
    fn into_task(self) -> InputResult<(String, Task)> {
        let status = split_status(&self.status).map_err(|part| {
            InputError::InvalidData(format!("invalid status '{part}' for task {}", self.id))
        })?;
        let task = Task {
            id: self.id,
            name: self.name,
            start: self.start.trim().to_string(),
            duration: parse_string_option(self.duration).map(TaskDuration::Raw),
            status,
            after: parse_string_option(self.after),
        };
        Ok((self.section, task))
    }
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> InputResult<Schedule> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let mut schedule = Schedule::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let (section_name, task) = record?.into_task()?;
        match schedule.section_mut(&section_name) {
            Some(section) => section.push_task(task),
            None => schedule.push_section(Section::new(section_name).with_task(task)),
        }
    }
    Ok(schedule)
}

fn split_status(input: &str) -> Result<Vec<TaskStatus>, String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<TaskStatus>().map_err(|_| part.to_string()))
        .collect()
}

fn parse_string_option(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
