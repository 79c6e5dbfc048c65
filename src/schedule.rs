use crate::config::ChartConfig;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// A named group of tasks. Tasks render in the order they are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

/// The complete chart description: optional chart settings plus ordered
/// sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Chart settings, created empty on first access.
    pub fn config_mut(&mut self) -> &mut ChartConfig {
        self.config.get_or_insert_with(ChartConfig::default)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Every task in rendering order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(|section| section.tasks.iter())
    }

    /// Every task in rendering order, paired with the name of its section.
    pub fn tasks_with_sections(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.sections.iter().flat_map(|section| {
            section
                .tasks
                .iter()
                .map(move |task| (section.name.as_str(), task))
        })
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|section| section.tasks.len()).sum()
    }

    /// First task with the given id in scan order.
    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks().find(|task| task.id == task_id)
    }

    /// Replace the task with the same id, or append it to the named section
    /// (creating the section when missing). Returns `true` on replacement.
    pub fn upsert_task(&mut self, section_name: &str, task: Task) -> bool {
        for section in &mut self.sections {
            if let Some(existing) = section.tasks.iter_mut().find(|t| t.id == task.id) {
                *existing = task;
                return true;
            }
        }
        match self.section_mut(section_name) {
            Some(section) => section.push_task(task),
            None => self.push_section(Section::new(section_name).with_task(task)),
        }
        false
    }

    /// Remove every task with the given id. Sections are kept even when they
    /// become empty.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let before = self.task_count();
        for section in &mut self.sections {
            section.tasks.retain(|task| task.id != task_id);
        }
        self.task_count() != before
    }
}
