use crate::error::AppError;
use crate::model::{Filter, Priority, Task};
use crate::prompt::ConfirmationPrompt;
use std::collections::HashSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const MIN_TEXT_CHARS: usize = 3;

/// In-memory task collection plus the current filter and the id counter.
///
/// New tasks go to the front of the sequence, so iteration order is
/// most-recent-first. Unknown ids are a silent no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    task_id_counter: u64,
    current_filter: Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Task),
    Declined,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared(usize),
    Declined,
    NothingToClear,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            task_id_counter: 1,
            current_filter: Filter::All,
        }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts, rejecting blobs that violate
    /// the store invariants.
    pub fn from_parts(
        tasks: Vec<Task>,
        task_id_counter: u64,
        current_filter: Filter,
    ) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(AppError::invalid_data(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            if task.id >= task_id_counter {
                return Err(AppError::invalid_data(format!(
                    "task id {} is not below the id counter",
                    task.id
                )));
            }
            if task.completed != task.completed_at.is_some() {
                return Err(AppError::invalid_data(format!(
                    "task {} completion timestamp does not match its status",
                    task.id
                )));
            }
        }

        Ok(Self {
            tasks,
            task_id_counter,
            current_filter,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_id_counter(&self) -> u64 {
        self.task_id_counter
    }

    pub fn current_filter(&self) -> Filter {
        self.current_filter
    }

    pub fn add_task(&mut self, text: &str) -> Result<Task, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("task text is required"));
        }
        if trimmed.chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::invalid_input(format!(
                "task text must be at least {MIN_TEXT_CHARS} characters"
            )));
        }

        let lowered = trimmed.to_lowercase();
        if self.tasks.iter().any(|task| task.text.to_lowercase() == lowered) {
            return Err(AppError::duplicate(format!(
                "task \"{trimmed}\" already exists"
            )));
        }

        let task = Task {
            id: self.task_id_counter,
            text: trimmed.to_string(),
            completed: false,
            created_at: now_rfc3339()?,
            completed_at: None,
            priority: Priority::Normal,
        };

        self.task_id_counter += 1;
        self.tasks.insert(0, task.clone());

        Ok(task)
    }

    pub fn toggle_task(&mut self, id: u64) -> Result<Option<Task>, AppError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        task.completed_at = if task.completed {
            Some(now_rfc3339()?)
        } else {
            None
        };

        Ok(Some(task.clone()))
    }

    pub fn delete_task(&mut self, id: u64, prompt: &dyn ConfirmationPrompt) -> DeleteOutcome {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return DeleteOutcome::NotFound;
        };

        let message = format!("Delete task \"{}\"?", self.tasks[index].text);
        if !prompt.confirm(&message) {
            return DeleteOutcome::Declined;
        }

        DeleteOutcome::Deleted(self.tasks.remove(index))
    }

    pub fn clear_completed(&mut self, prompt: &dyn ConfirmationPrompt) -> ClearOutcome {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        if completed == 0 {
            return ClearOutcome::NothingToClear;
        }

        let message = format!("Delete {completed} completed task(s)?");
        if !prompt.confirm(&message) {
            return ClearOutcome::Declined;
        }

        self.tasks.retain(|task| !task.completed);
        ClearOutcome::Cleared(completed)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.current_filter = filter;
    }

    /// Lazy view over the tasks matching the current filter, in store
    /// order. Recomputed from the current contents on every call.
    pub fn filtered_view(&self) -> impl Iterator<Item = &Task> {
        let filter = self.current_filter;
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    pub fn stats(&self) -> Stats {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        Stats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
