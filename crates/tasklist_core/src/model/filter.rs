use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(AppError::invalid_input(format!("unknown filter '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;
    use crate::model::{Priority, Task};

    fn task(completed: bool) -> Task {
        Task {
            id: 1,
            text: "demo".to_string(),
            completed,
            created_at: "2026-08-01T00:00:00Z".to_string(),
            completed_at: completed.then(|| "2026-08-02T00:00:00Z".to_string()),
            priority: Priority::Normal,
        }
    }

    #[test]
    fn matches_partitions_by_completion() {
        assert!(Filter::All.matches(&task(false)));
        assert!(Filter::All.matches(&task(true)));
        assert!(Filter::Pending.matches(&task(false)));
        assert!(!Filter::Pending.matches(&task(true)));
        assert!(Filter::Completed.matches(&task(true)));
        assert!(!Filter::Completed.matches(&task(false)));
    }

    #[test]
    fn parses_known_values() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(" Pending ".parse::<Filter>().unwrap(), Filter::Pending);
        assert_eq!("COMPLETED".parse::<Filter>().unwrap(), Filter::Completed);
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "urgent".parse::<Filter>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
