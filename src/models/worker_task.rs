use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskType {
    Planting,
    Harvesting,
    Fertilizing,
    Irrigating,
    Spraying,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Planting => "Planting",
            TaskType::Harvesting => "Harvesting",
            TaskType::Fertilizing => "Fertilizing",
            TaskType::Irrigating => "Irrigating",
            TaskType::Spraying => "Spraying",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planting" => Some(TaskType::Planting),
            "harvesting" => Some(TaskType::Harvesting),
            "fertilizing" => Some(TaskType::Fertilizing),
            "irrigating" | "irrigation" => Some(TaskType::Irrigating),
            "spraying" => Some(TaskType::Spraying),
            _ => None,
        }
    }

    pub fn all() -> &'static [TaskType] {
        &[
            TaskType::Planting,
            TaskType::Harvesting,
            TaskType::Fertilizing,
            TaskType::Irrigating,
            TaskType::Spraying,
        ]
    }
}

impl<'de> Deserialize<'de> for TaskType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_by_name(deserializer, Self::from_str, Self::all(), Self::as_str)
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work assigned to one worker on one field.
/// `progress` is a percentage in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTask {
    pub id: Option<i64>,
    pub description: String,
    pub worker_id: i64,
    pub field_id: i64,
    pub task_type: TaskType,
    pub progress: f64,
    pub start_date: DateTime<Utc>,
    pub real_end_date: Option<DateTime<Utc>>,
    pub estimated_end_date: DateTime<Utc>,
}

impl WorkerTask {
    pub fn new(
        worker_id: i64,
        field_id: i64,
        task_type: TaskType,
        start_date: DateTime<Utc>,
        estimated_end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            description: task_type.as_str().to_string(),
            worker_id,
            field_id,
            task_type,
            progress: 0.0,
            start_date,
            real_end_date: None,
            estimated_end_date,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn task_type_round_trip() {
        for task_type in TaskType::all() {
            let debug_str = format!("{:?}", task_type);
            assert_eq!(TaskType::from_str(&debug_str), Some(*task_type));
        }
        assert_eq!(TaskType::from_str("irrigation"), Some(TaskType::Irrigating));
        assert_eq!(TaskType::from_str("mowing"), None);
    }

    #[test]
    fn new_task_describes_itself_by_type() {
        let start = Utc::now();
        let task = WorkerTask::new(1, 1, TaskType::Planting, start, start + Duration::days(3))
            .with_progress(25.0);
        assert_eq!(task.description, "Planting");
        assert_eq!(task.progress, 25.0);
        assert_eq!(task.real_end_date, None);
    }
}
