//! Task model consumed by the notification engine.
//!
//! Tasks come from the persistence layer; the engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category value that opts a task into work-hours clamping.
pub const WORK_CATEGORY: &str = "work";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    /// Never produces automatic notifications.
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Absent means "no deadline".
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    pub status: TaskStatus,
    pub priority: Priority,

    /// Minutes.
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,

    #[serde(default)]
    pub category: Option<String>,

    /// Explicit "due time is set" flag. When `None`, a due date at exactly
    /// local midnight is read as date-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_due_time: Option<bool>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            estimated_duration_minutes: None,
            category: None,
            has_due_time: None,
        }
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration_minutes = Some(minutes);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_time_flag(mut self, has_due_time: bool) -> Self {
        self.has_due_time = Some(has_due_time);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Only the literal category "work" gets clamped into work hours.
    pub fn is_work(&self) -> bool {
        self.category.as_deref() == Some(WORK_CATEGORY)
    }
}
