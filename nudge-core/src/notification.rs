//! Notification descriptors produced by the engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    AdvanceNotice,
    Reminder,
    FinalReminder,
    Overdue,
    DailySummary,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::AdvanceNotice => "advance-notice",
            NotificationType::Reminder => "reminder",
            NotificationType::FinalReminder => "final-reminder",
            NotificationType::Overdue => "overdue",
            NotificationType::DailySummary => "daily-summary",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    /// Explanatory only.
    pub reason: String,
}

/// Full engine output for one task, sorted ascending by `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSchedule {
    pub task_id: String,
    pub task_title: String,
    pub notifications: Vec<ScheduledNotification>,
}

impl NotificationSchedule {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub total: usize,
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_type: BTreeMap<NotificationType, usize>,
}
