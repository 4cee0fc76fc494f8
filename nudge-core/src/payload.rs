//! Delivery payloads synthesized from engine output.
//!
//! The engine decides timing and classification only; copy (title/body) and
//! the de-duplication identity are derived here for the delivery layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notification::{NotificationSchedule, NotificationType, ScheduledNotification};
use crate::task::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Stable per concrete send slot: `{task_id}:{type}:{unix_ts}`.
    pub identity: String,
    pub task_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

pub fn notification_identity(task_id: &str, n: &ScheduledNotification) -> String {
    format!("{}:{}:{}", task_id, n.kind, n.time.timestamp())
}

impl NotificationPayload {
    pub fn from_schedule(schedule: &NotificationSchedule, n: &ScheduledNotification) -> Self {
        let title = match (n.kind, n.priority) {
            (NotificationType::Overdue, Priority::High) => {
                format!("Overdue (high priority): {}", schedule.task_title)
            }
            (NotificationType::Overdue, _) => format!("Overdue: {}", schedule.task_title),
            (NotificationType::AdvanceNotice, _) => format!("Coming up: {}", schedule.task_title),
            (NotificationType::Reminder, _) => format!("Reminder: {}", schedule.task_title),
            (NotificationType::FinalReminder, _) => format!("Due soon: {}", schedule.task_title),
            (NotificationType::DailySummary, _) => {
                format!("Today's focus: {}", schedule.task_title)
            }
        };

        Self {
            identity: notification_identity(&schedule.task_id, n),
            task_id: schedule.task_id.clone(),
            kind: n.kind,
            priority: n.priority,
            fire_at: n.time,
            title,
            body: format!("{}.", n.reason),
        }
    }

    pub fn is_due(&self, cutoff: DateTime<Utc>) -> bool {
        self.fire_at <= cutoff
    }
}

/// Flatten schedules into payloads, ordered by fire time.
pub fn payloads_for(schedules: &[NotificationSchedule]) -> Vec<NotificationPayload> {
    let mut out: Vec<NotificationPayload> = schedules
        .iter()
        .flat_map(|s| {
            s.notifications
                .iter()
                .map(move |n| NotificationPayload::from_schedule(s, n))
        })
        .collect();
    out.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.identity.cmp(&b.identity)));
    out
}
