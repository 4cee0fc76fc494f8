//! nudge-core: notification decision engine for task check-ins.
//!
//! Given a task, a user profile and the number of overdue reminders already
//! delivered today, the engine returns the future instants at which the user
//! should be nudged, each with a type, priority and reason. It sends nothing
//! and stores nothing; delivery and bookkeeping belong to the caller.

pub mod clock;
pub mod engine;
pub mod error;
pub mod notification;
pub mod payload;
pub mod profile;
pub mod task;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{
    calculate_all_notification_schedules, calculate_notification_schedule, final_reminder_lead,
    get_notification_summary, NotificationEngine, MAX_OVERDUE_REMINDERS_PER_DAY,
    OVERDUE_FOLLOW_UP_HOURS,
};
pub use error::{ProfileError, TimeOfDayError};
pub use notification::{
    NotificationSchedule, NotificationSummary, NotificationType, ScheduledNotification,
};
pub use payload::{notification_identity, payloads_for, NotificationPayload};
pub use profile::{PeakEnergyTime, ProfileSettings, TimeOfDay, UserProfile};
pub use task::{Priority, Task, TaskStatus, WORK_CATEGORY};
