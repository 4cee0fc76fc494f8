//! Notification decision engine.
//!
//! Deterministically projects a task + profile into future notification
//! instants. Pure: no I/O, no hidden clock, no state between calls. The caller
//! tracks what was already delivered and passes it back in
//! (`existing_overdue_reminders`).

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::notification::{
    NotificationSchedule, NotificationSummary, NotificationType, ScheduledNotification,
};
use crate::profile::UserProfile;
use crate::task::{Priority, Task};
use crate::time::{clamp_to_work_hours, local_date, local_instant};

/// Caller-tracked cap on repeated overdue alerts per task per day.
pub const MAX_OVERDUE_REMINDERS_PER_DAY: u32 = 3;

/// Overdue high-priority tasks get nudged again this many hours from now.
pub const OVERDUE_FOLLOW_UP_HOURS: i64 = 4;

const ADVANCE_NOTICE_HOURS: i64 = 24;
const SHORT_LEAD_HOURS: i64 = 2;

const MORNING_CHECK_HOUR: u32 = 9;
const AFTERNOON_CHECK_HOUR: u32 = 14;
const EVENING_CHECK_HOUR: u32 = 18;

/// Final-reminder lead time before a specific due time, keyed by estimated duration.
pub fn final_reminder_lead(estimated_duration_minutes: Option<u32>) -> Duration {
    let minutes = match estimated_duration_minutes {
        None => 15,
        Some(d) if d <= 30 => 10,
        Some(d) if d < 60 => 15,
        Some(d) if d < 120 => 20,
        Some(_) => 30,
    };
    Duration::minutes(minutes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DueDay {
    Overdue,
    Today,
    Future,
}

fn classify_due_day(due: DateTime<Utc>, now: DateTime<Utc>, profile: &UserProfile) -> DueDay {
    let due_day = local_date(due, profile.timezone);
    let today = local_date(now, profile.timezone);
    if due_day < today {
        DueDay::Overdue
    } else if due_day == today {
        DueDay::Today
    } else {
        DueDay::Future
    }
}

/// A due date at exactly local midnight means "no time set", unless the task
/// says otherwise explicitly.
fn has_specific_time(task: &Task, due: DateTime<Utc>, profile: &UserProfile) -> bool {
    task.has_due_time.unwrap_or_else(|| {
        let local = due.with_timezone(&profile.timezone);
        !(local.hour() == 0 && local.minute() == 0 && local.second() == 0)
    })
}

fn at_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Accumulates candidates for one task, dropping anything not strictly in the future.
struct Candidates<'a> {
    task: &'a Task,
    profile: &'a UserProfile,
    now: DateTime<Utc>,
    out: Vec<ScheduledNotification>,
}

impl<'a> Candidates<'a> {
    fn new(task: &'a Task, profile: &'a UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            task,
            profile,
            now,
            out: Vec::new(),
        }
    }

    fn push(&mut self, time: DateTime<Utc>, kind: NotificationType, reason: String) {
        if time <= self.now {
            trace!(task_id = %self.task.id, %kind, %time, "dropping past candidate");
            return;
        }
        self.out.push(ScheduledNotification {
            time,
            kind,
            priority: self.task.priority,
            reason,
        });
    }

    /// Clamp into work hours for "work" tasks, then push.
    fn push_in_work_hours(&mut self, time: DateTime<Utc>, kind: NotificationType, reason: String) {
        if !self.task.is_work() {
            self.push(time, kind, reason);
            return;
        }
        let clamped = clamp_to_work_hours(time, self.profile);
        if clamped != time {
            self.push(clamped, kind, format!("{reason} (moved into work hours)"));
        } else {
            self.push(time, kind, reason);
        }
    }

    fn local_at(&self, date: NaiveDate, hour: u32) -> DateTime<Utc> {
        local_instant(self.profile.timezone, date, at_hour(hour))
    }

    fn into_sorted(mut self) -> Vec<ScheduledNotification> {
        self.out.sort_by_key(|n| n.time);
        self.out
    }
}

/// Compute the notification schedule for a single task.
///
/// `now` is the instant of computation; every emitted time is strictly after it.
pub fn calculate_notification_schedule(
    task: &Task,
    profile: &UserProfile,
    existing_overdue_reminders: u32,
    now: DateTime<Utc>,
) -> NotificationSchedule {
    let mut schedule = NotificationSchedule {
        task_id: task.id.clone(),
        task_title: task.title.clone(),
        notifications: Vec::new(),
    };

    if task.is_completed() || task.priority == Priority::Low {
        debug!(
            task_id = %task.id,
            status = ?task.status,
            priority = %task.priority,
            "no notifications"
        );
        return schedule;
    }

    let mut c = Candidates::new(task, profile, now);

    match task.due_date {
        None => undated(&mut c),
        Some(due) => match classify_due_day(due, now, profile) {
            DueDay::Overdue => overdue(&mut c, existing_overdue_reminders),
            DueDay::Today | DueDay::Future => {
                let specific = has_specific_time(task, due, profile);
                match (task.priority, specific) {
                    (Priority::High, true) => high_with_time(&mut c, due),
                    (Priority::High, false) => high_date_only(&mut c, due),
                    (Priority::Medium, true) => medium_with_time(&mut c, due),
                    (Priority::Medium, false) => medium_date_only(&mut c, due),
                    (Priority::Low, _) => {}
                }
            }
        },
    }

    schedule.notifications = c.into_sorted();
    debug!(
        task_id = %task.id,
        count = schedule.notifications.len(),
        "computed notification schedule"
    );
    schedule
}

/// High-priority tasks without a deadline surface once, tomorrow at the start
/// of the user's energy peak, and only for work tasks.
fn undated(c: &mut Candidates<'_>) {
    if c.task.priority != Priority::High {
        return;
    }
    if !c.task.is_work() {
        debug!(task_id = %c.task.id, "undated high-priority task outside work category; skipping");
        return;
    }

    let peak = c.profile.peak_energy_time;
    let tomorrow = local_date(c.now, c.profile.timezone) + Duration::days(1);
    let at = c.local_at(tomorrow, peak.start_hour());
    c.push_in_work_hours(
        at,
        NotificationType::DailySummary,
        format!(
            "No deadline set; surfaced during your {} energy peak",
            peak.as_str()
        ),
    );
}

fn overdue(c: &mut Candidates<'_>, existing: u32) {
    if existing >= MAX_OVERDUE_REMINDERS_PER_DAY {
        debug!(task_id = %c.task.id, existing, "overdue reminder cap reached");
        return;
    }

    match c.task.priority {
        Priority::High => {
            let at = c.now + Duration::hours(OVERDUE_FOLLOW_UP_HOURS);
            c.push_in_work_hours(
                at,
                NotificationType::Overdue,
                format!(
                    "Overdue high-priority task (reminder {} of {})",
                    existing + 1,
                    MAX_OVERDUE_REMINDERS_PER_DAY
                ),
            );
        }
        Priority::Medium => {
            let today = local_date(c.now, c.profile.timezone);
            let mut at = c.local_at(today, MORNING_CHECK_HOUR);
            if at <= c.now {
                at = c.local_at(today + Duration::days(1), MORNING_CHECK_HOUR);
            }
            c.push(at, NotificationType::Overdue, "Overdue task: morning follow-up".to_string());
        }
        Priority::Low => {}
    }
}

fn high_with_time(c: &mut Candidates<'_>, due: DateTime<Utc>) {
    c.push_in_work_hours(
        due - Duration::hours(ADVANCE_NOTICE_HOURS),
        NotificationType::AdvanceNotice,
        "Due in 24 hours".to_string(),
    );
    c.push_in_work_hours(
        due - Duration::hours(SHORT_LEAD_HOURS),
        NotificationType::Reminder,
        "Due in 2 hours".to_string(),
    );

    let lead = final_reminder_lead(c.task.estimated_duration_minutes);
    c.push(
        due - lead,
        NotificationType::FinalReminder,
        format!("Final reminder {} minutes before deadline", lead.num_minutes()),
    );
}

fn high_date_only(c: &mut Candidates<'_>, due: DateTime<Utc>) {
    let due_day = local_date(due, c.profile.timezone);
    let today = local_date(c.now, c.profile.timezone);

    let checkpoints = [
        (MORNING_CHECK_HOUR, NotificationType::Reminder, "Due today: morning check-in"),
        (AFTERNOON_CHECK_HOUR, NotificationType::Reminder, "Due today: afternoon check-in"),
        (EVENING_CHECK_HOUR, NotificationType::FinalReminder, "Due today: last call"),
    ];
    for (hour, kind, reason) in checkpoints {
        let at = c.local_at(due_day, hour);
        c.push_in_work_hours(at, kind, reason.to_string());
    }

    if due_day != today {
        let at = c.local_at(due_day - Duration::days(1), MORNING_CHECK_HOUR);
        c.push(at, NotificationType::AdvanceNotice, "Due tomorrow".to_string());
    }
}

fn medium_with_time(c: &mut Candidates<'_>, due: DateTime<Utc>) {
    c.push_in_work_hours(
        due - Duration::hours(SHORT_LEAD_HOURS),
        NotificationType::Reminder,
        "Due in 2 hours".to_string(),
    );
}

fn medium_date_only(c: &mut Candidates<'_>, due: DateTime<Utc>) {
    let due_day = local_date(due, c.profile.timezone);
    let at = c.local_at(due_day, MORNING_CHECK_HOUR);
    c.push_in_work_hours(at, NotificationType::Reminder, "Due today".to_string());
}

/// Schedule every non-completed task, keeping only non-empty schedules.
///
/// Tasks missing from `overdue_counts` are treated as having no prior
/// overdue reminders.
pub fn calculate_all_notification_schedules(
    tasks: &[Task],
    profile: &UserProfile,
    overdue_counts: &HashMap<String, u32>,
    now: DateTime<Utc>,
) -> Vec<NotificationSchedule> {
    tasks
        .iter()
        .filter(|t| !t.is_completed())
        .map(|t| {
            let existing = overdue_counts.get(&t.id).copied().unwrap_or(0);
            calculate_notification_schedule(t, profile, existing, now)
        })
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn get_notification_summary(schedules: &[NotificationSchedule]) -> NotificationSummary {
    let mut summary = NotificationSummary::default();
    for n in schedules.iter().flat_map(|s| s.notifications.iter()) {
        summary.total += 1;
        *summary.by_priority.entry(n.priority).or_insert(0) += 1;
        *summary.by_type.entry(n.kind).or_insert(0) += 1;
    }
    summary
}

/// Engine bound to a profile and a clock, for callers that don't want to
/// thread `now` by hand.
#[derive(Debug, Clone)]
pub struct NotificationEngine<C: Clock> {
    profile: UserProfile,
    clock: C,
}

impl<C: Clock> NotificationEngine<C> {
    pub fn new(profile: UserProfile, clock: C) -> Self {
        Self { profile, clock }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn schedule(&self, task: &Task, existing_overdue_reminders: u32) -> NotificationSchedule {
        calculate_notification_schedule(
            task,
            &self.profile,
            existing_overdue_reminders,
            self.clock.now(),
        )
    }

    pub fn schedule_all(
        &self,
        tasks: &[Task],
        overdue_counts: &HashMap<String, u32>,
    ) -> Vec<NotificationSchedule> {
        calculate_all_notification_schedules(tasks, &self.profile, overdue_counts, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::profile::{PeakEnergyTime, TimeOfDay};
    use crate::task::TaskStatus;
    use chrono::TimeZone;

    fn profile() -> UserProfile {
        UserProfile::default()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn kinds(s: &NotificationSchedule) -> Vec<NotificationType> {
        s.notifications.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn lead_time_table() {
        assert_eq!(final_reminder_lead(None), Duration::minutes(15));
        assert_eq!(final_reminder_lead(Some(0)), Duration::minutes(10));
        assert_eq!(final_reminder_lead(Some(30)), Duration::minutes(10));
        assert_eq!(final_reminder_lead(Some(31)), Duration::minutes(15));
        assert_eq!(final_reminder_lead(Some(59)), Duration::minutes(15));
        assert_eq!(final_reminder_lead(Some(60)), Duration::minutes(20));
        assert_eq!(final_reminder_lead(Some(119)), Duration::minutes(20));
        assert_eq!(final_reminder_lead(Some(120)), Duration::minutes(30));
        assert_eq!(final_reminder_lead(Some(600)), Duration::minutes(30));
    }

    #[test]
    fn completed_task_emits_none() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t1", "done")
            .with_priority(Priority::High)
            .with_status(TaskStatus::Completed)
            .with_due_date(now + Duration::days(2));
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert!(s.is_empty());
        assert_eq!(s.task_id, "t1");
        assert_eq!(s.task_title, "done");
    }

    #[test]
    fn low_priority_emits_none() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t2", "someday")
            .with_priority(Priority::Low)
            .with_due_date(now + Duration::hours(5));
        assert!(calculate_notification_schedule(&t, &profile(), 0, now).is_empty());
    }

    #[test]
    fn medium_undated_emits_none() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t3", "undated").with_category("work");
        assert!(calculate_notification_schedule(&t, &profile(), 0, now).is_empty());
    }

    #[test]
    fn high_undated_non_work_emits_none() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t4", "undated")
            .with_priority(Priority::High)
            .with_category("personal");
        assert!(calculate_notification_schedule(&t, &profile(), 0, now).is_empty());
    }

    #[test]
    fn high_undated_work_gets_daily_summary_tomorrow() {
        let now = utc(2026, 3, 2, 20, 0);
        let t = Task::new("t5", "undated")
            .with_priority(Priority::High)
            .with_category("work");

        // Morning peak starts 08:00, clamped up to 09:00 work start.
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(kinds(&s), vec![NotificationType::DailySummary]);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 3, 9, 0));
        assert!(s.notifications[0].reason.contains("work hours"));

        let afternoon = UserProfile {
            peak_energy_time: PeakEnergyTime::Afternoon,
            ..profile()
        };
        let s = calculate_notification_schedule(&t, &afternoon, 0, now);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 3, 12, 0));
    }

    #[test]
    fn high_with_time_emits_three() {
        let now = utc(2026, 3, 2, 8, 0);
        let due = utc(2026, 3, 5, 15, 0);
        let t = Task::new("t6", "deck")
            .with_priority(Priority::High)
            .with_due_date(due)
            .with_duration(90);
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(
            kinds(&s),
            vec![
                NotificationType::AdvanceNotice,
                NotificationType::Reminder,
                NotificationType::FinalReminder,
            ]
        );
        assert_eq!(s.notifications[0].time, utc(2026, 3, 4, 15, 0));
        assert_eq!(s.notifications[1].time, utc(2026, 3, 5, 13, 0));
        assert_eq!(s.notifications[2].time, utc(2026, 3, 5, 14, 40));
        assert!(s.notifications.iter().all(|n| n.priority == Priority::High));
    }

    #[test]
    fn high_with_time_drops_past_candidates() {
        let now = utc(2026, 3, 5, 12, 0);
        let t = Task::new("t7", "deck")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 5, 15, 0));
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(
            kinds(&s),
            vec![NotificationType::Reminder, NotificationType::FinalReminder]
        );
    }

    #[test]
    fn final_reminder_is_never_clamped() {
        let now = utc(2026, 3, 2, 8, 0);
        let due = utc(2026, 3, 5, 20, 0);
        let t = Task::new("t8", "late review")
            .with_priority(Priority::High)
            .with_category("work")
            .with_due_date(due);
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        let times: Vec<_> = s.notifications.iter().map(|n| n.time).collect();
        assert_eq!(
            times,
            vec![
                utc(2026, 3, 4, 17, 0),
                utc(2026, 3, 5, 17, 0),
                utc(2026, 3, 5, 19, 45),
            ]
        );
    }

    #[test]
    fn high_date_only_future_adds_day_before() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t9", "taxes")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 5, 0, 0));
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        let times: Vec<_> = s.notifications.iter().map(|n| n.time).collect();
        assert_eq!(
            times,
            vec![
                utc(2026, 3, 4, 9, 0),
                utc(2026, 3, 5, 9, 0),
                utc(2026, 3, 5, 14, 0),
                utc(2026, 3, 5, 18, 0),
            ]
        );
        assert_eq!(s.notifications[0].kind, NotificationType::AdvanceNotice);
        assert_eq!(s.notifications[3].kind, NotificationType::FinalReminder);
    }

    #[test]
    fn explicit_due_time_flag_overrides_midnight_rule() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t10", "midnight launch")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 5, 0, 0))
            .with_due_time_flag(true);
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(s.notifications.len(), 3);
        assert_eq!(s.notifications[2].time, utc(2026, 3, 4, 23, 45));
    }

    #[test]
    fn seconds_past_midnight_count_as_a_due_time() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t10b", "just after midnight")
            .with_priority(Priority::High)
            .with_due_date(Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 30).unwrap());
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(
            kinds(&s),
            vec![
                NotificationType::AdvanceNotice,
                NotificationType::Reminder,
                NotificationType::FinalReminder,
            ]
        );
        assert_eq!(
            s.notifications[2].time,
            Utc.with_ymd_and_hms(2026, 3, 4, 23, 45, 30).unwrap()
        );
    }

    #[test]
    fn medium_with_time_and_date_only() {
        let now = utc(2026, 3, 2, 8, 0);
        let t = Task::new("t11", "call")
            .with_due_date(utc(2026, 3, 3, 16, 30));
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(kinds(&s), vec![NotificationType::Reminder]);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 3, 14, 30));

        let t = Task::new("t12", "errand").with_due_date(utc(2026, 3, 3, 0, 0));
        let s = calculate_notification_schedule(&t, &profile(), 0, now);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 3, 9, 0));
        assert_eq!(s.notifications[0].priority, Priority::Medium);
    }

    #[test]
    fn overdue_high_follows_up_in_four_hours() {
        let now = utc(2026, 3, 5, 10, 0);
        let t = Task::new("t13", "late")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 3, 12, 0));
        let s = calculate_notification_schedule(&t, &profile(), 1, now);
        assert_eq!(kinds(&s), vec![NotificationType::Overdue]);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 5, 14, 0));
        assert!(s.notifications[0].reason.contains("2 of 3"));
    }

    #[test]
    fn overdue_high_work_suppressed_after_hours() {
        // now + 4h = 22:00, clamped back to 17:00 which is already past.
        let now = utc(2026, 3, 5, 18, 0);
        let t = Task::new("t14", "late")
            .with_priority(Priority::High)
            .with_category("work")
            .with_due_date(utc(2026, 3, 3, 12, 0));
        assert!(calculate_notification_schedule(&t, &profile(), 0, now).is_empty());
    }

    #[test]
    fn overdue_cap_applies() {
        let now = utc(2026, 3, 5, 10, 0);
        let t = Task::new("t15", "late")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 3, 12, 0));
        assert!(calculate_notification_schedule(&t, &profile(), 3, now).is_empty());
        assert!(calculate_notification_schedule(&t, &profile(), 7, now).is_empty());
    }

    #[test]
    fn overdue_medium_at_nine() {
        let t = Task::new("t16", "late").with_due_date(utc(2026, 3, 3, 0, 0));

        let before_nine = utc(2026, 3, 5, 7, 0);
        let s = calculate_notification_schedule(&t, &profile(), 0, before_nine);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 5, 9, 0));

        let after_nine = utc(2026, 3, 5, 9, 0);
        let s = calculate_notification_schedule(&t, &profile(), 0, after_nine);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 6, 9, 0));
    }

    #[test]
    fn profile_timezone_drives_local_day() {
        let chicago = UserProfile::new(
            TimeOfDay::new(9, 0).unwrap(),
            TimeOfDay::new(17, 0).unwrap(),
            PeakEnergyTime::Morning,
            chrono_tz::America::Chicago,
        )
        .unwrap();
        // 2026-03-03 06:00 UTC is 00:00 CST: date-only in Chicago.
        let due = utc(2026, 3, 3, 6, 0);
        let now = utc(2026, 3, 2, 12, 0);
        let t = Task::new("t17", "errand").with_due_date(due);
        let s = calculate_notification_schedule(&t, &chicago, 0, now);
        assert_eq!(s.notifications[0].time, utc(2026, 3, 3, 15, 0));
    }

    #[test]
    fn batch_skips_completed_and_empty() {
        let now = utc(2026, 3, 2, 8, 0);
        let tasks = vec![
            Task::new("a", "a")
                .with_priority(Priority::High)
                .with_due_date(utc(2026, 3, 5, 15, 0)),
            Task::new("b", "b")
                .with_status(TaskStatus::Completed)
                .with_due_date(utc(2026, 3, 5, 15, 0)),
            Task::new("c", "c").with_priority(Priority::Low),
            Task::new("d", "d").with_due_date(utc(2026, 2, 20, 0, 0)),
        ];
        let mut counts = HashMap::new();
        counts.insert("d".to_string(), 3);

        let out = calculate_all_notification_schedules(&tasks, &profile(), &counts, now);
        let ids: Vec<_> = out.iter().map(|s| s.task_id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);

        counts.clear();
        let out = calculate_all_notification_schedules(&tasks, &profile(), &counts, now);
        let ids: Vec<_> = out.iter().map(|s| s.task_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn summary_counts_by_priority_and_type() {
        let now = utc(2026, 3, 2, 8, 0);
        let tasks = vec![
            Task::new("a", "a")
                .with_priority(Priority::High)
                .with_due_date(utc(2026, 3, 5, 15, 0)),
            Task::new("b", "b").with_due_date(utc(2026, 3, 5, 15, 0)),
        ];
        let schedules =
            calculate_all_notification_schedules(&tasks, &profile(), &HashMap::new(), now);
        let summary = get_notification_summary(&schedules);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_priority.get(&Priority::High), Some(&3));
        assert_eq!(summary.by_priority.get(&Priority::Medium), Some(&1));
        assert_eq!(summary.by_type.get(&NotificationType::Reminder), Some(&2));
        assert_eq!(summary.by_type.get(&NotificationType::AdvanceNotice), Some(&1));
        assert_eq!(summary.by_type.get(&NotificationType::Overdue), None);

        assert_eq!(get_notification_summary(&[]), NotificationSummary::default());
    }

    #[test]
    fn engine_uses_injected_clock() {
        let now = utc(2026, 3, 2, 8, 0);
        let engine = NotificationEngine::new(profile(), FixedClock(now));
        let t = Task::new("e", "e")
            .with_priority(Priority::High)
            .with_due_date(utc(2026, 3, 5, 15, 0));
        assert_eq!(engine.now(), now);
        assert_eq!(
            engine.schedule(&t, 0),
            calculate_notification_schedule(&t, &profile(), 0, now)
        );
        assert_eq!(engine.schedule_all(&[t], &HashMap::new()).len(), 1);
    }
}
