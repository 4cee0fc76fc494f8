//! Time utilities: timezone-aware local instants and work-hours clamping.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::profile::UserProfile;

/// Resolve a local wall-clock time on `date` in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) take the earliest occurrence; times inside
/// a DST gap are pushed forward by one hour.
pub fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let ndt = date.and_time(time);
    match tz.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => match tz.from_local_datetime(&(ndt + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&ndt),
        },
    }
}

/// Local calendar date of `instant` in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Snap `instant` into the profile's work-hours window without changing its
/// local date.
pub fn clamp_to_work_hours(instant: DateTime<Utc>, profile: &UserProfile) -> DateTime<Utc> {
    let local = instant.with_timezone(&profile.timezone);
    let time = local.time();
    let start = profile.work_hours_start.to_naive_time();
    let end = profile.work_hours_end.to_naive_time();

    if time < start {
        local_instant(profile.timezone, local.date_naive(), start)
    } else if time > end {
        local_instant(profile.timezone, local.date_naive(), end)
    } else {
        instant
    }
}
