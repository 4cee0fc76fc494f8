//! User profile: work-hours window, peak-energy preference and timezone.
//!
//! Settings arrive as strings (config file, persistence layer) and are parsed
//! once here into structured values, so the engine never re-parses `HH:MM`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveTime;
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result, TimeOfDayError};

fn hhmm_regex() -> &'static Regex {
    static HHMM_RE: OnceLock<Regex> = OnceLock::new();
    HHMM_RE.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("HH:MM regex must compile"))
}

/// Local wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> std::result::Result<Self, TimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(TimeOfDayError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let caps = hhmm_regex()
            .captures(s)
            .ok_or_else(|| TimeOfDayError::Format(s.to_string()))?;
        let hour: u32 = caps[1]
            .parse()
            .map_err(|_| TimeOfDayError::Format(s.to_string()))?;
        let minute: u32 = caps[2]
            .parse()
            .map_err(|_| TimeOfDayError::Format(s.to_string()))?;
        Self::new(hour, minute).map_err(|_| TimeOfDayError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakEnergyTime {
    Morning,
    Afternoon,
    Evening,
}

impl PeakEnergyTime {
    /// Hour range `[start, end)` of the energy window.
    pub fn window(self) -> (u32, u32) {
        match self {
            PeakEnergyTime::Morning => (8, 12),
            PeakEnergyTime::Afternoon => (12, 17),
            PeakEnergyTime::Evening => (17, 21),
        }
    }

    pub fn start_hour(self) -> u32 {
        self.window().0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeakEnergyTime::Morning => "morning",
            PeakEnergyTime::Afternoon => "afternoon",
            PeakEnergyTime::Evening => "evening",
        }
    }
}

impl FromStr for PeakEnergyTime {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(PeakEnergyTime::Morning),
            "afternoon" => Ok(PeakEnergyTime::Afternoon),
            "evening" => Ok(PeakEnergyTime::Evening),
            _ => Err(ProfileError::PeakEnergy(s.to_string())),
        }
    }
}

/// String form of the profile, as stored by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub work_hours_start: String,
    pub work_hours_end: String,
    pub peak_energy_time: String,
    /// IANA name, e.g. "America/Chicago".
    pub timezone: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            work_hours_start: "09:00".to_string(),
            work_hours_end: "17:00".to_string(),
            peak_energy_time: "morning".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Parsed, validated profile handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfile {
    pub work_hours_start: TimeOfDay,
    pub work_hours_end: TimeOfDay,
    pub peak_energy_time: PeakEnergyTime,
    pub timezone: Tz,
}

impl UserProfile {
    pub fn new(
        work_hours_start: TimeOfDay,
        work_hours_end: TimeOfDay,
        peak_energy_time: PeakEnergyTime,
        timezone: Tz,
    ) -> Result<Self> {
        if work_hours_start >= work_hours_end {
            return Err(ProfileError::EmptyWorkWindow {
                start: work_hours_start.to_string(),
                end: work_hours_end.to_string(),
            });
        }
        Ok(Self {
            work_hours_start,
            work_hours_end,
            peak_energy_time,
            timezone,
        })
    }

    pub fn from_settings(settings: &ProfileSettings) -> Result<Self> {
        let start = settings
            .work_hours_start
            .parse()
            .map_err(|source| ProfileError::TimeOfDay {
                field: "work_hours_start",
                source,
            })?;
        let end = settings
            .work_hours_end
            .parse()
            .map_err(|source| ProfileError::TimeOfDay {
                field: "work_hours_end",
                source,
            })?;
        let peak = settings.peak_energy_time.parse()?;
        let tz: Tz = settings
            .timezone
            .parse()
            .map_err(|_| ProfileError::Timezone(settings.timezone.clone()))?;

        Self::new(start, end, peak, tz)
    }

    pub fn to_settings(&self) -> ProfileSettings {
        ProfileSettings {
            work_hours_start: self.work_hours_start.to_string(),
            work_hours_end: self.work_hours_end.to_string(),
            peak_energy_time: self.peak_energy_time.as_str().to_string(),
            timezone: self.timezone.name().to_string(),
        }
    }
}

impl Default for UserProfile {
    /// 09:00-17:00 UTC, morning person.
    fn default() -> Self {
        Self {
            work_hours_start: TimeOfDay { hour: 9, minute: 0 },
            work_hours_end: TimeOfDay { hour: 17, minute: 0 },
            peak_energy_time: PeakEnergyTime::Morning,
            timezone: Tz::UTC,
        }
    }
}
