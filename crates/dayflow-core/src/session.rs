//! Time-of-day session buckets.
//!
//! Every task is filed under the session whose hour window contains the
//! local hour it was logged at. Windows may run past midnight by giving an
//! end hour above 24 (`20..26` is 8PM to 2AM).

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Label returned when no configured window contains the hour.
pub const FALLBACK_SESSION: SessionId = SessionId::Night;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionId {
    Morning,
    Midday,
    Afternoon,
    Night,
}

impl SessionId {
    pub const ALL: [SessionId; 4] = [
        SessionId::Morning,
        SessionId::Midday,
        SessionId::Afternoon,
        SessionId::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionId::Morning => "Morning",
            SessionId::Midday => "Midday",
            SessionId::Afternoon => "Afternoon",
            SessionId::Night => "Night",
        }
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::invalid("session", format!("unknown session '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub id: SessionId,
    pub name: String,
    pub time_range: String,
    /// First hour of the window, in `0..24`.
    pub start_hour: u8,
    /// Exclusive end hour. Values above 24 wrap past midnight.
    pub end_hour: u8,
}

impl SessionConfig {
    pub fn new(id: SessionId, time_range: &str, start_hour: u8, end_hour: u8) -> Self {
        Self {
            id,
            name: id.as_str().to_string(),
            time_range: time_range.to_string(),
            start_hour,
            end_hour,
        }
    }

    /// Whether `hour` (0..24) falls inside this window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        let start = u32::from(self.start_hour);
        let end = u32::from(self.end_hour);
        if end > 24 {
            hour >= start || hour < end - 24
        } else {
            start <= hour && hour < end
        }
    }

    /// Check the window is a non-empty range no longer than a day.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let span = i32::from(self.end_hour) - i32::from(self.start_hour);
        if self.start_hour >= 24 || span <= 0 || span > 24 {
            return Err(ValidationError::InvalidHourRange {
                session: self.name.clone(),
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        Ok(())
    }
}

/// The shipped partition of the day into four sessions.
pub fn default_sessions() -> Vec<SessionConfig> {
    vec![
        SessionConfig::new(SessionId::Morning, "5AM - 10AM", 5, 10),
        SessionConfig::new(SessionId::Midday, "10AM - 3PM", 10, 15),
        SessionConfig::new(SessionId::Afternoon, "3PM - 8PM", 15, 20),
        SessionConfig::new(SessionId::Night, "8PM - 5AM", 20, 29),
    ]
}

/// First configured session containing the instant's local hour, if any.
pub fn match_session<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    sessions: &[SessionConfig],
) -> Option<SessionId> {
    let hour = instant.hour();
    sessions
        .iter()
        .find(|session| session.contains_hour(hour))
        .map(|session| session.id)
}

/// Classify an instant into a session, falling back to [`FALLBACK_SESSION`]
/// when the configuration leaves the hour uncovered.
pub fn classify_session<Tz: TimeZone>(instant: &DateTime<Tz>, sessions: &[SessionConfig]) -> SessionId {
    match_session(instant, sessions).unwrap_or_else(|| {
        tracing::debug!(hour = instant.hour(), "no session window matched, using fallback");
        FALLBACK_SESSION
    })
}
