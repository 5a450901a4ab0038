use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Day/month/year hour:minute, 24-hour clock.
pub const INTERVIEW_FORMAT: &str = "%d/%m/%Y %H:%M";

static INTERVIEW_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}$").expect("valid regex"));

/// Source of "now" in the application's local offset.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

pub fn truncate_to_minute<Tz: TimeZone>(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.with_nanosecond(0)
        .and_then(|d| d.with_second(0))
        .unwrap_or(dt)
}

/// Parses `dd/mm/yyyy HH:MM` as a wall-clock time in `offset`. Calendar
/// overflow such as day 32 or month 13 is rejected.
pub fn parse_interview_datetime(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !INTERVIEW_SHAPE_RE.is_match(raw) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(raw, INTERVIEW_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single()
}

pub fn format_interview_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.format(INTERVIEW_FORMAT).to_string()
}
