use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

/// Every resolved timestamp lives in this zone.
pub const TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Name sent to the calendar provider alongside each event.
pub const TIMEZONE_NAME: &str = "Asia/Kolkata";

pub const SLOT_DURATION_MINUTES: i64 = 30;

/// Current instant in the booking timezone.
pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&TIMEZONE)
}

/// Half-open `[start, end)` window for a single calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    #[serde(serialize_with = "serialize_rfc3339")]
    pub start: DateTime<Tz>,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    /// Builds a slot of the standard length starting at `start`, normalized to IST.
    pub fn starting_at(start: DateTime<Tz>) -> Self {
        let start = start.with_timezone(&TIMEZONE);
        Self {
            start,
            end: start + Duration::minutes(SLOT_DURATION_MINUTES),
        }
    }

    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339()
    }

    /// Human-readable start used in chat replies, e.g. `2025-07-12 10:00 AM`.
    pub fn display_start(&self) -> String {
        self.start.format("%Y-%m-%d %I:%M %p").to_string()
    }
}

fn serialize_rfc3339<S: Serializer>(dt: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339())
}
