use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::models::{TimeInterval, TIMEZONE};

/// Wall-clock hour used when no time could be read from the message.
pub const FALLBACK_HOUR: u32 = 11;

/// Default slot for bookings without a usable date: tomorrow at 11:00 IST.
pub fn fallback_slot(now: &DateTime<Tz>) -> TimeInterval {
    let tomorrow = now.with_timezone(&TIMEZONE).date_naive() + Duration::days(1);
    let naive = tomorrow.and_time(NaiveTime::MIN) + Duration::hours(FALLBACK_HOUR as i64);

    // IST has no DST transitions, so the local time always maps to one instant
    let start = TIMEZONE
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| TIMEZONE.from_utc_datetime(&naive));

    TimeInterval::starting_at(start)
}
