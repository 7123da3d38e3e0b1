use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;
use regex::Regex;

use crate::models::{TimeInterval, TIMEZONE};

/// Candidate date/time phrases, highest precedence first.
const DATETIME_PATTERNS: [&str; 5] = [
    // 2025-07-12 at 10am
    r"\b\d{4}-\d{2}-\d{2}\s*(?:at\s*)?\d{1,2}(?::\d{2})?\s*(?:am|pm)?",
    // tomorrow at 11am
    r"\b(?:tomorrow|today|next\s+\w+)\s*(?:at\s*)?\d{1,2}(?::\d{2})?\s*(?:am|pm)?",
    // 4pm tomorrow
    r"\b\d{1,2}(?::\d{2})?\s*(?:am|pm)?\s*(?:tomorrow|today|next\s+\w+)",
    // friday 12pm
    r"\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\s*\d{1,2}(?::\d{2})?\s*(?:am|pm)?",
    // bare relative day
    r"\b(?:tomorrow|today|next\s+\w+)",
];

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DATETIME_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("datetime pattern must compile"))
        .collect()
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<date>\d{4}-\d{2}-\d{2})|(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>a\.?m\.?|p\.?m\.?)?|(?P<word>[a-z]+)",
    )
    .expect("token pattern must compile")
});

/// Finds a date/time in `message` and turns it into a booking slot.
///
/// Returns `None` when nothing in the message resolves to a point in time;
/// callers are expected to fall back to a default slot.
pub fn extract(message: &str, now: &DateTime<Tz>) -> Option<TimeInterval> {
    let fragment = find_fragment(message);

    match resolve(&fragment, now) {
        Some(start) => {
            let interval = TimeInterval::starting_at(start);
            tracing::debug!(
                fragment = %fragment,
                start = %interval.start_iso(),
                end = %interval.end_iso(),
                "parsed datetime from message"
            );
            Some(interval)
        }
        None => {
            tracing::debug!(fragment = %fragment, "no datetime found in message");
            None
        }
    }
}

/// First pattern to match anywhere wins. Without a match the whole message is
/// handed to the resolver.
pub fn find_fragment(message: &str) -> String {
    let lowered = message.to_lowercase();
    PATTERNS
        .iter()
        .find_map(|re| re.find(&lowered))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| message.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DayCue {
    Absolute(NaiveDate),
    Today,
    Tomorrow,
    NextWeek,
    Weekday { day: Weekday, strictly_after: bool },
}

/// Resolves a date/time fragment relative to `now`, preferring future dates.
///
/// The fragment may only contain date and time tokens plus a few filler words;
/// anything else makes it unresolvable.
pub fn resolve(fragment: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let lowered = fragment.to_lowercase();
    let (day, clock) = tokenize(&lowered)?;

    let now = now.with_timezone(&TIMEZONE);
    let now_naive = now.naive_local();
    let today = now_naive.date();
    let now_time = now_naive.time().with_nanosecond(0)?;

    let naive: NaiveDateTime = match (day, clock) {
        (None, None) => return None,
        (None, Some(time)) => {
            let candidate = today.and_time(time);
            if candidate > now_naive {
                candidate
            } else {
                today.checked_add_signed(Duration::days(1))?.and_time(time)
            }
        }
        (Some(DayCue::Absolute(date)), time) => date.and_time(time.unwrap_or(NaiveTime::MIN)),
        (Some(DayCue::Today), time) => today.and_time(time.unwrap_or(now_time)),
        (Some(DayCue::Tomorrow), time) => today
            .checked_add_signed(Duration::days(1))?
            .and_time(time.unwrap_or(now_time)),
        (Some(DayCue::NextWeek), time) => today
            .checked_add_signed(Duration::days(7))?
            .and_time(time.unwrap_or(now_time)),
        (Some(DayCue::Weekday { day, strictly_after }), time) => {
            let time = time.unwrap_or(now_time);
            let mut ahead = days_until(today.weekday(), day);
            if ahead == 0 && (strictly_after || today.and_time(time) <= now_naive) {
                ahead = 7;
            }
            today
                .checked_add_signed(Duration::days(ahead))?
                .and_time(time)
        }
    };

    TIMEZONE.from_local_datetime(&naive).single()
}

fn tokenize(fragment: &str) -> Option<(Option<DayCue>, Option<NaiveTime>)> {
    let mut day: Option<DayCue> = None;
    let mut clock: Option<NaiveTime> = None;
    let mut pending_next = false;
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(fragment) {
        let whole = caps.get(0)?;
        if !is_separator(&fragment[cursor..whole.start()]) {
            return None;
        }
        cursor = whole.end();

        if let Some(word) = caps.name("word") {
            let word = word.as_str();
            if pending_next {
                pending_next = false;
                let cue = if word == "week" {
                    DayCue::NextWeek
                } else {
                    DayCue::Weekday {
                        day: parse_weekday(word)?,
                        strictly_after: true,
                    }
                };
                set_once(&mut day, cue)?;
                continue;
            }

            match word {
                "at" | "on" | "this" => {}
                "today" => set_once(&mut day, DayCue::Today)?,
                "tomorrow" => set_once(&mut day, DayCue::Tomorrow)?,
                "next" => pending_next = true,
                other => set_once(
                    &mut day,
                    DayCue::Weekday {
                        day: parse_weekday(other)?,
                        strictly_after: false,
                    },
                )?,
            }
            continue;
        }

        // "next" must be followed by a weekday or "week"
        if pending_next {
            return None;
        }

        if let Some(date) = caps.name("date") {
            let date = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").ok()?;
            set_once(&mut day, DayCue::Absolute(date))?;
        } else if let Some(hour) = caps.name("hour") {
            let hour: u32 = hour.as_str().parse().ok()?;
            let minute: u32 = match caps.name("minute") {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            let meridiem = caps.name("meridiem").map(|m| m.as_str().starts_with('p'));
            set_once(&mut clock, clock_time(hour, minute, meridiem)?)?;
        }
    }

    if pending_next || !is_separator(&fragment[cursor..]) {
        return None;
    }

    Some((day, clock))
}

fn clock_time(hour: u32, minute: u32, is_pm: Option<bool>) -> Option<NaiveTime> {
    let hour = match is_pm {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            if pm {
                hour % 12 + 12
            } else {
                hour % 12
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    let day = match word {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn days_until(from: Weekday, to: Weekday) -> i64 {
    let from = from.num_days_from_monday() as i64;
    let to = to.num_days_from_monday() as i64;
    (to - from).rem_euclid(7)
}

fn is_separator(gap: &str) -> bool {
    gap.chars()
        .all(|c| c.is_whitespace() || matches!(c, ',' | '.' | '!' | '?'))
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Option<()> {
    if slot.is_some() {
        return None;
    }
    *slot = Some(value);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-06-01 is a Sunday
    fn now() -> DateTime<Tz> {
        TIMEZONE.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn start_of(message: &str) -> Option<String> {
        extract(message, &now()).map(|i| i.start_iso())
    }

    #[test]
    fn test_absolute_date_and_time() {
        let interval = extract("2025-07-12 at 10am", &now()).unwrap();
        assert_eq!(interval.start_iso(), "2025-07-12T10:00:00+05:30");
        assert_eq!(interval.end_iso(), "2025-07-12T10:30:00+05:30");
    }

    #[test]
    fn test_relative_day_and_time() {
        let interval = extract("tomorrow at 4pm", &now()).unwrap();
        assert_eq!(interval.start_iso(), "2025-06-02T16:00:00+05:30");
        assert_eq!(interval.end_iso(), "2025-06-02T16:30:00+05:30");
    }

    #[test]
    fn test_fragment_inside_sentence() {
        assert_eq!(
            start_of("Schedule a call with Raj tomorrow at 4pm please").as_deref(),
            Some("2025-06-02T16:00:00+05:30")
        );
    }

    #[test]
    fn test_time_before_relative_day() {
        assert_eq!(
            start_of("book a meeting at 4:15pm tomorrow").as_deref(),
            Some("2025-06-02T16:15:00+05:30")
        );
    }

    #[test]
    fn test_weekday_and_time() {
        assert_eq!(
            start_of("arrange a call friday 3:30pm").as_deref(),
            Some("2025-06-06T15:30:00+05:30")
        );
    }

    #[test]
    fn test_next_weekday_is_strictly_after_today() {
        assert_eq!(
            start_of("book a meeting next monday at 10am").as_deref(),
            Some("2025-06-02T10:00:00+05:30")
        );
        assert_eq!(
            start_of("book a meeting next sunday at 10am").as_deref(),
            Some("2025-06-08T10:00:00+05:30")
        );
    }

    #[test]
    fn test_same_weekday_already_passed_rolls_forward() {
        assert_eq!(
            start_of("sunday 8am").as_deref(),
            Some("2025-06-08T08:00:00+05:30")
        );
        assert_eq!(
            start_of("sunday 6pm").as_deref(),
            Some("2025-06-01T18:00:00+05:30")
        );
    }

    #[test]
    fn test_mixed_cues_use_first_matching_pattern() {
        assert_eq!(
            find_fragment("Book a meeting next Saturday at 10am 2025-07-12"),
            "next saturday at 10am"
        );
        assert_eq!(
            start_of("Book a meeting next Saturday at 10am 2025-07-12").as_deref(),
            Some("2025-06-07T10:00:00+05:30")
        );
    }

    #[test]
    fn test_bare_relative_day_keeps_current_time() {
        assert_eq!(
            start_of("book a meeting tomorrow").as_deref(),
            Some("2025-06-02T09:00:00+05:30")
        );
        assert_eq!(
            start_of("set up a call next week").as_deref(),
            Some("2025-06-08T09:00:00+05:30")
        );
    }

    #[test]
    fn test_today_is_not_shifted() {
        assert_eq!(
            start_of("today at 7am").as_deref(),
            Some("2025-06-01T07:00:00+05:30")
        );
    }

    #[test]
    fn test_whole_message_fallback() {
        assert_eq!(start_of("5pm").as_deref(), Some("2025-06-01T17:00:00+05:30"));
        assert_eq!(start_of("8am").as_deref(), Some("2025-06-02T08:00:00+05:30"));
        assert_eq!(
            start_of("2025-07-12").as_deref(),
            Some("2025-07-12T00:00:00+05:30")
        );
    }

    #[test]
    fn test_no_datetime() {
        assert_eq!(start_of("book a meeting with the team"), None);
        assert_eq!(start_of("schedule an appointment at 5pm"), None);
        assert_eq!(start_of(""), None);
    }

    #[test]
    fn test_invalid_clock_values() {
        assert_eq!(start_of("tomorrow at 13pm"), None);
        assert_eq!(start_of("tomorrow at 10:75"), None);
        assert_eq!(start_of("next meeting 3"), None);
    }

    #[test]
    fn test_twenty_four_hour_and_midnight() {
        assert_eq!(
            start_of("tomorrow at 16:45").as_deref(),
            Some("2025-06-02T16:45:00+05:30")
        );
        assert_eq!(
            start_of("tomorrow at 12am").as_deref(),
            Some("2025-06-02T00:00:00+05:30")
        );
        assert_eq!(
            start_of("tomorrow at 12pm").as_deref(),
            Some("2025-06-02T12:00:00+05:30")
        );
    }

    #[test]
    fn test_naive_resolution_keeps_wall_clock_in_other_zone_anchor() {
        let utc_now = chrono::Utc
            .with_ymd_and_hms(2025, 6, 1, 3, 30, 0)
            .unwrap()
            .with_timezone(&chrono_tz::UTC);
        let start = resolve("tomorrow at 4pm", &utc_now).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-06-02T16:00:00+05:30");
    }
}
