use std::sync::LazyLock;

use regex::Regex;

use crate::models::BookingIntent;

pub const BOOKING_VERBS: [&str; 6] = ["book", "schedule", "set up", "arrange", "create", "organize"];
pub const BOOKING_NOUNS: [&str; 4] = ["meeting", "call", "appointment", "event"];

const DEFAULT_TITLE: &str = "Meeting";

/// `<noun> with ...` clause per booking noun, same order as `BOOKING_NOUNS`.
static WITH_CLAUSES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    BOOKING_NOUNS
        .iter()
        .map(|noun| {
            let pattern = format!("(?i){} (with .+)", regex::escape(noun));
            (*noun, Regex::new(&pattern).expect("title pattern must compile"))
        })
        .collect()
});

/// Keyword classification of a chat message. No model round-trip: a message
/// counts as a booking request only when it names both an action and an
/// event type.
pub fn classify(message: &str) -> BookingIntent {
    BookingIntent {
        is_booking: is_booking_request(message),
        title: extract_title(message),
    }
}

pub fn is_booking_request(message: &str) -> bool {
    let msg = message.to_lowercase();
    BOOKING_VERBS.iter().any(|v| msg.contains(v)) && BOOKING_NOUNS.iter().any(|n| msg.contains(n))
}

/// Event title from the first booking noun found, e.g. "Call With Raj" for
/// "schedule a call with Raj".
pub fn extract_title(message: &str) -> String {
    let lowered = message.to_lowercase();

    for (noun, with_clause) in WITH_CLAUSES.iter() {
        if !lowered.contains(noun) {
            continue;
        }

        let with_clause = with_clause
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string());

        return match with_clause {
            Some(rest) => format!("{} {}", capitalize(noun), capitalize(&rest)),
            None => capitalize(noun),
        };
    }

    DEFAULT_TITLE.to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_and_noun_is_booking() {
        assert!(classify("Please book a meeting tomorrow").is_booking);
        assert!(classify("Can you SET UP an appointment?").is_booking);
        assert!(classify("organize an event for friday").is_booking);
    }

    #[test]
    fn test_missing_verb_or_noun_is_not_booking() {
        assert!(!classify("what's the weather").is_booking);
        assert!(!classify("book something for me").is_booking);
        assert!(!classify("the meeting went well").is_booking);
    }

    #[test]
    fn test_title_with_clause() {
        assert_eq!(classify("schedule a call with Raj").title, "Call With Raj");
        assert_eq!(
            extract_title("Book a MEETING WITH the design team "),
            "Meeting WITH the design team"
        );
    }

    #[test]
    fn test_with_clause_for_every_noun() {
        assert_eq!(WITH_CLAUSES.len(), BOOKING_NOUNS.len());
        for noun in BOOKING_NOUNS {
            let expected = format!("{} With Asha", capitalize(noun));
            // noun match ignores case
            assert_eq!(extract_title(&format!("book the {noun} with Asha")), expected);
            assert_eq!(extract_title(&format!("BOOK THE {} with Asha", noun.to_uppercase())), expected);
        }
    }

    #[test]
    fn test_title_noun_precedence() {
        // "meeting" is checked before "call"
        assert_eq!(extract_title("call me to book a meeting"), "Meeting");
    }

    #[test]
    fn test_title_without_clause() {
        assert_eq!(extract_title("create an event tomorrow"), "Event");
    }

    #[test]
    fn test_title_defaults_to_meeting() {
        assert_eq!(extract_title("hello there"), "Meeting");
    }
}
