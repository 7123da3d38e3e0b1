use chrono::DateTime;
use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{ChatMessage, TIMEZONE_NAME};
use crate::services::ai::SYSTEM_PROMPT;
use crate::services::{intent, scheduling, time_extractor};
use crate::state::AppState;

/// Handles one chat message for `session_id` and returns the reply text.
///
/// Booking requests go straight to the calendar; everything else is answered
/// by the language model with the full session history. The session stays
/// locked for the whole call so turns of one session never interleave.
pub async fn process_message(
    state: &AppState,
    session_id: &str,
    message: &str,
    now: DateTime<Tz>,
) -> Result<String, AppError> {
    let session = state.sessions.get_or_create(session_id);
    let mut record = session.lock().await;

    record.messages.push(ChatMessage::user(message));

    let intent = intent::classify(message);
    tracing::info!(
        session_id,
        is_booking = intent.is_booking,
        history_len = record.messages.len(),
        "processing message"
    );

    let result = if intent.is_booking {
        book_event(state, &intent.title, message, &now).await
    } else {
        state
            .llm
            .chat(SYSTEM_PROMPT, &record.messages)
            .await
            .map_err(|e| AppError::Ai(format!("{e:#}")))
    };

    if let Ok(reply) = &result {
        record.messages.push(ChatMessage::assistant(reply.clone()));
    }
    state.sessions.touch(session_id);

    result
}

async fn book_event(
    state: &AppState,
    title: &str,
    message: &str,
    now: &DateTime<Tz>,
) -> Result<String, AppError> {
    let (interval, reply) = match time_extractor::extract(message, now) {
        Some(interval) => {
            let reply = format!("{title} booked at {}", interval.display_start());
            (interval, reply)
        }
        None => {
            let interval = scheduling::fallback_slot(now);
            tracing::info!(title, start = %interval.start_iso(), "no datetime in request, using fallback slot");
            let reply = format!("{title} booked at fallback time: {}", interval.display_start());
            (interval, reply)
        }
    };

    state
        .calendar
        .create_event(title, &interval, TIMEZONE_NAME)
        .await
        .map_err(|e| AppError::Calendar(format!("{e:#}")))?;

    Ok(reply)
}
