use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingIntent {
    pub is_booking: bool,
    pub title: String,
}
