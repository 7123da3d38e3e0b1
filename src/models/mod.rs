pub mod conversation;
pub mod intent;
pub mod interval;

pub use conversation::{ChatMessage, Role, SessionRecord};
pub use intent::BookingIntent;
pub use interval::{now_local, TimeInterval, TIMEZONE, TIMEZONE_NAME};
