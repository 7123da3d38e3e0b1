pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::TimeInterval;

/// Reference to an event created on the remote calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHandle {
    pub id: String,
    #[serde(rename = "htmlLink", default)]
    pub html_link: Option<String>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn create_event(
        &self,
        title: &str,
        interval: &TimeInterval,
        timezone: &str,
    ) -> anyhow::Result<EventHandle>;
}
