pub mod gemini;

use async_trait::async_trait;

use crate::models::ChatMessage;

/// Instruction sent ahead of every general conversation turn.
pub const SYSTEM_PROMPT: &str = "You are a smart calendar assistant. If the user wants to schedule a call, meeting, appointment, \
or event, extract the date, time, and purpose and confirm the booking. Be precise and friendly.";

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, system_prompt: &str, messages: &[ChatMessage]) -> anyhow::Result<String>;
}
