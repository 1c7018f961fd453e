//! History chat assistant: an append-only transcript plus a fixed prompt
//! wrapped around each question.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{GroqClient, prompts};

const CHAT_MAX_TOKENS: u32 = 4000;

pub const WELCOME_MESSAGE: &str = "👋 Welcome! I'm your History Teacher. I'm here to help you \
    explore the fascinating world of history. Feel free to ask me about any historical period, \
    event, figure, or civilization!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Append-only conversation history, seeded with a welcome turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Default for Transcript {
    #[inline]
    fn default() -> Self {
        Self {
            turns: vec![ChatTurn {
                role: ChatRole::Assistant,
                content: WELCOME_MESSAGE.to_string(),
            }],
        }
    }
}

impl Transcript {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    #[inline]
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    #[inline]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Reset the conversation back to the single welcome turn.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Suggested starting points shown alongside the chat.
#[inline]
pub fn suggested_topics() -> &'static [&'static str] {
    &[
        "🏺 Ancient Civilizations (Egypt, Greece, Rome)",
        "🏰 Medieval Europe and the Middle Ages",
        "🎨 Renaissance and Reformation",
        "🚢 Age of Exploration and Discovery",
        "⚙️ Industrial Revolution",
        "⚔️ World Wars (WWI and WWII)",
        "🥶 Cold War Era",
        "🇫🇷 French Revolution",
        "🇺🇸 American Revolution",
        "🐉 Ancient China and Dynasties",
        "🕌 Islamic Golden Age",
        "🏛️ Byzantine Empire",
        "⚔️ Vikings and Norse History",
        "🏹 Mongol Empire",
        "🌍 Decolonization Movements",
    ]
}

/// Wraps the LLM client with the history prompt and transcript bookkeeping.
pub struct HistoryAssistant {
    groq: GroqClient,
    transcript: Transcript,
}

impl HistoryAssistant {
    #[inline]
    pub fn new(groq: GroqClient) -> Self {
        Self {
            groq,
            transcript: Transcript::new(),
        }
    }

    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[inline]
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Ask a question and record both sides of the exchange.
    ///
    /// LLM failures never surface as errors; the user sees an apologetic
    /// message and the conversation continues.
    #[inline]
    pub fn ask(&mut self, question: &str) -> &str {
        self.transcript.push_user(question);

        let answer = match self.groq.complete(
            prompts::HISTORY_ASSISTANT_SYSTEM,
            question,
            CHAT_MAX_TOKENS,
        ) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Chat completion failed: {}", e);
                format!(
                    "I apologize, but I encountered an error while processing your question: {e}"
                )
            }
        };

        self.transcript.push_assistant(answer);
        self.transcript
            .turns()
            .last()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    }
}
