//! Message record: one user turn plus the pipeline's analysis of it
//!
//! Messages are immutable once analyzed, with one exception: a user
//! rating and feedback text may be attached later.

use crate::error::LovechatError;
use crate::personas::PersonaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum user message length in characters
pub const MAX_USER_TEXT_LEN: usize = 1000;
/// Maximum stored response length in characters
pub const MAX_RESPONSE_LEN: usize = 2000;
/// Maximum feedback text length in characters
pub const MAX_FEEDBACK_LEN: usize = 500;

/// How the response text was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Canned phrase matched, no external call
    QuickPhrase,
    /// Served from the response cache
    Cache,
    /// Produced by a generative call
    Generated,
    /// Static degraded phrase after a provider failure
    Fallback,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::QuickPhrase => "quick_phrase",
            ResponseSource::Cache => "cache",
            ResponseSource::Generated => "generated",
            ResponseSource::Fallback => "fallback",
        }
    }
}

/// Topic tags detected in a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    Personal,
    Relationship,
    Career,
    Hobbies,
    Emotions,
    Philosophy,
    Entertainment,
    Advice,
    Flirting,
    DeepTalk,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Greeting => "greeting",
            Topic::Personal => "personal",
            Topic::Relationship => "relationship",
            Topic::Career => "career",
            Topic::Hobbies => "hobbies",
            Topic::Emotions => "emotions",
            Topic::Philosophy => "philosophy",
            Topic::Entertainment => "entertainment",
            Topic::Advice => "advice",
            Topic::Flirting => "flirting",
            Topic::DeepTalk => "deep_talk",
        }
    }
}

/// Sentiment of the user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// One processed message: user text, response, and analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,
    pub persona: PersonaId,
    pub user_text: String,
    pub response_text: String,
    pub timestamp: DateTime<Utc>,

    // Resolver provenance
    pub source: ResponseSource,
    pub model_used: Option<String>,
    pub processing_ms: u64,
    pub tokens_used: u32,
    pub cost_cents: u32,

    // Classifier output
    pub importance: u8,
    pub is_important: bool,
    pub is_first_message: bool,
    pub contains_personal_info: bool,
    pub topics: Vec<Topic>,
    pub sentiment: Sentiment,
    pub memory_tags: Vec<String>,

    // Later-attached user feedback
    pub user_rating: Option<u8>,
    pub user_feedback: Option<String>,
}

impl Message {
    /// Creates a message record with neutral analysis defaults
    ///
    /// The response text is truncated to [`MAX_RESPONSE_LEN`] characters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
        persona: PersonaId,
        user_text: impl Into<String>,
        response_text: impl Into<String>,
        source: ResponseSource,
        now: DateTime<Utc>,
    ) -> Self {
        let mut response_text: String = response_text.into();
        if response_text.chars().count() > MAX_RESPONSE_LEN {
            response_text = response_text.chars().take(MAX_RESPONSE_LEN).collect();
        }

        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
            persona,
            user_text: user_text.into(),
            response_text,
            timestamp: now,
            source,
            model_used: None,
            processing_ms: 0,
            tokens_used: 0,
            cost_cents: 0,
            importance: 1,
            is_important: false,
            is_first_message: false,
            contains_personal_info: false,
            topics: Vec::new(),
            sentiment: Sentiment::Neutral,
            memory_tags: Vec::new(),
            user_rating: None,
            user_feedback: None,
        }
    }

    /// Attaches a user rating and optional feedback
    ///
    /// The only mutation permitted after analysis.
    pub fn rate(&mut self, rating: u8, feedback: Option<String>) -> Result<(), LovechatError> {
        if !(1..=5).contains(&rating) {
            return Err(LovechatError::Validation(format!(
                "Rating must be between 1 and 5, got {}",
                rating
            )));
        }

        if let Some(ref text) = feedback {
            if text.chars().count() > MAX_FEEDBACK_LEN {
                return Err(LovechatError::Validation(format!(
                    "Feedback exceeds {} characters",
                    MAX_FEEDBACK_LEN
                )));
            }
        }

        self.user_rating = Some(rating);
        self.user_feedback = feedback;
        Ok(())
    }
}

/// Validates an incoming user message before any state mutation
pub fn validate_user_text(text: &str) -> Result<(), LovechatError> {
    if text.trim().is_empty() {
        return Err(LovechatError::Validation(
            "Message text must not be empty".to_string(),
        ));
    }

    if text.chars().count() > MAX_USER_TEXT_LEN {
        return Err(LovechatError::Validation(format!(
            "Message exceeds {} characters",
            MAX_USER_TEXT_LEN
        )));
    }

    Ok(())
}
