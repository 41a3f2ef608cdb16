//! Core data model: users, conversations, and messages
//!
//! These records own all pipeline state. A `User` owns its
//! `Conversation`s, and a `Conversation` owns its `Message`s; account
//! deletion cascades down that ownership chain.

pub mod conversation;
pub mod message;
pub mod user;

pub use conversation::{
    Conversation, ConversationStatus, ConversationSummary, Highlight, HighlightKind, Mood,
    MoodEntry, MoodState, UserFact, MAX_FACTS, MAX_HIGHLIGHTS, MAX_MOOD_HISTORY,
};
pub use message::{
    Message, ResponseSource, Sentiment, Topic, MAX_FEEDBACK_LEN, MAX_RESPONSE_LEN, MAX_USER_TEXT_LEN,
};
pub use user::{Relationship, SubscriptionTier, Usage, User};
