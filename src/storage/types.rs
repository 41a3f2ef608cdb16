//! Aggregation row types returned by storage queries

use serde::{Deserialize, Serialize};

/// Per-persona conversation aggregates for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaUsage {
    pub persona: String,
    pub conversation_count: i64,
    pub total_messages: i64,
    pub avg_relationship_score: f64,
}

/// Per-persona message aggregates for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaMessageStats {
    pub persona: String,
    pub message_count: i64,
    pub avg_importance: f64,
}
