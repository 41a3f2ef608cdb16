//! Conversation record: per (user, persona) thread state
//!
//! Tracks message counters, relationship progression, discovered user
//! facts, mood history, and highlight moments. All bounded collections
//! evict their oldest (or least important) entries.

use crate::personas::PersonaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Facts retained per conversation, sorted by importance
pub const MAX_FACTS: usize = 20;
/// Mood history entries retained per conversation
pub const MAX_MOOD_HISTORY: usize = 50;
/// Highlights retained per conversation
pub const MAX_HIGHLIGHTS: usize = 10;

/// Lifecycle state of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Paused,
    Archived,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Paused => "paused",
            ConversationStatus::Archived => "archived",
        }
    }
}

/// Detected user mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Worried,
    Angry,
    #[default]
    Neutral,
    Romantic,
    Playful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
            Mood::Worried => "worried",
            Mood::Angry => "angry",
            Mood::Neutral => "neutral",
            Mood::Romantic => "romantic",
            Mood::Playful => "playful",
        }
    }
}

/// One mood observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

/// Current mood plus a bounded observation history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodState {
    pub current: Mood,
    pub history: Vec<MoodEntry>,
}

/// A fact about the user discovered in this conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFact {
    pub fact: String,
    /// Importance weight in [1, 10]
    pub importance: u8,
    pub discovered_at: DateTime<Utc>,
}

/// Category of a highlight moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Funny,
    Sweet,
    Deep,
    Flirty,
    Supportive,
    Breakthrough,
}

impl HighlightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightKind::Funny => "funny",
            HighlightKind::Sweet => "sweet",
            HighlightKind::Deep => "deep",
            HighlightKind::Flirty => "flirty",
            HighlightKind::Supportive => "supportive",
            HighlightKind::Breakthrough => "breakthrough",
        }
    }
}

/// A memorable moment within a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub description: String,
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A (user, persona) conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub persona: PersonaId,
    pub title: String,
    pub status: ConversationStatus,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: u64,
    /// Conversation-scoped progression score in [0, 100]
    pub relationship_score: f64,
    /// Derived from the score: floor(score / 10) + 1, capped at 10
    pub intimacy_level: u8,
    pub facts: Vec<UserFact>,
    pub mood: MoodState,
    pub highlights: Vec<Highlight>,
}

/// Compact listing entry for a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub persona: PersonaId,
    pub duration_days: i64,
    pub message_count: u64,
    pub relationship_level: String,
    pub highlight_count: usize,
    pub last_activity: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new active conversation
    pub fn new(
        user_id: impl Into<String>,
        persona: PersonaId,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            persona,
            title: title.into(),
            status: ConversationStatus::Active,
            started_at: now,
            last_activity: now,
            message_count: 0,
            relationship_score: 0.0,
            intimacy_level: 1,
            facts: Vec::new(),
            mood: MoodState::default(),
            highlights: Vec::new(),
        }
    }

    /// Records a processed message against this conversation
    ///
    /// Increments the counter, refreshes the activity timestamp, and
    /// advances the relationship score: +2 for important messages
    /// (importance >= 5), +0.5 otherwise, capped at 100. The intimacy
    /// level is recomputed from the score.
    pub fn record_message(&mut self, importance: u8, now: DateTime<Utc>) {
        self.message_count += 1;
        self.last_activity = now;

        let delta = if importance >= 5 { 2.0 } else { 0.5 };
        self.relationship_score = (self.relationship_score + delta).min(100.0);
        self.intimacy_level = intimacy_for(self.relationship_score);
    }

    /// Inserts a discovered fact unless an equal fact already exists
    ///
    /// Equality is case-insensitive on the fact text. After insertion the
    /// list is re-sorted by importance descending and truncated to
    /// [`MAX_FACTS`].
    pub fn upsert_fact(&mut self, fact: impl Into<String>, importance: u8, now: DateTime<Utc>) {
        let fact = fact.into();
        let lowered = fact.to_lowercase();
        if self.facts.iter().any(|f| f.fact.to_lowercase() == lowered) {
            return;
        }

        self.facts.push(UserFact {
            fact,
            importance: importance.clamp(1, 10),
            discovered_at: now,
        });
        self.facts.sort_by(|a, b| b.importance.cmp(&a.importance));
        self.facts.truncate(MAX_FACTS);
    }

    /// Sets the current mood and appends to the bounded history
    pub fn record_mood(&mut self, mood: Mood, confidence: f64, now: DateTime<Utc>) {
        self.mood.current = mood;
        self.mood.history.push(MoodEntry {
            mood,
            timestamp: now,
            confidence: confidence.clamp(0.0, 1.0),
        });

        if self.mood.history.len() > MAX_MOOD_HISTORY {
            let excess = self.mood.history.len() - MAX_MOOD_HISTORY;
            self.mood.history.drain(..excess);
        }
    }

    /// Appends a highlight, evicting the oldest past [`MAX_HIGHLIGHTS`]
    pub fn add_highlight(
        &mut self,
        kind: HighlightKind,
        description: impl Into<String>,
        message_id: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.highlights.push(Highlight {
            kind,
            description: description.into(),
            message_id: message_id.into(),
            timestamp: now,
        });

        if self.highlights.len() > MAX_HIGHLIGHTS {
            let excess = self.highlights.len() - MAX_HIGHLIGHTS;
            self.highlights.drain(..excess);
        }
    }

    /// Human-readable relationship level label for this conversation
    pub fn relationship_level(&self) -> &'static str {
        let score = self.relationship_score;
        if score < 10.0 {
            "Just Met"
        } else if score < 25.0 {
            "Getting Acquainted"
        } else if score < 40.0 {
            "Friendly Chat"
        } else if score < 60.0 {
            "Good Friends"
        } else if score < 80.0 {
            "Close Connection"
        } else {
            "Deep Bond"
        }
    }

    /// Compact summary for listing views
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            persona: self.persona,
            duration_days: (self.last_activity - self.started_at).num_days(),
            message_count: self.message_count,
            relationship_level: self.relationship_level().to_string(),
            highlight_count: self.highlights.len(),
            last_activity: self.last_activity,
        }
    }
}

fn intimacy_for(score: f64) -> u8 {
    let level = (score / 10.0).floor() as u8 + 1;
    level.min(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn conversation() -> Conversation {
        Conversation::new("user-1", PersonaId::Emma, "Heart to Heart with Emma", now())
    }

    #[test]
    fn test_new_conversation_defaults() {
        let conv = conversation();
        assert_eq!(conv.status, ConversationStatus::Active);
        assert_eq!(conv.message_count, 0);
        assert_eq!(conv.relationship_score, 0.0);
        assert_eq!(conv.intimacy_level, 1);
        assert_eq!(conv.mood.current, Mood::Neutral);
    }

    #[test]
    fn test_record_message_ordinary() {
        let mut conv = conversation();
        conv.record_message(3, now());
        assert_eq!(conv.message_count, 1);
        assert_eq!(conv.relationship_score, 0.5);
    }

    #[test]
    fn test_record_message_important() {
        let mut conv = conversation();
        conv.record_message(7, now());
        assert_eq!(conv.relationship_score, 2.0);
    }

    #[test]
    fn test_relationship_score_caps_at_100() {
        let mut conv = conversation();
        for _ in 0..60 {
            conv.record_message(9, now());
        }
        assert_eq!(conv.relationship_score, 100.0);
        assert_eq!(conv.intimacy_level, 10);
    }

    #[test]
    fn test_relationship_score_monotonic() {
        let mut conv = conversation();
        let mut prev = conv.relationship_score;
        for importance in [1, 9, 3, 10, 5, 2] {
            conv.record_message(importance, now());
            assert!(conv.relationship_score >= prev);
            prev = conv.relationship_score;
        }
    }

    #[test]
    fn test_intimacy_derivation() {
        let mut conv = conversation();
        conv.relationship_score = 42.0;
        conv.record_message(7, now());
        // 44.0 -> floor(44 / 10) + 1 = 5
        assert_eq!(conv.intimacy_level, 5);
    }

    #[test]
    fn test_upsert_fact_dedup_case_insensitive() {
        let mut conv = conversation();
        conv.upsert_fact("Name is Alex", 8, now());
        conv.upsert_fact("name is alex", 3, now());
        assert_eq!(conv.facts.len(), 1);
        assert_eq!(conv.facts[0].importance, 8);
    }

    #[test]
    fn test_upsert_fact_sorted_and_bounded() {
        let mut conv = conversation();
        for i in 0..30u8 {
            conv.upsert_fact(format!("fact {}", i), (i % 10) + 1, now());
        }
        assert_eq!(conv.facts.len(), MAX_FACTS);
        for pair in conv.facts.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
    }

    #[test]
    fn test_upsert_fact_clamps_importance() {
        let mut conv = conversation();
        conv.upsert_fact("something", 0, now());
        assert_eq!(conv.facts[0].importance, 1);
    }

    #[test]
    fn test_record_mood_updates_current_and_history() {
        let mut conv = conversation();
        conv.record_mood(Mood::Happy, 0.8, now());
        conv.record_mood(Mood::Sad, 0.8, now());
        assert_eq!(conv.mood.current, Mood::Sad);
        assert_eq!(conv.mood.history.len(), 2);
    }

    #[test]
    fn test_mood_history_bounded() {
        let mut conv = conversation();
        for _ in 0..60 {
            conv.record_mood(Mood::Playful, 0.8, now());
        }
        assert_eq!(conv.mood.history.len(), MAX_MOOD_HISTORY);
    }

    #[test]
    fn test_mood_confidence_clamped() {
        let mut conv = conversation();
        conv.record_mood(Mood::Happy, 3.0, now());
        assert_eq!(conv.mood.history[0].confidence, 1.0);
    }

    #[test]
    fn test_highlights_bounded_oldest_evicted() {
        let mut conv = conversation();
        for i in 0..15 {
            conv.add_highlight(HighlightKind::Funny, format!("moment {}", i), "msg-1", now());
        }
        assert_eq!(conv.highlights.len(), MAX_HIGHLIGHTS);
        assert_eq!(conv.highlights[0].description, "moment 5");
    }

    #[test]
    fn test_relationship_level_buckets() {
        let mut conv = conversation();
        let cases = [
            (0.0, "Just Met"),
            (9.9, "Just Met"),
            (10.0, "Getting Acquainted"),
            (25.0, "Friendly Chat"),
            (40.0, "Good Friends"),
            (60.0, "Close Connection"),
            (80.0, "Deep Bond"),
            (100.0, "Deep Bond"),
        ];
        for (score, label) in cases {
            conv.relationship_score = score;
            assert_eq!(conv.relationship_level(), label, "score {}", score);
        }
    }

    #[test]
    fn test_summary_fields() {
        let mut conv = conversation();
        conv.record_message(7, now() + chrono::Duration::days(3));
        let summary = conv.summary();
        assert_eq!(summary.duration_days, 3);
        assert_eq!(summary.message_count, 1);
        assert_eq!(summary.persona, PersonaId::Emma);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut conv = conversation();
        conv.upsert_fact("Works as teacher", 6, now());
        conv.record_mood(Mood::Happy, 0.8, now());
        let json = serde_json::to_string(&conv).unwrap();
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, conv.id);
        assert_eq!(back.facts.len(), 1);
        assert_eq!(back.mood.current, Mood::Happy);
    }
}
