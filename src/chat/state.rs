//! Conversation state management and trigger scanners
//!
//! Owns the single-active-thread lookup plus the keyword scanners that
//! turn a processed message into fact, mood, and highlight updates on
//! its conversation.

use crate::error::Result;
use crate::models::{Conversation, HighlightKind, Message, Mood};
use crate::personas::{self, PersonaId};
use crate::storage::SqliteStorage;
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use regex::Regex;
use std::sync::OnceLock;

/// Returns the sole active conversation for a (user, persona) pair,
/// creating one with a randomized persona-themed title if none exists
pub fn get_or_create_active(
    storage: &SqliteStorage,
    user_id: &str,
    persona: PersonaId,
    now: DateTime<Utc>,
) -> Result<Conversation> {
    if let Some(conversation) = storage.find_active_conversation(user_id, persona)? {
        return Ok(conversation);
    }

    let title = random_title(persona);
    let conversation = Conversation::new(user_id, persona, title, now);
    storage.save_conversation(&conversation)?;
    tracing::info!("Created new conversation with {}", persona);

    Ok(conversation)
}

fn random_title(persona: PersonaId) -> String {
    let titles = personas::get(persona).titles;
    titles
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("New Conversation")
        .to_string()
}

// ----------------------------------------------------------------------
// Fact extraction
// ----------------------------------------------------------------------

fn fact_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"my name is (\w+)|i'm (\w+)|call me (\w+)").unwrap())
}

fn fact_age_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"i am (\d+)|i'm (\d+)|(\d+) years old").unwrap())
}

fn fact_job_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"i work as (?:an? )?(\w+)|my job is (?:an? )?(\w+)|i'm an? (\w+)|work at (\w+)")
            .unwrap()
    })
}

fn fact_location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"i live in (\w+)|i'm from (\w+)|in (\w+) city").unwrap())
}

fn fact_hobby_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"i love (\w+)|enjoy (\w+)|hobby is (\w+)").unwrap())
}

fn first_group<'t>(caps: &regex::Captures<'t>) -> Option<&'t str> {
    caps.iter().skip(1).flatten().map(|m| m.as_str()).next()
}

/// Scans user text for facts worth remembering
///
/// Each returned pair is a fact sentence and its importance weight:
/// name 8, age 7 (only 18..=100), job 6, relationship status 6,
/// location 5, hobby 4.
pub fn extract_user_facts(text: &str) -> Vec<(String, u8)> {
    let lowered = text.to_lowercase();
    let mut facts = Vec::new();

    if let Some(name) = fact_name_pattern().captures(&lowered).and_then(|c| first_group(&c)) {
        facts.push((format!("Name is {}", name), 8));
    }

    if let Some(age) = fact_age_pattern().captures(&lowered).and_then(|c| first_group(&c)) {
        if let Ok(age) = age.parse::<u32>() {
            if (18..=100).contains(&age) {
                facts.push((format!("Age is {}", age), 7));
            }
        }
    }

    if let Some(job) = fact_job_pattern().captures(&lowered).and_then(|c| first_group(&c)) {
        facts.push((format!("Works as {}", job), 6));
    }

    if let Some(location) = fact_location_pattern()
        .captures(&lowered)
        .and_then(|c| first_group(&c))
    {
        facts.push((format!("Lives in {}", location), 5));
    }

    if lowered.contains("single") {
        facts.push(("Currently single".to_string(), 6));
    } else if lowered.contains("married")
        || lowered.contains("girlfriend")
        || lowered.contains("boyfriend")
    {
        facts.push(("In a relationship".to_string(), 6));
    }

    if let Some(hobby) = fact_hobby_pattern()
        .captures(&lowered)
        .and_then(|c| first_group(&c))
    {
        facts.push((format!("Enjoys {}", hobby), 4));
    }

    facts
}

// ----------------------------------------------------------------------
// Mood detection
// ----------------------------------------------------------------------

/// Mood vocabularies, scanned in order; the first match wins
const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Happy,
        &["happy", "great", "amazing", "wonderful", "excited", "joy"],
    ),
    (Mood::Sad, &["sad", "depressed", "down", "crying", "upset"]),
    (
        Mood::Worried,
        &["worried", "anxious", "nervous", "concerned", "stress"],
    ),
    (
        Mood::Angry,
        &["angry", "mad", "furious", "annoyed", "irritated"],
    ),
    (
        Mood::Romantic,
        &["love", "romance", "romantic", "kiss", "date"],
    ),
    (
        Mood::Playful,
        &["fun", "funny", "game", "play", "joke", "laugh"],
    ),
];

/// Detection confidence for keyword mood matches
const MOOD_CONFIDENCE: f64 = 0.8;

/// Detects the user's mood from the message text, first match wins
pub fn detect_mood(text: &str) -> Option<(Mood, f64)> {
    let lowered = text.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(mood, _)| (*mood, MOOD_CONFIDENCE))
}

// ----------------------------------------------------------------------
// Highlight detection
// ----------------------------------------------------------------------

/// Scans a processed message for highlight-worthy moments
pub fn detect_highlights(message: &Message) -> Vec<(HighlightKind, &'static str)> {
    let text = message.user_text.to_lowercase();
    let response = message.response_text.to_lowercase();
    let mut highlights = Vec::new();

    if text.contains("haha") || text.contains("lol") || text.contains("funny") {
        highlights.push((HighlightKind::Funny, "User found something amusing"));
    }

    if text.contains("sweet") || text.contains("cute") || response.contains("💕") {
        highlights.push((HighlightKind::Sweet, "Sweet exchange"));
    }

    if message.importance >= 7 || message.user_text.chars().count() > 200 {
        highlights.push((HighlightKind::Deep, "Meaningful conversation"));
    }

    if message.contains_personal_info && message.importance >= 8 {
        highlights.push((HighlightKind::Breakthrough, "User shared something personal"));
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseSource;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_get_or_create_creates_once() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(dir.path().join("db.sqlite")).unwrap();

        let first = get_or_create_active(&storage, "user-1", PersonaId::Emma, now()).unwrap();
        let second = get_or_create_active(&storage, "user-1", PersonaId::Emma, now()).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(storage.list_conversations("user-1", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_distinct_per_persona() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(dir.path().join("db.sqlite")).unwrap();

        let emma = get_or_create_active(&storage, "user-1", PersonaId::Emma, now()).unwrap();
        let luna = get_or_create_active(&storage, "user-1", PersonaId::Luna, now()).unwrap();

        assert_ne!(emma.id, luna.id);
    }

    #[test]
    fn test_created_title_comes_from_persona_pool() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new_with_path(dir.path().join("db.sqlite")).unwrap();

        let conv = get_or_create_active(&storage, "user-1", PersonaId::Sophia, now()).unwrap();
        assert!(personas::get(PersonaId::Sophia)
            .titles
            .contains(&conv.title.as_str()));
    }

    #[test]
    fn test_extract_name_fact() {
        let facts = extract_user_facts("My name is Alex");
        assert!(facts.contains(&("Name is alex".to_string(), 8)));
    }

    #[test]
    fn test_extract_age_fact_in_range() {
        let facts = extract_user_facts("I am 32 now");
        assert!(facts.contains(&("Age is 32".to_string(), 7)));
    }

    #[test]
    fn test_extract_age_fact_out_of_range_dropped() {
        let facts = extract_user_facts("I am 7 now");
        assert!(!facts.iter().any(|(f, _)| f.starts_with("Age")));
    }

    #[test]
    fn test_extract_job_fact() {
        let facts = extract_user_facts("I work as a teacher");
        assert!(facts.contains(&("Works as teacher".to_string(), 6)));
    }

    #[test]
    fn test_extract_location_fact() {
        let facts = extract_user_facts("I live in Lisbon");
        assert!(facts.contains(&("Lives in lisbon".to_string(), 5)));
    }

    #[test]
    fn test_extract_relationship_single() {
        let facts = extract_user_facts("I'm single right now");
        assert!(facts.contains(&("Currently single".to_string(), 6)));
    }

    #[test]
    fn test_extract_relationship_taken() {
        let facts = extract_user_facts("my girlfriend is great");
        assert!(facts.contains(&("In a relationship".to_string(), 6)));
    }

    #[test]
    fn test_extract_hobby_fact() {
        let facts = extract_user_facts("I really enjoy chess");
        assert!(facts.contains(&("Enjoys chess".to_string(), 4)));
    }

    #[test]
    fn test_extract_multiple_facts() {
        let facts = extract_user_facts("My name is Alex and I work as a nurse");
        assert!(facts.len() >= 2);
    }

    #[test]
    fn test_no_facts_in_plain_text() {
        assert!(extract_user_facts("what a day").is_empty());
    }

    #[test]
    fn test_detect_mood_first_match_wins() {
        // "happy" (Happy) appears before any Playful keyword is considered
        let detected = detect_mood("so happy we can play a game");
        assert_eq!(detected, Some((Mood::Happy, 0.8)));
    }

    #[test]
    fn test_detect_mood_sad() {
        assert_eq!(detect_mood("feeling down today"), Some((Mood::Sad, 0.8)));
    }

    #[test]
    fn test_detect_mood_none() {
        assert_eq!(detect_mood("the sky is blue"), None);
    }

    fn highlight_message(text: &str, response: &str) -> Message {
        Message::new(
            "user-1",
            "conv-1",
            PersonaId::Emma,
            text,
            response,
            ResponseSource::Generated,
            now(),
        )
    }

    #[test]
    fn test_highlight_funny() {
        let msg = highlight_message("haha that was good", "Glad you liked it!");
        let highlights = detect_highlights(&msg);
        assert!(highlights.iter().any(|(k, _)| *k == HighlightKind::Funny));
    }

    #[test]
    fn test_highlight_sweet_from_response() {
        let msg = highlight_message("ok", "You're so lovely 💕");
        let highlights = detect_highlights(&msg);
        assert!(highlights.iter().any(|(k, _)| *k == HighlightKind::Sweet));
    }

    #[test]
    fn test_highlight_deep_by_importance() {
        let mut msg = highlight_message("something meaningful", "I hear you");
        msg.importance = 7;
        let highlights = detect_highlights(&msg);
        assert!(highlights.iter().any(|(k, _)| *k == HighlightKind::Deep));
    }

    #[test]
    fn test_highlight_deep_by_length() {
        let long = "a".repeat(201);
        let msg = highlight_message(&long, "I hear you");
        let highlights = detect_highlights(&msg);
        assert!(highlights.iter().any(|(k, _)| *k == HighlightKind::Deep));
    }

    #[test]
    fn test_highlight_breakthrough() {
        let mut msg = highlight_message("my deepest secret", "Thank you for trusting me");
        msg.contains_personal_info = true;
        msg.importance = 8;
        let highlights = detect_highlights(&msg);
        assert!(highlights
            .iter()
            .any(|(k, _)| *k == HighlightKind::Breakthrough));
    }

    #[test]
    fn test_no_highlights_in_plain_exchange() {
        let msg = highlight_message("ok", "Alright!");
        assert!(detect_highlights(&msg).is_empty());
    }
}
