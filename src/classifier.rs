//! Rule-based message classifier
//!
//! A pure function of the message text (plus whether it opens the
//! conversation) producing an importance score, topic tags, a sentiment
//! label, and memory-extraction tags. The vocabularies are plain data
//! tables; there is no model here and no state.

use crate::models::{Sentiment, Topic};
use regex::Regex;
use std::sync::OnceLock;

/// Keywords that mark personal information (+3 importance)
const PERSONAL_KEYWORDS: &[&str] = &[
    "my name", "i am", "i work", "my job", "my family", "birthday", "age", "live in",
];

/// Keywords that mark emotional content (+2 importance)
const EMOTIONAL_KEYWORDS: &[&str] = &[
    "love", "hate", "sad", "happy", "angry", "excited", "worried", "afraid",
];

/// Keywords that mark goals and aspirations (+2 importance)
const GOAL_KEYWORDS: &[&str] = &["want to", "hope to", "dream", "goal", "wish", "plan to"];

/// Per-topic keyword vocabularies; a message may carry any number of topics
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Greeting,
        &["hi", "hello", "hey", "good morning", "good evening"],
    ),
    (Topic::Personal, &["my name", "i am", "about me", "myself"]),
    (
        Topic::Relationship,
        &["love", "dating", "boyfriend", "girlfriend", "relationship"],
    ),
    (
        Topic::Career,
        &["work", "job", "career", "office", "boss", "colleague"],
    ),
    (
        Topic::Hobbies,
        &["hobby", "enjoy", "love doing", "free time", "passion"],
    ),
    (
        Topic::Emotions,
        &["happy", "sad", "angry", "excited", "worried", "afraid"],
    ),
    (
        Topic::Philosophy,
        &["meaning", "purpose", "life", "existence", "philosophy"],
    ),
    (
        Topic::Entertainment,
        &["movie", "music", "game", "book", "show", "funny"],
    ),
    (
        Topic::Advice,
        &["help", "advice", "should i", "what do you think"],
    ),
    (
        Topic::Flirting,
        &["beautiful", "gorgeous", "cute", "attractive", "kiss"],
    ),
    (
        Topic::DeepTalk,
        &["deep", "meaningful", "important", "serious", "personal"],
    ),
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "love", "amazing", "wonderful", "excited",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "angry", "hate", "terrible", "awful", "worried",
];

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"my name is (\w+)|i'm (\w+)|call me (\w+)").unwrap())
}

fn job_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"i work as (?:an? )?(\w+)|my job is (?:an? )?(\w+)|i'm an? (\w+)|work at (\w+)")
            .unwrap()
    })
}

fn age_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"i am (\d+)|i'm (\d+)|(\d+) years old").unwrap())
}

fn hobby_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:love|enjoy|hobby|interest|passion) (\w+)").unwrap())
}

/// Result of classifying one user message
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Importance score in [1, 10]
    pub importance: u8,
    /// True iff importance >= 5
    pub is_important: bool,
    /// True iff a personal-info keyword matched
    pub contains_personal_info: bool,
    pub topics: Vec<Topic>,
    pub sentiment: Sentiment,
    /// Deduplicated `kind:value` tags for memory retrieval
    pub memory_tags: Vec<String>,
}

/// Classifies a user message
///
/// Importance is additive: +3 personal info, +2 emotional content,
/// +2 goals, +1 for texts over 100 characters, +5 for the first message
/// of a conversation, clamped to [1, 10].
pub fn analyze(text: &str, is_first_message: bool) -> Analysis {
    let lowered = text.to_lowercase();

    let contains_personal_info = contains_any(&lowered, PERSONAL_KEYWORDS);

    let mut score: u32 = 1;
    if contains_personal_info {
        score += 3;
    }
    if contains_any(&lowered, EMOTIONAL_KEYWORDS) {
        score += 2;
    }
    if contains_any(&lowered, GOAL_KEYWORDS) {
        score += 2;
    }
    if text.chars().count() > 100 {
        score += 1;
    }
    if is_first_message {
        score += 5;
    }

    let importance = score.clamp(1, 10) as u8;

    Analysis {
        importance,
        is_important: importance >= 5,
        contains_personal_info,
        topics: detect_topics(&lowered),
        sentiment: detect_sentiment(&lowered),
        memory_tags: extract_memory_tags(&lowered),
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Independent membership test per topic; no precedence between topics
fn detect_topics(lowered: &str) -> Vec<Topic> {
    TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(lowered, keywords))
        .map(|(topic, _)| *topic)
        .collect()
}

/// Majority vote over the fixed word lists; ties are neutral
fn detect_sentiment(lowered: &str) -> Sentiment {
    let positive = POSITIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Extracts `kind:value` memory tags from the lowercased text
///
/// Ages outside 18..=100 are discarded. Tags are deduplicated while
/// preserving first-seen order.
fn extract_memory_tags(lowered: &str) -> Vec<String> {
    let mut tags = Vec::new();

    for caps in name_pattern().captures_iter(lowered) {
        if let Some(name) = first_group(&caps) {
            tags.push(format!("name:{}", name));
        }
    }

    for caps in job_pattern().captures_iter(lowered) {
        if let Some(job) = first_group(&caps) {
            tags.push(format!("job:{}", job));
        }
    }

    for caps in age_pattern().captures_iter(lowered) {
        if let Some(age_text) = first_group(&caps) {
            if let Ok(age) = age_text.parse::<u32>() {
                if (18..=100).contains(&age) {
                    tags.push(format!("age:{}", age));
                }
            }
        }
    }

    for caps in hobby_pattern().captures_iter(lowered) {
        if let Some(hobby) = first_group(&caps) {
            tags.push(format!("hobby:{}", hobby));
        }
    }

    dedup_preserving_order(tags)
}

fn first_group<'t>(caps: &regex::Captures<'t>) -> Option<&'t str> {
    caps.iter().skip(1).flatten().map(|m| m.as_str()).next()
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
