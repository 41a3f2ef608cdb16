//! Response resolution
//!
//! Terminal three-step state machine per message: a canned quick-phrase
//! match, a response-cache lookup, and finally a generative call. A
//! provider failure degrades to the persona's static error phrase and
//! never fails the request.

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::models::{Message, ResponseSource};
use crate::personas::{self, PersonaId};
use crate::providers::{ChatTurn, CompletionRequest, Provider};
use metrics::increment_counter;
use rand::seq::IndexedRandom;
use std::sync::Arc;

/// Greeting keywords that trigger a canned greeting response
const GREETING_KEYWORDS: &[&str] = &["hi", "hello", "hey", "good morning", "good evening"];

/// Matches multi-word keywords as substrings and single words on word
/// boundaries, so "something" does not count as a greeting
fn contains_keyword(normalized: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        normalized.contains(keyword)
    } else {
        normalized
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    }
}

/// Keywords that route a message to the more capable model
const COMPLEX_KEYWORDS: &[&str] = &[
    "explain", "analyze", "complex", "detail", "philosophy", "meaning",
];

/// Outcome of resolving one message
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    pub text: String,
    pub source: ResponseSource,
    /// Model used, set only for generated responses
    pub model_used: Option<String>,
    pub tokens_used: u32,
}

/// Resolves responses via quick phrases, the cache, or a generative call
pub struct Resolver {
    provider: Arc<dyn Provider>,
    cache: Arc<dyn ResponseCache>,
    model: String,
    capable_model: String,
    quick_phrases_enabled: bool,
}

impl Resolver {
    pub fn new(
        provider: Arc<dyn Provider>,
        cache: Arc<dyn ResponseCache>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            cache,
            model: config.provider.openai.model.clone(),
            capable_model: config.provider.openai.capable_model.clone(),
            quick_phrases_enabled: config.chat.quick_phrases,
        }
    }

    /// Normalizes text for quick-phrase matching and cache keys
    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    fn cache_key(persona: PersonaId, normalized: &str) -> String {
        format!("{}:{}", persona, normalized)
    }

    /// Picks the model for a message
    ///
    /// A coarse complexity heuristic routes messages to the capable
    /// model; everything else uses the cheap one. This is the cost
    /// control extension point: swap the heuristic, keep the seam.
    pub fn select_model(&self, normalized: &str) -> &str {
        if COMPLEX_KEYWORDS.iter().any(|k| normalized.contains(k)) {
            &self.capable_model
        } else {
            &self.model
        }
    }

    /// Returns a canned response when the text matches the quick-phrase
    /// table: greeting words, "how are you", or "thank you"
    pub fn quick_phrase(&self, persona_id: PersonaId, normalized: &str) -> Option<String> {
        if !self.quick_phrases_enabled {
            return None;
        }

        let persona = personas::get(persona_id);

        if GREETING_KEYWORDS
            .iter()
            .any(|k| contains_keyword(normalized, k))
        {
            return persona
                .greetings
                .choose(&mut rand::rng())
                .map(|s| s.to_string());
        }

        if normalized.contains("how are you") {
            return Some(persona.how_are_you.to_string());
        }

        if normalized.contains("thank you") {
            return Some(persona.thank_you.to_string());
        }

        None
    }

    /// Resolves a response for `text` on behalf of `persona_id`
    ///
    /// `history` supplies the prior turns included in the prompt;
    /// `user_context` is an optional line appended to the system prompt.
    pub async fn resolve(
        &self,
        persona_id: PersonaId,
        text: &str,
        history: &[Message],
        user_context: Option<&str>,
    ) -> ResolvedResponse {
        let normalized = Self::normalize(text);

        // 1. Quick phrase: zero cost, no external call
        if let Some(phrase) = self.quick_phrase(persona_id, &normalized) {
            increment_counter!("lovechat_quick_phrase_hits_total");
            return ResolvedResponse {
                text: phrase,
                source: ResponseSource::QuickPhrase,
                model_used: None,
                tokens_used: 0,
            };
        }

        // 2. Cache lookup
        let key = Self::cache_key(persona_id, &normalized);
        if let Some(cached) = self.cache.get(&key) {
            increment_counter!("lovechat_cache_hits_total");
            return ResolvedResponse {
                text: cached,
                source: ResponseSource::Cache,
                model_used: None,
                tokens_used: 0,
            };
        }

        // 3. Generative call, degrading to the persona's error phrase
        let persona = personas::get(persona_id);
        let request = CompletionRequest {
            messages: self.build_prompt(persona_id, text, history, user_context),
            model: self.select_model(&normalized).to_string(),
            sampling: persona.sampling,
        };

        increment_counter!("lovechat_generative_calls_total");
        match self.provider.complete(&request).await {
            Ok(completion) => {
                self.cache.put(&key, &completion.text);
                ResolvedResponse {
                    text: completion.text,
                    source: ResponseSource::Generated,
                    model_used: Some(completion.model),
                    tokens_used: completion.tokens_used,
                }
            }
            Err(e) => {
                increment_counter!("lovechat_provider_failures_total");
                tracing::warn!("Generative call failed, using fallback phrase: {}", e);
                ResolvedResponse {
                    text: persona.error_phrase.to_string(),
                    source: ResponseSource::Fallback,
                    model_used: None,
                    tokens_used: 0,
                }
            }
        }
    }

    /// Builds the prompt: system prompt (+ amplifier, + user context),
    /// prior turns, then the current user text
    fn build_prompt(
        &self,
        persona_id: PersonaId,
        text: &str,
        history: &[Message],
        user_context: Option<&str>,
    ) -> Vec<ChatTurn> {
        let persona = personas::get(persona_id);

        let mut system = persona.system_prompt.to_string();
        if let Some(amplifier) = persona.behavior_amplifier {
            system.push_str("\n\n");
            system.push_str(amplifier);
        }
        if let Some(context) = user_context {
            system.push_str("\n\nUser context: ");
            system.push_str(context);
        }

        let mut messages = vec![ChatTurn::system(system)];
        for prior in history {
            messages.push(ChatTurn::user(&prior.user_text));
            messages.push(ChatTurn::assistant(&prior.response_text));
        }
        messages.push(ChatTurn::user(text));

        messages
    }
}
