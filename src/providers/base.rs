//! Base provider trait and common types
//!
//! This module defines the Provider trait that generative backends must
//! implement, along with the request and response structures shared by
//! the resolver and the provider implementations.

use crate::error::Result;
use crate::personas::SamplingParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One turn of a conversation sent to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Role of the sender (user, assistant, system)
    pub role: String,
    /// Content of the turn
    pub content: String,
}

impl ChatTurn {
    /// Creates a user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use lovechat::providers::ChatTurn;
    ///
    /// let turn = ChatTurn::user("Hello!");
    /// assert_eq!(turn.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// A completion request: prompt turns plus sampling parameters
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt, prior turns, and the current user text, in order
    pub messages: Vec<ChatTurn>,
    /// Model to use for this call
    pub model: String,
    /// Persona-specific sampling parameters
    pub sampling: SamplingParams,
}

/// A successful completion
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated response text
    pub text: String,
    /// Model that produced the text
    pub model: String,
    /// Total tokens consumed, when reported by the backend
    pub tokens_used: u32,
}

/// Provider trait for generative backends
///
/// # Examples
///
/// ```no_run
/// use lovechat::providers::{Provider, ChatTurn, Completion, CompletionRequest};
/// use lovechat::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
///         Ok(Completion {
///             text: "Response".to_string(),
///             model: request.model.clone(),
///             tokens_used: 0,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails or the response is invalid.
    /// Transport failures and API-status failures surface as distinct
    /// error variants so callers can tell them apart.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;
}
