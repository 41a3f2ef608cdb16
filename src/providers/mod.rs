//! Generative provider abstraction and implementations
//!
//! The pipeline talks to the text-generation service through the
//! [`Provider`] trait; `OpenAiProvider` is the shipped implementation.

pub mod base;
pub mod openai;

pub use base::{ChatTurn, Completion, CompletionRequest, Provider};
pub use openai::OpenAiProvider;
