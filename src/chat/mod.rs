//! The message-processing pipeline
//!
//! This module wires the persona catalog, classifier, resolver, usage
//! gate, and conversation state into the single `process_message`
//! operation exposed by [`ChatService`].

pub mod quota;
pub mod resolver;
pub mod service;
pub mod state;

pub use resolver::{ResolvedResponse, Resolver};
pub use service::{ChatOutcome, ChatService, DeletionReport, UserAnalytics};
