//! # askdb-llm
//!
//! SQL generation for askdb: the [`generator::SqlGenerator`] trait and its
//! `DashScope` implementation, the conversational [`prompt`] builder, and
//! the per-session [`context::ConversationStore`].
//!
//! The crate produces untrusted SQL text. Callers strip code fences
//! ([`askdb_core::text::strip_code_fences`]) and pass the result through
//! the statement gate; generation failures are typed errors, never error
//! strings disguised as SQL.

#![deny(unsafe_code)]

pub mod context;
pub mod dashscope;
pub mod generator;
pub mod prompt;

pub use context::{ConversationStore, MAX_HISTORY_PAIRS, SessionHistory};
pub use dashscope::{DashScopeConfig, DashScopeGenerator};
pub use generator::{GeneratorError, GeneratorResult, SqlGenerator};
pub use prompt::{MAX_HISTORY_IN_PROMPT, build_prompt};
