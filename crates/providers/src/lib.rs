//! Completion backend clients for GitTeach.
//!
//! All clients implement the `gitteach_core::CompletionClient` trait.
//! The pipeline calls `complete()` without knowing which backend is behind
//! it; transport failures surface as `CompletionError` and retry policy
//! stays with the caller.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
