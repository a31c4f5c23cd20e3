//! Tool executor implementations for GitTeach.
//!
//! Executors perform the side effect behind a validated parameter set and
//! report back a result summary. The pipeline only knows the
//! `gitteach_core::ToolExecutor` contract; everything here is replaceable.

pub mod github;

pub use github::GithubToolbox;
