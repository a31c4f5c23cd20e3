//! The GitTeach pipeline core.
//!
//! One agent turn flows through four strictly sequential stages:
//!
//! 1. **Route** — classify the utterance into a tool id or the chat fallback
//! 2. **Construct** — extract a validated parameter set for the routed tool
//! 3. **Execute** — delegate the side effect to the external executor
//! 4. **Respond** — turn the execution result into a natural-language reply
//!
//! Chat turns terminate after routing. Every generative call goes through
//! the strict JSON parser ([`parse_json_object`]) and every call site
//! declares its tolerance policy explicitly: routing fails closed to chat,
//! construction fails fast, responding degrades to a templated message.

pub mod constructor;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod responder;
pub mod router;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use constructor::ParameterConstructor;
pub use orchestrator::Orchestrator;
pub use parser::parse_json_object;
pub use responder::Responder;
pub use router::IntentRouter;
