//! Format adapters: one module per model-family grammar.
//!
//! Every family implements the same contract over a different textual
//! encoding. The shared behavior, identical across adapters:
//!
//! 1. cheap rejection — no start marker means the original text comes back
//!    untouched, byte for byte;
//! 2. best-effort extraction of delimited invocation blocks;
//! 3. per-block isolation — a malformed block is skipped, siblings survive;
//! 4. whole-call isolation — nothing text-shaped ever escapes `parse`;
//! 5. zero valid blocks degrades to the no-extraction outcome;
//! 6. content is the prose before the earliest marker, trimmed.

pub mod deepseek;
pub mod glm;
pub mod kimi;
pub mod llama;
pub mod mistral;
pub mod qwen_coder;
pub mod tag_json;

use crate::record::ParseOutcome;

/// Common contract implemented by every format adapter.
///
/// `parse` is infallible by type: any text-shaped problem degrades to the
/// original text with no tool calls. Implementations hold only matching
/// rules compiled at construction, so one instance may serve concurrent
/// calls without coordination.
pub trait ToolCallParser: std::fmt::Debug + Send + Sync {
    fn parse(&self, text: &str) -> ParseOutcome;
}

/// Compile a fixed pattern literal into a matching rule.
///
/// A rule that fails to compile disables its adapter (parse degrades to
/// passthrough) instead of panicking.
pub(crate) fn compile_rule(pattern: &str) -> Option<regex_lite::Regex> {
    match regex_lite::Regex::new(pattern) {
        Ok(rule) => Some(rule),
        Err(err) => {
            tracing::warn!(%err, pattern, "failed to compile matching rule");
            None
        }
    }
}
