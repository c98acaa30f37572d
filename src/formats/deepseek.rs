//! DeepSeek unicode-delimited tool call blocks.
//!
//! Both generations gate the whole section behind `<｜tool▁calls▁begin｜>`.
//! V3 writes a type field and the function name before the separator and
//! fences the single-line argument text in a ```json block; V3.1 drops the
//! type and the fence and moves the arguments after the separator. Argument
//! text passes through stripped, not re-validated.

use regex_lite::Regex;

use super::{compile_rule, ToolCallParser};
use crate::ident;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

const CALLS_BEGIN: &str = "<｜tool▁calls▁begin｜>";
const CALL_BEGIN: &str = "<｜tool▁call▁begin｜>";
const SEP: &str = "<｜tool▁sep｜>";
const CALL_END: &str = "<｜tool▁call▁end｜>";

#[derive(Debug)]
pub struct DeepSeekV3Parser {
    blocks: Option<Regex>,
}

impl DeepSeekV3Parser {
    #[must_use]
    pub fn new() -> Self {
        // Dot stays line-bound: type and name sit on one line, the fenced
        // argument payload on the next.
        let blocks = compile_rule(&format!(
            "{CALL_BEGIN}(.*){SEP}(.*)\\n```json\\n(.*)\\n```{CALL_END}"
        ));
        Self { blocks }
    }
}

impl Default for DeepSeekV3Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for DeepSeekV3Parser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = text.find(CALLS_BEGIN) else {
            return ParseOutcome::passthrough(text);
        };
        let Some(blocks) = &self.blocks else {
            return ParseOutcome::passthrough(text);
        };

        let mut calls = Vec::new();
        for caps in blocks.captures_iter(text) {
            // Group 1 is the call type; the record kind is fixed, so only
            // name and arguments matter here.
            let name = caps.get(2).map_or("", |m| m.as_str()).trim();
            if name.is_empty() {
                tracing::debug!("skipping tool call block without a function name");
                continue;
            }
            let arguments = caps.get(3).map_or("", |m| m.as_str()).trim();
            calls.push(ToolCallRecord {
                id: ident::random_call_id(8),
                kind: CallKind::Function,
                name: name.to_string(),
                arguments: arguments.to_string(),
            });
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        ParseOutcome::extracted(text, first, calls)
    }
}

#[derive(Debug)]
pub struct DeepSeekV31Parser {
    blocks: Option<Regex>,
}

impl DeepSeekV31Parser {
    #[must_use]
    pub fn new() -> Self {
        let blocks = compile_rule(&format!("{CALL_BEGIN}(.*?){SEP}(.*?){CALL_END}"));
        Self { blocks }
    }
}

impl Default for DeepSeekV31Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for DeepSeekV31Parser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = text.find(CALLS_BEGIN) else {
            return ParseOutcome::passthrough(text);
        };
        let Some(blocks) = &self.blocks else {
            return ParseOutcome::passthrough(text);
        };

        let mut calls = Vec::new();
        for caps in blocks.captures_iter(text) {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim();
            if name.is_empty() {
                tracing::debug!("skipping tool call block without a function name");
                continue;
            }
            let arguments = caps.get(2).map_or("", |m| m.as_str()).trim();
            calls.push(ToolCallRecord {
                id: ident::random_call_id(8),
                kind: CallKind::Function,
                name: name.to_string(),
                arguments: arguments.to_string(),
            });
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        ParseOutcome::extracted(text, first, calls)
    }
}
