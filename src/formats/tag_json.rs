//! Tag-wrapped JSON tool calls: `<tool_call>{…}</tool_call>`.
//!
//! Hermes and Qwen 2.5 share the `<tool_call>` spelling; Longcat Flash
//! wraps the same payload in `<longcat_tool_call>`. The grammar is
//! otherwise identical, so one engine is parameterized by the tag pair
//! instead of repeating the algorithm per family.

use regex_lite::Regex;
use serde::Deserialize;
use serde_json::value::RawValue;

use super::{compile_rule, ToolCallParser};
use crate::ident;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

/// Payload inside one tag pair. `arguments` stays a raw span so the
/// canonical argument text keeps the source bytes.
#[derive(Deserialize)]
struct TagCallWire<'a> {
    name: String,
    #[serde(borrow)]
    arguments: Option<&'a RawValue>,
}

#[derive(Debug)]
pub struct TagJsonParser {
    start_tag: &'static str,
    blocks: Option<Regex>,
}

impl TagJsonParser {
    fn new(start_tag: &'static str, end_tag: &'static str) -> Self {
        // Closed pair first; an unclosed start tag is only accepted where
        // it runs to end of text (generation-length truncation).
        let blocks = compile_rule(&format!(
            "(?s){start_tag}\\s*(.*?)\\s*{end_tag}|{start_tag}\\s*(.*)"
        ));
        Self { start_tag, blocks }
    }

    #[must_use]
    pub fn hermes() -> Self {
        Self::new("<tool_call>", "</tool_call>")
    }

    #[must_use]
    pub fn longcat() -> Self {
        Self::new("<longcat_tool_call>", "</longcat_tool_call>")
    }
}

impl ToolCallParser for TagJsonParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = text.find(self.start_tag) else {
            return ParseOutcome::passthrough(text);
        };
        let Some(blocks) = &self.blocks else {
            return ParseOutcome::passthrough(text);
        };

        let mut calls = Vec::new();
        for caps in blocks.captures_iter(text) {
            let raw = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            if raw.trim().is_empty() {
                continue;
            }
            let Ok(wire) = serde_json::from_str::<TagCallWire>(raw) else {
                tracing::debug!(tag = self.start_tag, "skipping undecodable tool call block");
                continue;
            };
            let name = wire.name.trim();
            if name.is_empty() {
                continue;
            }
            let arguments = wire
                .arguments
                .map_or_else(|| "{}".to_string(), |span| span.get().to_string());
            calls.push(ToolCallRecord {
                id: ident::random_call_id(8),
                kind: CallKind::Function,
                name: name.to_string(),
                arguments,
            });
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        ParseOutcome::extracted(text, first, calls)
    }
}
