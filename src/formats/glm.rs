//! GLM arg_key/arg_value tool calls.
//!
//! GLM 4.5 writes the function name as the first line of a `<tool_call>`
//! block, followed by `<arg_key>`/`<arg_value>` pairs. GLM 4.7 keeps the
//! wrapper, the coercion and the id policy and changes exactly two
//! boundary rules: the name need not end in a newline (the first
//! `<arg_key>` — or `</tool_call>` itself — may sit directly against it),
//! and the pair separator accepts an escaped `\n` two-character sequence
//! as well as real whitespace. Both variants are one type carrying the two
//! injected rules.

use regex_lite::Regex;

use super::{compile_rule, ToolCallParser};
use crate::coerce::coerce_value;
use crate::ident;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

const START_TOKEN: &str = "<tool_call>";

#[derive(Debug)]
struct GlmRules {
    /// Closed `<tool_call>…</tool_call>` spans.
    blocks: Regex,
    /// Splits one block into function name and argument region.
    detail: Regex,
    /// One `<arg_key>`/`<arg_value>` pair inside the argument region.
    pair: Regex,
}

#[derive(Debug)]
pub struct GlmParser {
    rules: Option<GlmRules>,
}

impl GlmParser {
    #[must_use]
    pub fn v45() -> Self {
        Self {
            rules: Self::compile(
                r"(?s)<tool_call>([^\n]*)\n(.*)</tool_call>",
                r"(?s)<arg_key>(.*?)</arg_key>\s*<arg_value>(.*?)</arg_value>",
            ),
        }
    }

    #[must_use]
    pub fn v47() -> Self {
        Self {
            rules: Self::compile(
                r"(?s)<tool_call>(.*?)(<arg_key>.*?)?</tool_call>",
                r"(?s)<arg_key>(.*?)</arg_key>(?:\\n|\s)*<arg_value>(.*?)</arg_value>",
            ),
        }
    }

    fn compile(detail: &str, pair: &str) -> Option<GlmRules> {
        Some(GlmRules {
            blocks: compile_rule(r"(?s)<tool_call>.*?</tool_call>")?,
            detail: compile_rule(detail)?,
            pair: compile_rule(pair)?,
        })
    }
}

impl ToolCallParser for GlmParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = text.find(START_TOKEN) else {
            return ParseOutcome::passthrough(text);
        };
        let Some(rules) = &self.rules else {
            return ParseOutcome::passthrough(text);
        };

        let mut calls = Vec::new();
        for block in rules.blocks.find_iter(text) {
            let Some(detail) = rules.detail.captures(block.as_str()) else {
                tracing::debug!("skipping tool call block without a name boundary");
                continue;
            };
            let name = detail.get(1).map_or("", |m| m.as_str()).trim();
            if name.is_empty() {
                continue;
            }
            let pair_region = detail.get(2).map_or("", |m| m.as_str());

            let mut arguments = serde_json::Map::new();
            for pair in rules.pair.captures_iter(pair_region) {
                let key = pair.get(1).map_or("", |m| m.as_str()).trim();
                let value = coerce_value(pair.get(2).map_or("", |m| m.as_str()));
                arguments.insert(key.to_string(), value);
            }

            let Ok(arguments) = serde_json::to_string(&arguments) else {
                continue;
            };
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
