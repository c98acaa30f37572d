//! Kimi K2 section-indexed tool calls.
//!
//! A section token gates the message; inside it every call is
//! `<|tool_call_begin|>{id}<|tool_call_argument_begin|>{args}<|tool_call_end|>`
//! where `{id}` is a vendor composite like `functions.get_weather:0`. The
//! id is preserved verbatim as the record id — callers rely on the index
//! staying stable across one response — and the function name is the id
//! segment after the last `.` and before the first `:`.

use memchr::memmem;

use super::ToolCallParser;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

// Both spellings occur in the wild.
const SECTION_TOKENS: [&str; 2] = [
    "<|tool_calls_section_begin|>",
    "<|tool_call_section_begin|>",
];
const CALL_BEGIN: &str = "<|tool_call_begin|>";
const ARG_BEGIN: &str = "<|tool_call_argument_begin|>";
const CALL_END: &str = "<|tool_call_end|>";

#[derive(Debug)]
pub struct KimiK2Parser;

impl KimiK2Parser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for KimiK2Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for KimiK2Parser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = SECTION_TOKENS
            .iter()
            .filter_map(|token| text.find(token))
            .min()
        else {
            return ParseOutcome::passthrough(text);
        };

        let bytes = text.as_bytes();
        let mut calls = Vec::new();
        let mut cursor = 0usize;
        while let Some(rel) = memmem::find(&bytes[cursor..], CALL_BEGIN.as_bytes()) {
            let id_start = cursor + rel + CALL_BEGIN.len();
            let Some(arg_rel) = memmem::find(&bytes[id_start..], ARG_BEGIN.as_bytes()) else {
                break;
            };
            let id_end = id_start + arg_rel;
            // An id span never swallows a sibling begin token; restart at
            // the inner one when it would.
            if let Some(nested) = memmem::find(&bytes[id_start..id_end], CALL_BEGIN.as_bytes()) {
                cursor = id_start + nested;
                continue;
            }

            let args_start = id_end + ARG_BEGIN.len();
            let Some(end_rel) = memmem::find(&bytes[args_start..], CALL_END.as_bytes()) else {
                break;
            };
            let args_end = args_start + end_rel;
            if let Some(nested) = memmem::find(&bytes[args_start..args_end], CALL_BEGIN.as_bytes())
            {
                cursor = args_start + nested;
                continue;
            }

            let call_id = text[id_start..id_end].trim();
            match function_name_from_id(call_id) {
                Some(name) => calls.push(ToolCallRecord {
                    id: call_id.to_string(),
                    kind: CallKind::Function,
                    name: name.to_string(),
                    arguments: text[args_start..args_end].trim().to_string(),
                }),
                None => {
                    tracing::debug!("skipping tool call block with malformed call id");
                }
            }
            cursor = args_end + CALL_END.len();
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        ParseOutcome::extracted(text, first, calls)
    }
}

/// Validate the `qualifier.name:index` id shape and pull the function name
/// out of it: before the first `:`, after the last `.`, with a numeric
/// index after the last `:`.
fn function_name_from_id(id: &str) -> Option<&str> {
    if id.is_empty() || id.contains('<') {
        return None;
    }
    let (_, index) = id.rsplit_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let head = id.split(':').next()?;
    let name = head.rsplit('.').next()?;
    (!name.is_empty()).then_some(name)
}
