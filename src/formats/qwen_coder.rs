//! Qwen3-Coder nested function/parameter tool calls.
//!
//! ```text
//! <tool_call>
//! <function=name>
//! <parameter=key>
//! value
//! </parameter>
//! </function>
//! </tool_call>
//! ```
//!
//! The function name lives in the opening delimiter itself. Both the outer
//! call tag and the function tag may be cut off by generation-length
//! truncation, independently; some generations omit the call wrapper
//! entirely, in which case the whole text is scanned for function blocks.
//! A parameter value runs to its close tag, the next parameter, the end of
//! the function, or end of text — whichever comes first.

use memchr::{memchr, memmem};

use super::ToolCallParser;
use crate::coerce::coerce_value;
use crate::ident;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

const CALL_OPEN: &str = "<tool_call>";
const CALL_CLOSE: &str = "</tool_call>";
const FUNCTION_OPEN: &str = "<function=";
const FUNCTION_CLOSE: &str = "</function>";
const PARAMETER_OPEN: &str = "<parameter=";
const PARAMETER_CLOSE: &str = "</parameter>";

#[derive(Debug)]
pub struct QwenCoderParser;

impl QwenCoderParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for QwenCoderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for QwenCoderParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        if !text.contains(FUNCTION_OPEN) {
            return ParseOutcome::passthrough(text);
        }

        let mut calls = Vec::new();
        for block in call_blocks(text) {
            for func in function_blocks(block) {
                if let Some(record) = parse_function_block(func) {
                    calls.push(record);
                } else {
                    tracing::debug!("skipping function block without a name delimiter");
                }
            }
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        let marker = text
            .find(CALL_OPEN)
            .or_else(|| text.find(FUNCTION_OPEN))
            .unwrap_or(0);
        ParseOutcome::extracted(text, marker, calls)
    }
}

/// Bounded spans between tag pairs, the last one running to end of text
/// when its close tag was truncated away.
fn bounded_spans<'a>(text: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut cursor = 0usize;
    while let Some(rel) = memmem::find(&bytes[cursor..], open.as_bytes()) {
        let body_start = cursor + rel + open.len();
        match memmem::find(&bytes[body_start..], close.as_bytes()) {
            Some(close_rel) => {
                spans.push(&text[body_start..body_start + close_rel]);
                cursor = body_start + close_rel + close.len();
            }
            None => {
                spans.push(&text[body_start..]);
                break;
            }
        }
    }
    spans
}

fn call_blocks(text: &str) -> Vec<&str> {
    let blocks = bounded_spans(text, CALL_OPEN, CALL_CLOSE);
    if blocks.is_empty() {
        // No wrapper at all: scan the whole text.
        return vec![text];
    }
    blocks
}

fn function_blocks(block: &str) -> Vec<&str> {
    bounded_spans(block, FUNCTION_OPEN, FUNCTION_CLOSE)
}

/// One `name>…parameters…` span (the text after `<function=`).
fn parse_function_block(func: &str) -> Option<ToolCallRecord> {
    let gt = memchr(b'>', func.as_bytes())?;
    let name = func[..gt].trim();
    if name.is_empty() {
        return None;
    }

    let region = &func[gt + 1..];
    let bytes = region.as_bytes();
    let mut arguments = serde_json::Map::new();
    let mut cursor = 0usize;
    while let Some(rel) = memmem::find(&bytes[cursor..], PARAMETER_OPEN.as_bytes()) {
        let body_start = cursor + rel + PARAMETER_OPEN.len();
        let close = memmem::find(&bytes[body_start..], PARAMETER_CLOSE.as_bytes());
        let next_open = memmem::find(&bytes[body_start..], PARAMETER_OPEN.as_bytes());
        let (body_end, consumed) = match (close, next_open) {
            (Some(c), Some(n)) if n < c => (body_start + n, 0),
            (Some(c), _) => (body_start + c, PARAMETER_CLOSE.len()),
            (None, Some(n)) => (body_start + n, 0),
            (None, None) => (bytes.len(), 0),
        };
        let body = &region[body_start..body_end];

        // The '>' closing the parameter delimiter must sit before the
        // terminator, else this is not a parameter at all.
        if let Some(name_end) = body.find('>') {
            let key = body[..name_end].trim().to_string();
            let mut value = &body[name_end + 1..];
            // One newline on each side belongs to the markup, not the value.
            value = value.strip_prefix('\n').unwrap_or(value);
            value = value.strip_suffix('\n').unwrap_or(value);
            arguments.insert(key, coerce_value(value));
        }
        cursor = body_end + consumed;
    }

    let arguments = serde_json::to_string(&arguments).ok()?;
    Some(ToolCallRecord {
        id: ident::random_call_id(24),
        kind: CallKind::Function,
        name: name.to_string(),
        arguments,
    })
}
