//! Llama JSON tool calls embedded in prose.
//!
//! No tag grammar: the model writes bare JSON objects with a `name` and an
//! `arguments` (or `parameters`) member, optionally after a
//! `<|python_tag|>` token, mixed freely with text. Every `{` that is not
//! inside an already-decoded object starts a bounded decode attempt; the
//! tag, when present, only decides where the content slice ends.

use memchr::memchr;
use rustc_hash::FxHashMap;
use serde_json::value::RawValue;

use super::ToolCallParser;
use crate::ident;
use crate::json_scan;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

const PYTHON_TAG: &str = "<|python_tag|>";

#[derive(Debug)]
pub struct LlamaJsonParser;

impl LlamaJsonParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LlamaJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for LlamaJsonParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        if !text.contains(PYTHON_TAG) && !text.contains('{') {
            return ParseOutcome::passthrough(text);
        }

        let bytes = text.as_bytes();
        let mut calls = Vec::new();
        let mut consumed_end = 0usize;
        let mut search = 0usize;
        while let Some(rel) = memchr(b'{', &bytes[search..]) {
            let start = search + rel;
            search = start + 1;
            // Braces inside a previously decoded object are spoken for.
            if start < consumed_end {
                continue;
            }
            let Some(end) = json_scan::json_object_end(bytes, start) else {
                continue;
            };
            consumed_end = end;
            if let Some(record) = decode_candidate(&text[start..end]) {
                calls.push(record);
            }
        }

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        let marker = text
            .find(PYTHON_TAG)
            .or_else(|| text.find('{'))
            .unwrap_or(0);
        ParseOutcome::extracted(text, marker, calls)
    }
}

fn decode_candidate(span: &str) -> Option<ToolCallRecord> {
    // A raw-valued map keeps every payload byte-verbatim and distinguishes
    // a key holding null from a missing key.
    let fields: FxHashMap<String, &RawValue> = serde_json::from_str(span).ok()?;
    let name: String = serde_json::from_str(fields.get("name")?.get()).ok()?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    // An `arguments` key that is present shadows `parameters`, even when
    // it holds null.
    let payload = fields
        .get("arguments")
        .or_else(|| fields.get("parameters"))?;
    let raw = payload.get().trim();
    if raw == "null" {
        return None;
    }
    let arguments = if raw.starts_with('"') {
        // String payloads pass through as their decoded content.
        serde_json::from_str::<String>(raw).ok()?
    } else {
        raw.to_string()
    };
    Some(ToolCallRecord {
        id: ident::random_call_id(8),
        kind: CallKind::Function,
        name: name.to_string(),
        arguments,
    })
}
