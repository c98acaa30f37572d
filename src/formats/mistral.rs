//! Mistral `[TOOL_CALLS]` tool calls, both tokenizer generations.
//!
//! The separator token appears 1..N times. Which grammar follows it is
//! decided per call, by looking at the first segment after the first
//! separator:
//!
//! - legacy (pre-v11 tokenizers): a full JSON array of call objects (or a
//!   single object) right after the separator;
//! - current (v11+): every separator introduces one `name{json…}` pair.
//!
//! The legacy branch keeps a permissive brace scan as a fallback when the
//! strict decode fails — generation noise around an otherwise fine call
//! list is common enough to be worth salvaging.

use memchr::memchr;
use serde::Deserialize;
use serde_json::value::RawValue;

use super::ToolCallParser;
use crate::ident;
use crate::json_scan;
use crate::record::{CallKind, ParseOutcome, ToolCallRecord};

const BOT_TOKEN: &str = "[TOOL_CALLS]";

/// One legacy call object. The argument span stays byte-verbatim.
#[derive(Deserialize)]
struct MistralCallWire<'a> {
    name: String,
    #[serde(borrow)]
    arguments: Option<&'a RawValue>,
}

#[derive(Debug)]
pub struct MistralParser;

impl MistralParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse_current(segments: &[&str]) -> Vec<ToolCallRecord> {
        let mut calls = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            let Some(brace) = segment.find('{') else {
                continue;
            };
            let name = segment[..brace].trim();
            if name.is_empty() {
                tracing::debug!("skipping separator segment without a function name");
                continue;
            }
            calls.push(ToolCallRecord {
                id: ident::vendor_alnum_id(9),
                kind: CallKind::Function,
                name: name.to_string(),
                arguments: segment[brace..].to_string(),
            });
        }
        calls
    }

    fn parse_legacy(first_raw: &str) -> Vec<ToolCallRecord> {
        let spans: Option<Vec<&RawValue>> = if first_raw.starts_with('[') {
            serde_json::from_str(first_raw).ok()
        } else {
            serde_json::from_str::<&RawValue>(first_raw)
                .ok()
                .map(|span| vec![span])
        };
        let Some(spans) = spans else {
            tracing::debug!("strict decode of legacy tool call list failed; scanning for objects");
            return Self::scan_permissive(first_raw);
        };

        spans
            .into_iter()
            .filter_map(|span| legacy_record(span.get()))
            .collect()
    }

    /// Salvage pass for the legacy branch: decode every balanced JSON
    /// object in the segment and keep the ones shaped like a call.
    fn scan_permissive(segment: &str) -> Vec<ToolCallRecord> {
        let bytes = segment.as_bytes();
        let mut calls = Vec::new();
        let mut search = 0usize;
        while let Some(rel) = memchr(b'{', &bytes[search..]) {
            let start = search + rel;
            match json_scan::json_object_end(bytes, start) {
                Some(end) => {
                    if let Some(record) = legacy_record(&segment[start..end]) {
                        calls.push(record);
                    }
                    search = end;
                }
                None => search = start + 1,
            }
        }
        calls
    }
}

impl Default for MistralParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallParser for MistralParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(first) = text.find(BOT_TOKEN) else {
            return ParseOutcome::passthrough(text);
        };

        let mut segments = text.split(BOT_TOKEN);
        let _leading = segments.next();
        let raw_segments: Vec<&str> = segments.collect();
        let first_raw = raw_segments.first().map_or("", |s| s.trim());

        let calls = if first_raw.starts_with('[') || first_raw.starts_with('{') {
            Self::parse_legacy(first_raw)
        } else {
            Self::parse_current(&raw_segments)
        };

        if calls.is_empty() {
            return ParseOutcome::passthrough(text);
        }
        ParseOutcome::extracted(text, first, calls)
    }
}

fn legacy_record(span: &str) -> Option<ToolCallRecord> {
    let wire: MistralCallWire = serde_json::from_str(span).ok()?;
    let name = wire.name.trim();
    if name.is_empty() {
        return None;
    }
    let arguments = match wire.arguments {
        None => "{}".to_string(),
        Some(raw) => {
            let raw = raw.get();
            if raw.starts_with('"') {
                // String payloads pass through as their decoded content.
                serde_json::from_str::<String>(raw).ok()?
            } else {
                raw.to_string()
            }
        }
    };
    Some(ToolCallRecord {
        id: ident::vendor_alnum_id(9),
        kind: CallKind::Function,
        name: name.to_string(),
        arguments,
    })
}

#[cfg(test)]
#[path = "mistral_tests.rs"]
mod tests;
