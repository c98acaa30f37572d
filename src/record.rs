use serde::{Deserialize, Serialize};

/// Invocation kind discriminant. Only function calls exist in this engine,
/// but the field is part of the wire contract consumers expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    #[default]
    #[serde(rename = "function")]
    Function,
}

/// One decoded tool call, normalized away from its source grammar.
///
/// `arguments` is always JSON text, never a parsed object. Formats whose
/// payload is already JSON keep the source bytes verbatim; formats that
/// assemble arguments from typed values re-serialize before returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Caller-opaque id. Never empty; the generation policy is
    /// format-specific (see `ident`) and callers may depend on its shape
    /// to route tool results back.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CallKind,
    /// Invoked function name, trimmed, never empty.
    pub name: String,
    /// JSON-encoded argument payload.
    pub arguments: String,
}

/// Result of one `parse` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Prose to show the user. For the no-extraction case this is the
    /// original input byte for byte; otherwise it is the text before the
    /// first invocation marker, trimmed, and `None` when that is empty.
    pub content: Option<String>,
    /// Extracted calls in left-to-right source order. `None` when no
    /// well-formed invocation was found — never `Some` of an empty list.
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

impl ParseOutcome {
    /// The no-extraction outcome: the caller gets its text back unchanged.
    #[must_use]
    pub fn passthrough(text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            tool_calls: None,
        }
    }

    /// Outcome for a successful extraction. `marker_offset` is the byte
    /// offset of the earliest recognized start marker; everything before it
    /// becomes content.
    pub(crate) fn extracted(
        text: &str,
        marker_offset: usize,
        calls: Vec<ToolCallRecord>,
    ) -> Self {
        debug_assert!(!calls.is_empty());
        let content = text[..marker_offset].trim();
        Self {
            content: (!content.is_empty()).then(|| content.to_string()),
            tool_calls: Some(calls),
        }
    }
}
