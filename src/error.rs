/// Canonical error type for the extraction engine.
///
/// Text-shaped conditions never surface here: malformed or truncated markup
/// degrades to a [`ParseOutcome`](crate::record::ParseOutcome) carrying the
/// original text. The only hard error is a caller configuration mistake —
/// asking for a format that was never registered.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("tool call format '{requested}' is not registered; known formats: [{}]", .known.join(", "))]
    UnknownFormat {
        requested: String,
        /// Registered names at lookup time, sorted for stable diagnostics.
        known: Vec<String>,
    },
}
