//! Process-wide catalogue of tool call formats.
//!
//! Names map to constructors so every lookup hands out a fresh parser
//! instance. The table is populated once at startup by an explicit
//! [`install_default_formats`] call — never by import-order side effects —
//! and is only read afterwards; late registrations serialize against
//! lookups through the same lock.

use std::sync::{LazyLock, Once};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::ExtractError;
use crate::formats::deepseek::{DeepSeekV31Parser, DeepSeekV3Parser};
use crate::formats::glm::GlmParser;
use crate::formats::kimi::KimiK2Parser;
use crate::formats::llama::LlamaJsonParser;
use crate::formats::mistral::MistralParser;
use crate::formats::qwen_coder::QwenCoderParser;
use crate::formats::tag_json::TagJsonParser;
use crate::formats::ToolCallParser;

/// Constructor for a registered format.
pub type ParserCtor = fn() -> Box<dyn ToolCallParser>;

static TABLE: LazyLock<RwLock<FxHashMap<String, ParserCtor>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Register `ctor` under `name`, overwriting any existing mapping.
///
/// Overwriting is intentional (format aliases reuse it), but it is loud so
/// an accidental shadow shows up in the logs.
pub fn register(name: &str, ctor: ParserCtor) {
    if TABLE.write().insert(name.to_string(), ctor).is_some() {
        tracing::warn!(format = name, "overwriting registered tool call format");
    }
}

/// Instantiate the parser registered under `name`.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownFormat`] enumerating the known names when
/// `name` was never registered — a caller configuration mistake, never
/// swallowed.
pub fn get(name: &str) -> Result<Box<dyn ToolCallParser>, ExtractError> {
    let ctor = TABLE.read().get(name).copied();
    match ctor {
        Some(ctor) => Ok(ctor()),
        None => Err(ExtractError::UnknownFormat {
            requested: name.to_string(),
            known: list(),
        }),
    }
}

/// All registered format names, sorted.
#[must_use]
pub fn list() -> Vec<String> {
    let mut names: Vec<String> = TABLE.read().keys().cloned().collect();
    names.sort_unstable();
    names
}

/// Register every built-in format family. Idempotent; call once at startup
/// before the first [`get`].
///
/// Aliases map distinct model releases onto one grammar: `qwen` shares the
/// Hermes tag pair, `deepseek_v31` is a spelling variant, and the two
/// Llama generations emit the same embedded-JSON shape.
pub fn install_default_formats() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        register("hermes", || Box::new(TagJsonParser::hermes()));
        register("qwen", || Box::new(TagJsonParser::hermes()));
        register("longcat", || Box::new(TagJsonParser::longcat()));
        register("deepseek_v3", || Box::new(DeepSeekV3Parser::new()));
        register("deepseek_v3_1", || Box::new(DeepSeekV31Parser::new()));
        register("deepseek_v31", || Box::new(DeepSeekV31Parser::new()));
        register("kimi_k2", || Box::new(KimiK2Parser::new()));
        register("llama3_json", || Box::new(LlamaJsonParser::new()));
        register("llama4_json", || Box::new(LlamaJsonParser::new()));
        register("mistral", || Box::new(MistralParser::new()));
        register("glm45", || Box::new(GlmParser::v45()));
        register("glm47", || Box::new(GlmParser::v47()));
        register("qwen3_coder", || Box::new(QwenCoderParser::new()));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_enumerates_sorted_names() {
        install_default_formats();
        let err = get("does_not_exist").expect_err("unknown format");
        let message = err.to_string();
        assert!(message.contains("does_not_exist"));
        // Every default name appears, in sorted order.
        let names = list();
        assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));
        for name in &names {
            assert!(message.contains(name.as_str()), "missing {name}");
        }
    }

    #[test]
    fn default_formats_resolve() {
        install_default_formats();
        for name in [
            "hermes",
            "qwen",
            "longcat",
            "deepseek_v3",
            "deepseek_v3_1",
            "deepseek_v31",
            "kimi_k2",
            "llama3_json",
            "llama4_json",
            "mistral",
            "glm45",
            "glm47",
            "qwen3_coder",
        ] {
            assert!(get(name).is_ok(), "format {name} should resolve");
        }
    }

    #[test]
    fn install_is_idempotent() {
        install_default_formats();
        let before = list().len();
        install_default_formats();
        assert_eq!(list().len(), before);
    }
}
