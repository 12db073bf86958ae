//! # `tokenizer_config.json` Support
//!
//! Reads the structural token names and `model_max_length` from a
//! `HuggingFace`-style `tokenizer_config.json`, when one is present.

use std::path::Path;

use serde_json::Value;

use crate::{PVResult, errors::PtrVocabError, vocab::StructuralTokenNames};

/// File name of the `HuggingFace` tokenizer config.
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

/// Values recovered from a `tokenizer_config.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizerConfig {
    /// The model's maximum input length.
    pub model_max_length: Option<usize>,

    /// Structural token names, with unset fields left at the defaults.
    pub structural: StructuralTokenNames,
}

/// Token entries are either a bare string, or an object with a `content` field.
fn token_content(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("content")?.as_str().map(str::to_string),
        _ => None,
    }
}

impl TokenizerConfig {
    /// Parse a `tokenizer_config.json` document.
    pub fn from_json_str(json: &str) -> PVResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| PtrVocabError::Data(format!("malformed tokenizer config: {e}")))?;

        let mut structural = StructuralTokenNames::default();
        if let Some(begin) = token_content(value.get("bos_token")) {
            structural.begin = begin;
        }
        if let Some(end) = token_content(value.get("eos_token")) {
            structural.end = end;
        }
        if let Some(pad) = token_content(value.get("pad_token")) {
            structural.pad = pad;
        }
        if let Some(unknown) = token_content(value.get("unk_token")) {
            structural.unknown = unknown;
        }

        // Unbounded models store a huge float sentinel here.
        let model_max_length = value
            .get("model_max_length")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());

        Ok(Self {
            model_max_length,
            structural,
        })
    }

    /// Load the config from a directory, if the file exists.
    pub fn load_dir(dir: impl AsRef<Path>) -> PVResult<Option<Self>> {
        let path = dir.as_ref().join(TOKENIZER_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        Self::from_json_str(&json).map(Some)
    }
}
