//! # Encode Options
//!
//! Per-call batch encoding options, forwarded unchanged to the
//! subword tokenizer's padding and truncation machinery.

use serde::{Deserialize, Serialize};
use tokenizers::{
    PaddingParams,
    PaddingStrategy,
    TruncationParams,
    TruncationStrategy,
};

use crate::{PVResult, errors::PtrVocabError, types::TokenId};

/// Padding policy for batch encoding.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Leave every row at its natural length.
    #[default]
    DoNotPad,

    /// Pad to the longest row in the batch.
    Longest,

    /// Pad every row to [`EncodeOptions::max_length`].
    MaxLength,
}

/// Truncation policy for batch encoding.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Never truncate.
    #[default]
    DoNotTruncate,

    /// Truncate token by token, from the longest sequence.
    LongestFirst,

    /// Truncate only the first sequence.
    OnlyFirst,
}

/// Options for a batch encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Maximum length, required by [`PaddingPolicy::MaxLength`]
    /// and by any truncation policy.
    pub max_length: Option<usize>,

    /// Padding policy.
    pub padding: PaddingPolicy,

    /// Truncation policy.
    pub truncation: TruncationPolicy,

    /// Wrap each row in the tokenizer's begin/end tokens.
    pub add_special_tokens: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_length: None,
            padding: PaddingPolicy::default(),
            truncation: TruncationPolicy::default(),
            add_special_tokens: true,
        }
    }
}

impl EncodeOptions {
    /// Set the maximum length.
    pub fn with_max_length(
        mut self,
        max_length: Option<usize>,
    ) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the padding policy.
    pub fn with_padding(
        mut self,
        padding: PaddingPolicy,
    ) -> Self {
        self.padding = padding;
        self
    }

    /// Set the truncation policy.
    pub fn with_truncation(
        mut self,
        truncation: TruncationPolicy,
    ) -> Self {
        self.truncation = truncation;
        self
    }

    /// Set whether begin/end tokens are added.
    pub fn with_add_special_tokens(
        mut self,
        add_special_tokens: bool,
    ) -> Self {
        self.add_special_tokens = add_special_tokens;
        self
    }

    /// Does this configuration need a reconfigured tokenizer?
    pub fn needs_post_processing(&self) -> bool {
        self.padding != PaddingPolicy::DoNotPad || self.truncation != TruncationPolicy::DoNotTruncate
    }

    fn require_max_length(
        &self,
        what: &str,
    ) -> PVResult<usize> {
        match self.max_length {
            Some(0) => Err(PtrVocabError::Configuration(format!(
                "{what} requires a positive max_length"
            ))),
            Some(len) => Ok(len),
            None => Err(PtrVocabError::Configuration(format!(
                "{what} requires max_length"
            ))),
        }
    }

    /// Build the tokenizer padding parameters.
    ///
    /// ## Arguments
    /// * `pad_id` - the id of the padding token.
    /// * `pad_token` - the padding token.
    pub fn padding_params(
        &self,
        pad_id: TokenId,
        pad_token: &str,
    ) -> PVResult<Option<PaddingParams>> {
        let strategy = match self.padding {
            PaddingPolicy::DoNotPad => return Ok(None),
            PaddingPolicy::Longest => PaddingStrategy::BatchLongest,
            PaddingPolicy::MaxLength => {
                PaddingStrategy::Fixed(self.require_max_length("max_length padding")?)
            }
        };

        Ok(Some(PaddingParams {
            strategy,
            pad_id,
            pad_token: pad_token.to_string(),
            ..Default::default()
        }))
    }

    /// Build the tokenizer truncation parameters.
    pub fn truncation_params(&self) -> PVResult<Option<TruncationParams>> {
        let strategy = match self.truncation {
            TruncationPolicy::DoNotTruncate => return Ok(None),
            TruncationPolicy::LongestFirst => TruncationStrategy::LongestFirst,
            TruncationPolicy::OnlyFirst => TruncationStrategy::OnlyFirst,
        };

        Ok(Some(TruncationParams {
            max_length: self.require_max_length("truncation")?,
            strategy,
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn test_defaults() {
        let options = EncodeOptions::default();
        assert!(options.add_special_tokens);
        assert!(!options.needs_post_processing());
        assert!(options.padding_params(1, "<pad>").unwrap().is_none());
        assert!(options.truncation_params().unwrap().is_none());
    }

    #[test]
    fn test_max_length_padding() {
        let options = EncodeOptions::default()
            .with_padding(PaddingPolicy::MaxLength)
            .with_max_length(Some(16));

        let params = options.padding_params(1, "<pad>").unwrap().unwrap();
        assert!(matches!(params.strategy, PaddingStrategy::Fixed(16)));
        assert_eq!(params.pad_id, 1);
        assert_eq!(params.pad_token, "<pad>");
    }

    #[test]
    fn test_missing_max_length() {
        let options = EncodeOptions::default().with_truncation(TruncationPolicy::LongestFirst);
        assert!(matches!(
            options.truncation_params(),
            Err(PtrVocabError::Configuration(_))
        ));

        let options = options.with_max_length(Some(0));
        assert!(options.truncation_params().is_err());

        let options = options.with_max_length(Some(8));
        assert_eq!(options.truncation_params().unwrap().unwrap().max_length, 8);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(PaddingPolicy::from_str("longest").unwrap(), PaddingPolicy::Longest);
        assert_eq!(
            TruncationPolicy::from_str("only_first").unwrap(),
            TruncationPolicy::OnlyFirst
        );
        assert_eq!(PaddingPolicy::MaxLength.to_string(), "max_length");
    }

    #[test]
    fn test_serde() {
        let options: EncodeOptions =
            serde_json::from_str(r#"{"padding": "longest", "add_special_tokens": false}"#).unwrap();
        assert_eq!(options.padding, PaddingPolicy::Longest);
        assert_eq!(options.truncation, TruncationPolicy::DoNotTruncate);
        assert!(!options.add_special_tokens);
    }
}
