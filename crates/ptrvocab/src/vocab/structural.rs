//! # Structural Tokens
//!
//! The four sequence-structure tokens every restricted output vocabulary
//! carries: begin, end, pad, and unknown.

use serde::{Deserialize, Serialize};

use crate::{PVResult, errors::PtrVocabError, types::TokenId};

/// The names of the structural tokens in a base vocabulary.
///
/// Defaults to the BART / `RoBERTa` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralTokenNames {
    /// Beginning-of-sequence token.
    pub begin: String,

    /// End-of-sequence token.
    pub end: String,

    /// Padding token.
    pub pad: String,

    /// Unknown token.
    pub unknown: String,
}

impl Default for StructuralTokenNames {
    fn default() -> Self {
        Self::new("<s>", "</s>", "<pad>", "<unk>")
    }
}

impl StructuralTokenNames {
    /// Create a new set of structural token names.
    pub fn new(
        begin: &str,
        end: &str,
        pad: &str,
        unknown: &str,
    ) -> Self {
        Self {
            begin: begin.to_string(),
            end: end.to_string(),
            pad: pad.to_string(),
            unknown: unknown.to_string(),
        }
    }

    /// Iterate the names in ``[begin, end, pad, unknown]`` order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.begin, &self.end, &self.pad, &self.unknown]
            .into_iter()
            .map(String::as_str)
    }

    /// Resolve the names to ids with the given lookup.
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] if any name is absent from the vocabulary.
    pub fn resolve<F>(
        &self,
        lookup: F,
    ) -> PVResult<StructuralIds>
    where
        F: Fn(&str) -> Option<TokenId>,
    {
        let get = |name: &str| {
            lookup(name).ok_or_else(|| {
                PtrVocabError::Configuration(format!(
                    "structural token {name:?} is not in the base vocabulary"
                ))
            })
        };

        Ok(StructuralIds {
            begin: get(&self.begin)?,
            end: get(&self.end)?,
            pad: get(&self.pad)?,
            unknown: get(&self.unknown)?,
        })
    }
}

/// The resolved ids of the structural tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralIds {
    /// Beginning-of-sequence id.
    pub begin: TokenId,

    /// End-of-sequence id.
    pub end: TokenId,

    /// Padding id.
    pub pad: TokenId,

    /// Unknown id.
    pub unknown: TokenId,
}

impl StructuralIds {
    /// The ids in restricted-vocabulary order: ``[end, begin, pad, unknown]``.
    ///
    /// This order is part of the compact id space layout.
    pub fn restricted_order(&self) -> [TokenId; 4] {
        [self.end, self.begin, self.pad, self.unknown]
    }

    /// Is this id one of the structural ids?
    pub fn contains(
        &self,
        id: TokenId,
    ) -> bool {
        self.restricted_order().contains(&id)
    }
}
