//! # Pointer Vocabulary
//!
//! A fixed family of positional tokens, ``{prefix}0 .. {prefix}{N-1}``,
//! one per input position. The generation order is load-bearing: the
//! `n`-th pointer token always receives the `n`-th pointer id.

use crate::{
    PVResult,
    errors::PtrVocabError,
    types::{PVHashMap, TokenId, hash_map_with_capacity},
    vocab::VocabularyStore,
};

/// The default pointer token prefix.
pub const DEFAULT_POINTER_PREFIX: &str = "@ptr";

/// Positional pointer token generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerVocab {
    prefix: String,
    max_seq_len: usize,
}

impl PointerVocab {
    /// Create a pointer vocabulary with the [`DEFAULT_POINTER_PREFIX`].
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] if `max_seq_len` is zero.
    pub fn new(max_seq_len: usize) -> PVResult<Self> {
        Self::with_prefix(DEFAULT_POINTER_PREFIX, max_seq_len)
    }

    /// Create a pointer vocabulary with a custom prefix.
    pub fn with_prefix(
        prefix: &str,
        max_seq_len: usize,
    ) -> PVResult<Self> {
        if max_seq_len == 0 {
            return Err(PtrVocabError::Configuration(
                "max_seq_len must be positive".to_string(),
            ));
        }
        if prefix.is_empty() {
            return Err(PtrVocabError::Configuration(
                "the pointer prefix must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            max_seq_len,
        })
    }

    /// The pointer token prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The number of pointer tokens.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// The pointer token for input position `n`.
    pub fn pointer_token(
        &self,
        n: usize,
    ) -> String {
        format!("{}{n}", self.prefix)
    }

    /// Parse a pointer token back to its position.
    pub fn position_of(
        &self,
        token: &str,
    ) -> Option<usize> {
        let digits = token.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
            return None;
        }
        let n: usize = digits.parse().ok()?;
        (n < self.max_seq_len).then_some(n)
    }

    /// Generate every pointer token, in strictly increasing position order.
    pub fn generate(&self) -> Vec<String> {
        (0..self.max_seq_len).map(|n| self.pointer_token(n)).collect()
    }

    /// Append the pointer tokens to the store.
    ///
    /// ## Returns
    /// The assigned ids; the `n`-th id belongs to pointer position `n`.
    ///
    /// ## Errors
    /// [`PtrVocabError::State`] if the store is frozen, or a pointer token
    /// is already in the extension; the store is unchanged.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(store)))]
    pub fn register(
        &self,
        store: &mut VocabularyStore,
    ) -> PVResult<PointerIndex> {
        let tokens = self.generate();
        let added = store.add_tokens(&tokens)?;
        log::info!("Added {added} pointer tokens.");

        self.index(store)
    }

    /// Index the ids of already registered pointer tokens.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if a pointer token is unregistered.
    pub fn index(
        &self,
        store: &VocabularyStore,
    ) -> PVResult<PointerIndex> {
        let tokens = self.generate();
        let ids = store.try_ids_of(&tokens)?;

        let mut to_id = hash_map_with_capacity(tokens.len());
        let mut to_token = hash_map_with_capacity(tokens.len());
        for (token, &id) in tokens.into_iter().zip(&ids) {
            to_token.insert(id, token.clone());
            to_id.insert(token, id);
        }

        Ok(PointerIndex {
            ids,
            to_id,
            to_token,
        })
    }
}

/// Registered pointer ids.
#[derive(Debug, Clone)]
pub struct PointerIndex {
    ids: Vec<TokenId>,
    to_id: PVHashMap<String, TokenId>,
    to_token: PVHashMap<TokenId, String>,
}

impl PointerIndex {
    /// The pointer ids, in position order.
    pub fn ids(&self) -> &[TokenId] {
        &self.ids
    }

    /// The number of pointer tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The pointer id for input position `n`.
    pub fn id_at(
        &self,
        n: usize,
    ) -> Option<TokenId> {
        self.ids.get(n).copied()
    }

    /// Look up a pointer token's id.
    pub fn pointer_id(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.to_id.get(token).copied()
    }

    /// Look up the pointer token for an id.
    pub fn pointer_token(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.to_token.get(&id).map(String::as_str)
    }

    /// The pointer tokens, in position order.
    pub fn tokens(&self) -> Vec<&str> {
        self.ids
            .iter()
            .filter_map(|id| self.pointer_token(*id))
            .collect()
    }
}
