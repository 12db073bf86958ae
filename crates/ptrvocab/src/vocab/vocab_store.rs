//! # Vocabulary Store
//!
//! An owned, append-only wrapper around a pretrained subword
//! [`Tokenizer`], with an explicit freeze marking the end of
//! the extension phase.

use std::borrow::Cow;

use tokenizers::{AddedToken, Encoding, Tokenizer};

use crate::{
    PVResult,
    errors::PtrVocabError,
    types::{PVHashSet, TokenId},
    vocab::{EncodeOptions, StructuralIds, StructuralTokenNames},
};

/// Owned base vocabulary plus an ordered list of extension tokens.
///
/// Token ids are assigned by the underlying [`Tokenizer`]; extension
/// tokens receive the next free ids in registration order. Ids are
/// never reassigned, and once [`freeze`](Self::freeze) is called no
/// further tokens can be added.
///
/// A frozen store is read-only, and may be shared across threads
/// without synchronization.
#[derive(Clone)]
pub struct VocabularyStore {
    tokenizer: Tokenizer,
    structural_names: StructuralTokenNames,
    structural_ids: StructuralIds,
    extension: Vec<String>,
    vocab_size: usize,
    frozen: bool,
}

impl core::fmt::Debug for VocabularyStore {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("VocabularyStore")
            .field("structural_ids", &self.structural_ids)
            .field("extension_len", &self.extension.len())
            .field("vocab_size", &self.vocab_size)
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl VocabularyStore {
    /// Wrap a base tokenizer.
    ///
    /// Any padding or truncation configured on the tokenizer is cleared;
    /// those are controlled per call by [`EncodeOptions`].
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] if a structural token is missing.
    pub fn from_tokenizer(
        mut tokenizer: Tokenizer,
        structural_names: StructuralTokenNames,
    ) -> PVResult<Self> {
        tokenizer.with_padding(None);
        tokenizer.with_truncation(None)?;

        let structural_ids = structural_names.resolve(|name| tokenizer.token_to_id(name))?;
        let vocab_size = tokenizer.get_vocab_size(true);

        Ok(Self {
            tokenizer,
            structural_names,
            structural_ids,
            extension: Vec::new(),
            vocab_size,
            frozen: false,
        })
    }

    /// Rebuild a store from saved parts.
    ///
    /// Every extension token must already be registered in `tokenizer`.
    pub(crate) fn from_saved_parts(
        tokenizer: Tokenizer,
        structural_names: StructuralTokenNames,
        extension: Vec<String>,
        frozen: bool,
    ) -> PVResult<Self> {
        let mut store = Self::from_tokenizer(tokenizer, structural_names)?;
        if let Some(missing) = extension.iter().find(|t| store.id_of(t).is_none()) {
            return Err(PtrVocabError::Data(format!(
                "saved extension token {missing:?} is not registered in the saved tokenizer"
            )));
        }
        store.extension = extension;
        store.frozen = frozen;
        Ok(store)
    }

    /// Get the underlying tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The number of distinct tokens, including extension tokens.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// The structural token names.
    pub fn structural_names(&self) -> &StructuralTokenNames {
        &self.structural_names
    }

    /// The structural token ids.
    pub fn structural_ids(&self) -> StructuralIds {
        self.structural_ids
    }

    /// The extension tokens, in registration order.
    pub fn extension_tokens(&self) -> &[String] {
        &self.extension
    }

    /// Has the extension phase ended?
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// End the extension phase.
    ///
    /// Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::debug!(
                "Freezing vocabulary: {} tokens ({} extension)",
                self.vocab_size,
                self.extension.len()
            );
        }
        self.frozen = true;
    }

    /// Fail with [`PtrVocabError::State`] if the store is frozen.
    pub fn check_extendable(&self) -> PVResult<()> {
        if self.frozen {
            return Err(PtrVocabError::State(
                "cannot extend a frozen vocabulary store".to_string(),
            ));
        }
        Ok(())
    }

    /// Append tokens, assigning the next available ids in the given order.
    ///
    /// Tokens are registered as added (non-special) tokens: they are matched
    /// whole in raw input text, never split by the subword model, and kept
    /// when decoding with `skip_special_tokens`. Whitespace on either side of
    /// a match is absorbed into the token, so a space-separated sequence of
    /// extension tokens encodes to exactly their ids.
    ///
    /// ## Arguments
    /// * `tokens` - distinct, non-empty tokens, not yet in the extension.
    ///
    /// ## Returns
    /// The number of newly assigned ids. A token already present in the
    /// base vocabulary keeps its base id, and is not counted.
    ///
    /// ## Errors
    /// * [`PtrVocabError::State`] if the store is frozen, or the tokens are
    ///   not distinct; the store is left unchanged.
    pub fn add_tokens<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
    ) -> PVResult<usize> {
        self.check_can_add(tokens)?;

        let added = tokens
            .iter()
            .map(|t| {
                AddedToken::from(t.as_ref().to_string(), false)
                    .normalized(false)
                    .lstrip(true)
                    .rstrip(true)
            })
            .collect::<Vec<_>>();
        self.tokenizer.add_tokens(&added);

        let before = self.vocab_size;
        self.vocab_size = self.tokenizer.get_vocab_size(true);
        self.extension
            .extend(tokens.iter().map(|t| t.as_ref().to_string()));

        Ok(self.vocab_size - before)
    }

    /// Check that [`add_tokens`](Self::add_tokens) would accept `tokens`,
    /// without modifying the store.
    pub fn check_can_add<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> PVResult<()> {
        self.check_extendable()?;

        let mut seen: PVHashSet<&str> = PVHashSet::default();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                return Err(PtrVocabError::State(
                    "cannot register an empty token".to_string(),
                ));
            }
            if !seen.insert(token) || self.extension.iter().any(|t| t == token) {
                return Err(PtrVocabError::State(format!(
                    "token {token:?} is registered more than once"
                )));
            }
        }
        Ok(())
    }

    /// Look up the id of a token.
    pub fn id_of(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.tokenizer.token_to_id(token)
    }

    /// Look up the token for an id.
    pub fn token_of(
        &self,
        id: TokenId,
    ) -> Option<String> {
        self.tokenizer.id_to_token(id)
    }

    /// Look up the ids of registered tokens, in order.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if any token is unregistered.
    pub fn try_ids_of<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> PVResult<Vec<TokenId>> {
        tokens
            .iter()
            .map(|t| {
                let t = t.as_ref();
                self.id_of(t).ok_or_else(|| {
                    PtrVocabError::Data(format!("token {t:?} is not registered"))
                })
            })
            .collect()
    }

    /// Encode text to ids, without begin/end tokens.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn encode_text(
        &self,
        text: &str,
    ) -> PVResult<Vec<TokenId>> {
        let encoding = self.tokenizer.encode(text, false)?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decode ids to text, keeping special tokens.
    pub fn decode_ids(
        &self,
        ids: &[TokenId],
    ) -> PVResult<String> {
        self.decode(ids, false)
    }

    /// Decode ids to text.
    pub fn decode(
        &self,
        ids: &[TokenId],
        skip_special_tokens: bool,
    ) -> PVResult<String> {
        Ok(self.tokenizer.decode(ids, skip_special_tokens)?)
    }

    /// Get a tokenizer configured with the padding and truncation of `options`.
    ///
    /// Borrows the shared tokenizer when no reconfiguration is needed.
    pub fn configured_tokenizer(
        &self,
        options: &EncodeOptions,
    ) -> PVResult<Cow<'_, Tokenizer>> {
        if !options.needs_post_processing() {
            return Ok(Cow::Borrowed(&self.tokenizer));
        }

        let padding = options.padding_params(self.structural_ids.pad, &self.structural_names.pad)?;
        let truncation = options.truncation_params()?;

        let mut tokenizer = self.tokenizer.clone();
        tokenizer.with_padding(padding);
        tokenizer.with_truncation(truncation)?;
        Ok(Cow::Owned(tokenizer))
    }

    /// Encode a batch of texts with the given options.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, texts)))]
    pub fn encode_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncodeOptions,
    ) -> PVResult<Vec<Encoding>> {
        let tokenizer = self.configured_tokenizer(options)?;
        let inputs = texts.iter().map(|t| t.as_ref()).collect::<Vec<&str>>();
        Ok(tokenizer.encode_batch(inputs, options.add_special_tokens)?)
    }

    /// Decode a batch of id rows.
    pub fn decode_batch(
        &self,
        rows: &[&[TokenId]],
        skip_special_tokens: bool,
    ) -> PVResult<Vec<String>> {
        Ok(self.tokenizer.decode_batch(rows, skip_special_tokens)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::{TEST_WORDS, build_test_bpe_store, build_test_store},
        vocab::{PaddingPolicy, TruncationPolicy},
    };

    #[test]
    fn test_base_store() {
        let store = build_test_store();
        assert_eq!(store.vocab_size(), 4 + TEST_WORDS.len());
        assert!(!store.is_frozen());
        assert!(store.extension_tokens().is_empty());
        assert_eq!(
            store.structural_ids(),
            StructuralIds {
                begin: 0,
                end: 2,
                pad: 1,
                unknown: 3
            }
        );
        assert_eq!(store.id_of("weather"), Some(7));
        assert_eq!(store.token_of(7).as_deref(), Some("weather"));
    }

    #[test]
    fn test_add_tokens() {
        let mut store = build_test_store();
        let base = store.vocab_size();

        let added = store.add_tokens(&["GET_WEATHER", "LOCATION"]).unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.vocab_size(), base + 2);
        assert_eq!(store.id_of("GET_WEATHER"), Some(base as TokenId));
        assert_eq!(store.id_of("LOCATION"), Some(base as TokenId + 1));
        assert_eq!(store.extension_tokens(), &["GET_WEATHER", "LOCATION"]);

        // Tokens already in the base vocabulary keep their ids.
        let added = store.add_tokens(&["weather"]).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.id_of("weather"), Some(7));
    }

    #[test]
    fn test_add_tokens_rejects_duplicates() {
        let mut store = build_test_store();
        let base = store.vocab_size();

        assert!(matches!(
            store.add_tokens(&["A", "B", "A"]),
            Err(PtrVocabError::State(_))
        ));
        assert_eq!(store.vocab_size(), base);

        store.add_tokens(&["A"]).unwrap();
        assert!(store.check_can_add(&["B"]).is_ok());
        assert!(store.check_can_add(&["B", "A"]).is_err());
        assert!(store.add_tokens(&["A"]).is_err());
        assert!(store.add_tokens(&[""]).is_err());
    }

    #[test]
    fn test_frozen_store() {
        let mut store = build_test_store();
        store.freeze();
        store.freeze();
        assert!(store.is_frozen());

        let base = store.vocab_size();
        assert!(matches!(
            store.add_tokens(&["GET_WEATHER"]),
            Err(PtrVocabError::State(_))
        ));
        assert_eq!(store.vocab_size(), base);
    }

    #[test]
    fn test_registered_token_roundtrip() {
        let mut store = build_test_store();
        let tokens = ["GET_WEATHER", "SET_ALARM", "]", "@ptr0", "@ptr10", "@ptr1"];
        store.add_tokens(&tokens).unwrap();

        let ids = store.try_ids_of(&tokens).unwrap();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tokens.len());

        for token in tokens {
            let encoded = store.encode_text(token).unwrap();
            assert_eq!(encoded, vec![store.id_of(token).unwrap()]);
            assert_eq!(store.decode_ids(&encoded).unwrap(), token);
        }
    }

    #[test]
    fn test_encode_mixed_text() {
        let mut store = build_test_store();
        store.add_tokens(&["GET_WEATHER", "]"]).unwrap();

        let ids = store.encode_text("GET_WEATHER what is the weather ]").unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(ids[0], store.id_of("GET_WEATHER").unwrap());
        assert_eq!(ids[1], store.id_of("what").unwrap());
        assert_eq!(ids[5], store.id_of("]").unwrap());

        assert!(store.try_ids_of(&["nope"]).is_err());
    }

    #[test]
    fn test_extension_tokens_absorb_whitespace() {
        let mut store = build_test_bpe_store();
        let space = store.id_of("\u{120}").unwrap();
        let (a, b) = (store.id_of("a").unwrap(), store.id_of("b").unwrap());

        // Spaces between base words survive byte-level pre-tokenization.
        assert_eq!(store.encode_text("a b").unwrap(), vec![a, space, b]);

        let tokens = ["GET_WEATHER", "@ptr3", "]"];
        store.add_tokens(&tokens).unwrap();
        let ids = store.try_ids_of(&tokens).unwrap();

        assert_eq!(store.encode_text("GET_WEATHER @ptr3 ]").unwrap(), ids);
        assert_eq!(store.encode_text("  GET_WEATHER   @ptr3 ] ").unwrap(), ids);
        assert_eq!(
            store.encode_text("GET_WEATHER ab ]").unwrap(),
            vec![ids[0], a, b, ids[2]]
        );

        for token in tokens {
            let encoded = store.encode_text(token).unwrap();
            assert_eq!(encoded, vec![store.id_of(token).unwrap()]);
            assert_eq!(store.decode_ids(&encoded).unwrap(), token);
        }

        // Decoded extension text re-encodes to the same ids.
        let text = store.decode_ids(&ids).unwrap();
        assert_eq!(store.encode_text(&text).unwrap(), ids);
    }

    #[test]
    fn test_encode_batch_padding() {
        let store = build_test_store();
        let options = EncodeOptions::default()
            .with_add_special_tokens(false)
            .with_padding(PaddingPolicy::Longest);

        let batch = store
            .encode_batch(&["what is the weather", "boston"], &options)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].get_ids().len(), 4);
        assert_eq!(batch[1].get_ids().len(), 4);
        assert_eq!(batch[1].get_ids()[1..], [1, 1, 1]);
        assert_eq!(batch[1].get_attention_mask(), &[1, 0, 0, 0]);
    }

    #[test]
    fn test_encode_batch_truncation() {
        let store = build_test_store();
        let options = EncodeOptions::default()
            .with_add_special_tokens(false)
            .with_truncation(TruncationPolicy::LongestFirst)
            .with_max_length(Some(2));

        let batch = store
            .encode_batch(&["what is the weather"], &options)
            .unwrap();
        assert_eq!(
            batch[0].get_ids(),
            &[store.id_of("what").unwrap(), store.id_of("is").unwrap()]
        );

        // The shared tokenizer is not reconfigured.
        let plain = store
            .encode_batch(&["what is the weather"], &EncodeOptions::default())
            .unwrap();
        assert_eq!(plain[0].get_ids().len(), 4);
    }

    #[test]
    fn test_decode_batch() {
        let store = build_test_store();
        let rows: Vec<&[TokenId]> = vec![&[4, 5], &[9]];
        assert_eq!(
            store.decode_batch(&rows, false).unwrap(),
            vec!["what is".to_string(), "boston".to_string()]
        );
    }
}
