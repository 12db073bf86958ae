//! # Pointer Tokenizer
//!
//! The facade: a frozen [`VocabularyStore`] extended with an ontology and
//! a pointer vocabulary, plus an optional [`IndexRemapper`] for encoding
//! into, and decoding from, the compact pointer space.

use tokenizers::Encoding;

#[cfg(feature = "download")]
use crate::disk_cache::PtrVocabDiskCache;
use crate::{
    PVResult,
    errors::PtrVocabError,
    ontology::{OntologyIndex, OntologyRegistry},
    pointers::{PointerIndex, PointerVocab},
    pretrained,
    remap::{IndexRemapper, NUM_STRUCTURAL_TOKENS},
    tokenizer::{Extension, PointerTokenizerOptions},
    types::{CompactId, TokenId},
    vocab::{EncodeOptions, VocabularyStore},
};

/// A batch encoded into the compact pointer space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerBatch {
    /// Compact ids, one row per input.
    pub ids: Vec<Vec<CompactId>>,

    /// Attention mask; `false` at padding positions.
    pub attention_mask: Vec<Vec<bool>>,

    /// Special tokens mask; `true` at tokens added by post-processing.
    pub special_tokens_mask: Vec<Vec<bool>>,
}

impl PointerBatch {
    /// The number of rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Is the batch empty?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Vocabulary facade for pointer-generator semantic parsing.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone)]
pub struct PointerTokenizer {
    options: PointerTokenizerOptions,
    store: VocabularyStore,
    ontology: OntologyRegistry,
    ontology_index: OntologyIndex,
    pointers: PointerVocab,
    pointer_index: PointerIndex,
    remapper: Option<IndexRemapper>,
}

impl PointerTokenizer {
    /// Build from options, loading the pretrained base vocabulary.
    ///
    /// With the "download" feature, pretrained identifiers are fetched
    /// through the default disk cache.
    #[cfg_attr(feature = "tracing", tracing::instrument)]
    pub fn from_options(options: &PointerTokenizerOptions) -> PVResult<Self> {
        options.dataset_kind()?;

        #[cfg(feature = "download")]
        let loaded = {
            let mut disk_cache = PtrVocabDiskCache::new(Default::default())
                .map_err(|e| PtrVocabError::External(format!("{e:#}")))?;
            pretrained::load_vocab(&options.pretrained, &mut disk_cache)?
        };

        #[cfg(not(feature = "download"))]
        let loaded = pretrained::load_vocab(&options.pretrained)?;

        Self::from_store(loaded.store, options, loaded.model_max_length)
    }

    /// Build from options, fetching pretrained vocabularies through `disk_cache`.
    #[cfg(feature = "download")]
    pub fn from_options_with_cache(
        options: &PointerTokenizerOptions,
        disk_cache: &mut PtrVocabDiskCache,
    ) -> PVResult<Self> {
        options.dataset_kind()?;
        let loaded = pretrained::load_vocab(&options.pretrained, disk_cache)?;
        Self::from_store(loaded.store, options, loaded.model_max_length)
    }

    /// Extend an unfrozen base store, and build.
    ///
    /// ## Arguments
    /// * `store` - the base vocabulary.
    /// * `options` - tokenizer options; `options.pretrained` is not read.
    /// * `model_max_length` - the pointer count when `options.max_seq_len` is unset.
    pub fn from_store(
        mut store: VocabularyStore,
        options: &PointerTokenizerOptions,
        model_max_length: Option<usize>,
    ) -> PVResult<Self> {
        let extension = options.extend(&mut store, model_max_length)?;
        Self::from_extension(store, options.clone(), extension)
    }

    /// Extend an unfrozen base store with a parsed ontology, and build.
    pub fn from_store_with_ontology(
        mut store: VocabularyStore,
        ontology: OntologyRegistry,
        options: &PointerTokenizerOptions,
        model_max_length: Option<usize>,
    ) -> PVResult<Self> {
        let extension = options.extend_with_ontology(&mut store, ontology, model_max_length)?;
        Self::from_extension(store, options.clone(), extension)
    }

    /// Assemble from an extended, frozen store.
    ///
    /// ## Errors
    /// [`PtrVocabError::State`] if the store is not frozen.
    pub fn from_extension(
        store: VocabularyStore,
        mut options: PointerTokenizerOptions,
        extension: Extension,
    ) -> PVResult<Self> {
        let Extension {
            ontology,
            ontology_index,
            pointers,
            pointer_index,
        } = extension;

        if !store.is_frozen() {
            return Err(PtrVocabError::State(
                "the vocabulary store must be frozen".to_string(),
            ));
        }

        let remapper = options
            .pointer_remap
            .then(|| IndexRemapper::build(&store, pointer_index.ids(), ontology_index.ontology_ids()))
            .transpose()?;

        options.max_seq_len = Some(pointers.max_seq_len());
        options.span_close_token = ontology.span_close_token().to_string();
        options.pointer_prefix = pointers.prefix().to_string();

        Ok(Self {
            options,
            store,
            ontology,
            ontology_index,
            pointers,
            pointer_index,
            remapper,
        })
    }

    /// The resolved options.
    ///
    /// `max_seq_len` is always set.
    pub fn options(&self) -> &PointerTokenizerOptions {
        &self.options
    }

    /// The frozen vocabulary store.
    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    /// The ontology.
    pub fn ontology(&self) -> &OntologyRegistry {
        &self.ontology
    }

    /// The ontology ids.
    pub fn ontology_index(&self) -> &OntologyIndex {
        &self.ontology_index
    }

    /// The pointer vocabulary.
    pub fn pointer_vocab(&self) -> &PointerVocab {
        &self.pointers
    }

    /// The pointer ids.
    pub fn pointer_index(&self) -> &PointerIndex {
        &self.pointer_index
    }

    /// The remapper, if built.
    pub fn remapper(&self) -> Option<&IndexRemapper> {
        self.remapper.as_ref()
    }

    /// Get the remapper.
    ///
    /// ## Errors
    /// [`PtrVocabError::State`] if built without `pointer_remap`.
    pub fn try_remapper(&self) -> PVResult<&IndexRemapper> {
        self.remapper.as_ref().ok_or_else(|| {
            PtrVocabError::State("pointer remapping is disabled for this tokenizer".to_string())
        })
    }

    /// The full vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.store.vocab_size()
    }

    /// The restricted output vocabulary size.
    ///
    /// ``pointer_set_size() + ontology_vocab_size() + 4``.
    pub fn output_vocab_size(&self) -> usize {
        self.pointer_set_size() + self.ontology_vocab_size() + NUM_STRUCTURAL_TOKENS
    }

    /// The number of ontology tokens, including the span-close token.
    pub fn ontology_vocab_size(&self) -> usize {
        self.ontology_index.ontology_ids().len()
    }

    /// The number of pointer tokens.
    pub fn pointer_set_size(&self) -> usize {
        self.pointer_index.len()
    }

    /// The ontology ids, span-close id last.
    pub fn ontology_ids(&self) -> &[TokenId] {
        self.ontology_index.ontology_ids()
    }

    /// The intent ids.
    pub fn intent_ids(&self) -> &[TokenId] {
        self.ontology_index.intent_ids()
    }

    /// The slot ids.
    pub fn slot_ids(&self) -> &[TokenId] {
        self.ontology_index.slot_ids()
    }

    /// The pointer ids, in position order.
    pub fn pointer_ids(&self) -> &[TokenId] {
        self.pointer_index.ids()
    }

    /// The number of intents.
    pub fn num_intents(&self) -> usize {
        self.ontology_index.num_intents()
    }

    /// The number of slots.
    pub fn num_slots(&self) -> usize {
        self.ontology_index.num_slots()
    }

    /// The begin token id.
    pub fn bos_id(&self) -> TokenId {
        self.store.structural_ids().begin
    }

    /// The end token id.
    pub fn eos_id(&self) -> TokenId {
        self.store.structural_ids().end
    }

    /// The padding token id.
    pub fn pad_id(&self) -> TokenId {
        self.store.structural_ids().pad
    }

    /// The unknown token id.
    pub fn unk_id(&self) -> TokenId {
        self.store.structural_ids().unknown
    }

    /// The span-close token id.
    pub fn span_close_id(&self) -> TokenId {
        self.ontology_index.span_close_id()
    }

    /// The span-close token.
    pub fn span_close_token(&self) -> &str {
        self.ontology.span_close_token()
    }

    /// Look up an intent's id.
    pub fn intent_id(
        &self,
        intent: &str,
    ) -> Option<TokenId> {
        self.ontology_index.intent_id(intent)
    }

    /// Look up the intent for an id.
    pub fn intent_name(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.ontology_index.intent_name(id)
    }

    /// Look up a slot's id.
    pub fn slot_id(
        &self,
        slot: &str,
    ) -> Option<TokenId> {
        self.ontology_index.slot_id(slot)
    }

    /// Look up the slot for an id.
    pub fn slot_name(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.ontology_index.slot_name(id)
    }

    /// Look up a pointer token's id.
    pub fn pointer_id(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.pointer_index.pointer_id(token)
    }

    /// Look up the pointer token for an id.
    pub fn pointer_token(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.pointer_index.pointer_token(id)
    }

    /// Encode text in the full id space, with special tokens.
    pub fn encode(
        &self,
        text: &str,
    ) -> PVResult<Vec<TokenId>> {
        let encoding = self.store.tokenizer().encode(text, true)?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Encode a batch in the full id space.
    pub fn encode_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncodeOptions,
    ) -> PVResult<Vec<Encoding>> {
        self.store.encode_batch(texts, options)
    }

    /// Decode full ids to text.
    pub fn decode(
        &self,
        ids: &[TokenId],
        skip_special_tokens: bool,
    ) -> PVResult<String> {
        self.store.decode(ids, skip_special_tokens)
    }

    /// Encode a batch into the compact pointer space.
    ///
    /// Only the id rows are transformed; the masks pass through.
    ///
    /// ## Errors
    /// * [`PtrVocabError::State`] without a remapper.
    /// * [`PtrVocabError::Lookup`] if an encoded id is outside the
    ///   restricted output vocabulary.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, texts)))]
    pub fn try_batch_encode_to_pointer_space<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncodeOptions,
    ) -> PVResult<PointerBatch> {
        let remapper = self.try_remapper()?;
        let encodings = self.store.encode_batch(texts, options)?;

        let rows = encodings.iter().map(|e| e.get_ids()).collect::<Vec<_>>();
        let ids = remapper.try_forward_transform_batch(&rows)?;

        let as_bool = |mask: &[u32]| mask.iter().map(|&m| m != 0).collect::<Vec<_>>();
        Ok(PointerBatch {
            ids,
            attention_mask: encodings
                .iter()
                .map(|e| as_bool(e.get_attention_mask()))
                .collect(),
            special_tokens_mask: encodings
                .iter()
                .map(|e| as_bool(e.get_special_tokens_mask()))
                .collect(),
        })
    }

    /// Encode a batch into the compact pointer space.
    ///
    /// ## Panics
    /// If an encoded id is outside the restricted output vocabulary.
    pub fn batch_encode_to_pointer_space<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncodeOptions,
    ) -> PVResult<PointerBatch> {
        match self.try_batch_encode_to_pointer_space(texts, options) {
            Err(err @ PtrVocabError::Lookup { .. }) => {
                panic!("forward transform precondition violated: {err}")
            }
            result => result,
        }
    }

    /// Decode compact id rows to text.
    ///
    /// ## Errors
    /// * [`PtrVocabError::State`] without a remapper.
    /// * [`PtrVocabError::Lookup`] if a compact id is out of range.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, rows)))]
    pub fn try_batch_decode_from_pointer_space<R>(
        &self,
        rows: &[R],
        skip_special_tokens: bool,
    ) -> PVResult<Vec<String>>
    where
        R: AsRef<[CompactId]> + Sync,
    {
        let full = self.try_remapper()?.try_inverse_transform_batch(rows)?;
        let full = full.iter().map(Vec::as_slice).collect::<Vec<_>>();
        self.store.decode_batch(&full, skip_special_tokens)
    }

    /// Decode compact id rows to text.
    ///
    /// ## Panics
    /// If a compact id is out of range.
    pub fn batch_decode_from_pointer_space<R>(
        &self,
        rows: &[R],
        skip_special_tokens: bool,
    ) -> PVResult<Vec<String>>
    where
        R: AsRef<[CompactId]> + Sync,
    {
        match self.try_batch_decode_from_pointer_space(rows, skip_special_tokens) {
            Err(err @ PtrVocabError::Lookup { .. }) => {
                panic!("inverse transform precondition violated: {err}")
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::{build_test_ontology, build_test_store},
        types::{check_is_send, check_is_sync},
        vocab::PaddingPolicy,
    };

    fn build(
        max_seq_len: usize,
        pointer_remap: bool,
    ) -> PointerTokenizer {
        let options = PointerTokenizerOptions::default()
            .with_max_seq_len(Some(max_seq_len))
            .with_pointer_remap(pointer_remap);
        PointerTokenizer::from_store_with_ontology(
            build_test_store(),
            build_test_ontology().unwrap(),
            &options,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_introspection() {
        let tok = build(8, true);
        check_is_send(&tok);
        check_is_sync(&tok);

        // fixture: 4 structural + 13 words.
        assert_eq!(tok.vocab_size(), 17 + 5 + 8);
        assert_eq!(tok.ontology_vocab_size(), 5);
        assert_eq!(tok.pointer_set_size(), 8);
        assert_eq!(tok.output_vocab_size(), 8 + 5 + 4);
        assert_eq!(tok.try_remapper().unwrap().restricted_size(), 17);

        assert_eq!(tok.bos_id(), 0);
        assert_eq!(tok.pad_id(), 1);
        assert_eq!(tok.eos_id(), 2);
        assert_eq!(tok.unk_id(), 3);
        assert_eq!(tok.span_close_token(), "]");
        assert_eq!(tok.span_close_id(), 21);
        assert_eq!(tok.ontology_ids(), &[17, 18, 19, 20, 21]);
        assert_eq!(tok.intent_ids(), &[18, 20]);
        assert_eq!(tok.slot_ids(), &[17, 19]);
        assert_eq!(tok.num_intents(), 2);
        assert_eq!(tok.num_slots(), 2);

        assert_eq!(tok.intent_id("SET_ALARM"), Some(20));
        assert_eq!(tok.intent_name(18), Some("GET_WEATHER"));
        assert_eq!(tok.slot_id("DATE_TIME"), Some(17));
        assert_eq!(tok.slot_name(19), Some("LOCATION"));
        assert_eq!(tok.pointer_id("@ptr0"), Some(22));
        assert_eq!(tok.pointer_token(29), Some("@ptr7"));
        assert_eq!(tok.options().max_seq_len, Some(8));
    }

    #[test]
    fn test_pointer_space_roundtrip() {
        let tok = build(8, true);
        let texts = ["GET_WEATHER @ptr3 LOCATION @ptr5 ] ]", "SET_ALARM ]"];

        let batch = tok
            .batch_encode_to_pointer_space(
                &texts,
                &EncodeOptions::default().with_padding(PaddingPolicy::Longest),
            )
            .unwrap();
        assert_eq!(batch.len(), 2);

        // compact layout: pointers [0, 8), ontology [8, 13), then </s>, <s>, <pad>, <unk>.
        assert_eq!(batch.ids[0], vec![9, 3, 10, 5, 12, 12]);
        assert_eq!(batch.ids[1], vec![11, 12, 15, 15, 15, 15]);
        assert_eq!(batch.attention_mask[1], vec![true, true, false, false, false, false]);
        assert_eq!(batch.special_tokens_mask[0].len(), 6);

        let decoded = tok.batch_decode_from_pointer_space(&batch.ids, true).unwrap();
        assert_eq!(decoded[0], texts[0]);
        assert_eq!(decoded[1], texts[1]);
    }

    #[test]
    fn test_forward_then_inverse_reproduces_ids() {
        let tok = build(8, true);
        let ids = tok.store().encode_text("GET_WEATHER @ptr0 ]").unwrap();
        let remapper = tok.try_remapper().unwrap();
        assert_eq!(remapper.inverse_transform(&remapper.forward_transform(&ids)), ids);
    }

    #[test]
    fn test_non_restricted_text() {
        let tok = build(8, true);
        let err = tok
            .try_batch_encode_to_pointer_space(&["what is GET_WEATHER"], &EncodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, PtrVocabError::Lookup { position: 0, .. }));

        let err = tok
            .try_batch_decode_from_pointer_space(&[vec![0, 17]], false)
            .unwrap_err();
        assert!(matches!(err, PtrVocabError::Lookup { id: 17, position: 1, .. }));
    }

    #[test]
    #[should_panic(expected = "forward transform precondition violated")]
    fn test_non_restricted_text_panics() {
        let tok = build(8, true);
        let _ = tok.batch_encode_to_pointer_space(&["boston"], &EncodeOptions::default());
    }

    #[test]
    fn test_without_pointer_remap() {
        let tok = build(4, false);
        assert!(tok.remapper().is_none());
        assert!(tok.store().is_frozen());
        assert_eq!(tok.output_vocab_size(), 4 + 5 + 4);
        assert!(matches!(
            tok.try_batch_encode_to_pointer_space(&["]"], &EncodeOptions::default()),
            Err(PtrVocabError::State(_))
        ));
        assert!(matches!(
            tok.batch_decode_from_pointer_space(&[vec![0u32]], false),
            Err(PtrVocabError::State(_))
        ));

        // full id space pass-through still works.
        let ids = tok.encode("what is the weather").unwrap();
        assert_eq!(ids, vec![4, 5, 6, 7]);
        assert_eq!(tok.decode(&ids, false).unwrap(), "what is the weather");
        assert_eq!(
            tok.encode_batch(&["in boston"], &EncodeOptions::default()).unwrap()[0].get_ids(),
            &[8, 9]
        );
    }
}
