//! # Pointer Tokenizer Options
//!
//! Configuration for building a [`PointerTokenizer`](crate::PointerTokenizer),
//! and the extension phase that appends ontology and pointer tokens
//! to a [`VocabularyStore`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    PVResult,
    errors::PtrVocabError,
    ontology::{DatasetKind, OntologyIndex, OntologyRegistry},
    pointers::{DEFAULT_POINTER_PREFIX, PointerIndex, PointerVocab},
    vocab::VocabularyStore,
};

/// The default pretrained vocabulary.
pub const DEFAULT_PRETRAINED: &str = "facebook/bart-base";

/// The default span-closing delimiter.
pub const DEFAULT_SPAN_CLOSE_TOKEN: &str = "]";

/// Options for [`PointerTokenizer`](crate::PointerTokenizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerTokenizerOptions {
    /// Pretrained identifier, or a local directory holding a `tokenizer.json`.
    pub pretrained: String,

    /// Dataset selector; see [`DatasetKind`].
    pub dataset: String,

    /// Path of the JSON ontology source.
    pub ontology_path: PathBuf,

    /// Number of pointer tokens.
    ///
    /// When `None`, the base vocabulary's model max length is used.
    pub max_seq_len: Option<usize>,

    /// The span-closing delimiter token.
    pub span_close_token: String,

    /// Prefix of the pointer tokens.
    pub pointer_prefix: String,

    /// Build the restricted output vocabulary remapper.
    pub pointer_remap: bool,
}

impl Default for PointerTokenizerOptions {
    fn default() -> Self {
        Self {
            pretrained: DEFAULT_PRETRAINED.to_string(),
            dataset: DatasetKind::TopV2.to_string(),
            ontology_path: PathBuf::new(),
            max_seq_len: None,
            span_close_token: DEFAULT_SPAN_CLOSE_TOKEN.to_string(),
            pointer_prefix: DEFAULT_POINTER_PREFIX.to_string(),
            pointer_remap: true,
        }
    }
}

/// The tokens appended to a store by [`PointerTokenizerOptions::extend`].
#[derive(Debug, Clone)]
pub struct Extension {
    /// The registered ontology.
    pub ontology: OntologyRegistry,

    /// The ontology ids.
    pub ontology_index: OntologyIndex,

    /// The registered pointer vocabulary.
    pub pointers: PointerVocab,

    /// The pointer ids.
    pub pointer_index: PointerIndex,
}

impl PointerTokenizerOptions {
    /// Create options for a pretrained vocabulary and ontology source.
    pub fn new<P: AsRef<Path>>(
        pretrained: &str,
        ontology_path: P,
    ) -> Self {
        Self::default()
            .with_pretrained(pretrained)
            .with_ontology_path(ontology_path)
    }

    /// Set the pretrained identifier.
    pub fn with_pretrained(
        mut self,
        pretrained: &str,
    ) -> Self {
        self.pretrained = pretrained.to_string();
        self
    }

    /// Set the dataset selector.
    pub fn with_dataset(
        mut self,
        dataset: &str,
    ) -> Self {
        self.dataset = dataset.to_string();
        self
    }

    /// Set the ontology source path.
    pub fn with_ontology_path<P: AsRef<Path>>(
        mut self,
        ontology_path: P,
    ) -> Self {
        self.ontology_path = ontology_path.as_ref().to_path_buf();
        self
    }

    /// Set the number of pointer tokens.
    pub fn with_max_seq_len(
        mut self,
        max_seq_len: Option<usize>,
    ) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Set the span-closing delimiter.
    pub fn with_span_close_token(
        mut self,
        span_close_token: &str,
    ) -> Self {
        self.span_close_token = span_close_token.to_string();
        self
    }

    /// Set the pointer token prefix.
    pub fn with_pointer_prefix(
        mut self,
        pointer_prefix: &str,
    ) -> Self {
        self.pointer_prefix = pointer_prefix.to_string();
        self
    }

    /// Enable or disable the pointer remapper.
    pub fn with_pointer_remap(
        mut self,
        pointer_remap: bool,
    ) -> Self {
        self.pointer_remap = pointer_remap;
        self
    }

    /// Parse the dataset selector.
    pub fn dataset_kind(&self) -> PVResult<DatasetKind> {
        DatasetKind::parse(&self.dataset)
    }

    /// Resolve the pointer vocabulary.
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] if neither `max_seq_len` nor
    /// `model_max_length` is known, or the length is zero.
    pub fn pointer_vocab(
        &self,
        model_max_length: Option<usize>,
    ) -> PVResult<PointerVocab> {
        let max_seq_len = self.max_seq_len.or(model_max_length).ok_or_else(|| {
            PtrVocabError::Configuration(format!(
                "max_seq_len is unset, and {} has no model max length",
                self.pretrained
            ))
        })?;
        PointerVocab::with_prefix(&self.pointer_prefix, max_seq_len)
    }

    /// Load the ontology source.
    ///
    /// The dataset selector is validated before the source is read.
    pub fn load_ontology(&self) -> PVResult<OntologyRegistry> {
        self.dataset_kind()?;
        OntologyRegistry::load(&self.ontology_path, &self.span_close_token)
    }

    /// Run the extension phase on `store`.
    ///
    /// Appends the ontology tokens, then the pointer tokens, and freezes
    /// the store. All configuration and data errors are raised before the
    /// store is modified; on error the store is unchanged.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(store)))]
    pub fn extend(
        &self,
        store: &mut VocabularyStore,
        model_max_length: Option<usize>,
    ) -> PVResult<Extension> {
        self.dataset_kind()?;
        let pointers = self.pointer_vocab(model_max_length)?;
        store.check_extendable()?;

        let ontology = self.load_ontology()?;
        extend_store(store, ontology, pointers)
    }

    /// Run the extension phase with an already parsed ontology.
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] if the ontology's span-close token
    /// differs from `span_close_token`.
    pub fn extend_with_ontology(
        &self,
        store: &mut VocabularyStore,
        ontology: OntologyRegistry,
        model_max_length: Option<usize>,
    ) -> PVResult<Extension> {
        self.dataset_kind()?;
        let pointers = self.pointer_vocab(model_max_length)?;
        if ontology.span_close_token() != self.span_close_token {
            return Err(PtrVocabError::Configuration(format!(
                "ontology span-close token {:?} does not match {:?}",
                ontology.span_close_token(),
                self.span_close_token
            )));
        }
        extend_store(store, ontology, pointers)
    }
}

/// Append ontology tokens, then pointer tokens, and freeze the store.
///
/// Every token is validated before the first one is added.
pub fn extend_store(
    store: &mut VocabularyStore,
    ontology: OntologyRegistry,
    pointers: PointerVocab,
) -> PVResult<Extension> {
    let mut tokens = ontology.ontology_tokens();
    tokens.extend(pointers.generate());
    store.check_can_add(&tokens)?;

    let structural = store.structural_ids();
    if let Some(token) = tokens
        .iter()
        .find(|t| store.id_of(t).is_some_and(|id| structural.contains(id)))
    {
        return Err(PtrVocabError::Data(format!(
            "extension token {token:?} is a structural token"
        )));
    }

    let ontology_index = ontology.register(store)?;
    let pointer_index = pointers.register(store)?;
    store.freeze();

    Ok(Extension {
        ontology,
        ontology_index,
        pointers,
        pointer_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TokenId,
        testing::{TEST_ONTOLOGY_JSON, build_test_ontology, build_test_store},
    };

    #[test]
    fn test_defaults() {
        let options = PointerTokenizerOptions::default();
        assert_eq!(options.pretrained, "facebook/bart-base");
        assert_eq!(options.dataset_kind().unwrap(), DatasetKind::TopV2);
        assert_eq!(options.span_close_token, "]");
        assert_eq!(options.pointer_prefix, "@ptr");
        assert!(options.pointer_remap);
        assert_eq!(options.max_seq_len, None);
    }

    #[test]
    fn test_serde() {
        let options = PointerTokenizerOptions::new("bart-large", "/data/ontology.json")
            .with_max_seq_len(Some(64))
            .with_pointer_remap(false);

        let json = serde_json::to_string(&options).unwrap();
        let parsed: PointerTokenizerOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);

        let partial: PointerTokenizerOptions =
            serde_json::from_str(r#"{"max_seq_len": 16}"#).unwrap();
        assert_eq!(partial.max_seq_len, Some(16));
        assert_eq!(partial.pretrained, DEFAULT_PRETRAINED);
    }

    #[test]
    fn test_pointer_vocab_resolution() {
        let options = PointerTokenizerOptions::default();
        assert_eq!(options.pointer_vocab(Some(1024)).unwrap().max_seq_len(), 1024);
        assert!(matches!(
            options.pointer_vocab(None),
            Err(PtrVocabError::Configuration(_))
        ));

        let options = options.with_max_seq_len(Some(8));
        assert_eq!(options.pointer_vocab(Some(1024)).unwrap().max_seq_len(), 8);

        let options = options.with_max_seq_len(Some(0));
        assert!(options.pointer_vocab(Some(1024)).is_err());
    }

    #[test]
    fn test_extend_with_ontology() {
        let options = PointerTokenizerOptions::default().with_max_seq_len(Some(8));
        let mut store = build_test_store();
        let base = store.vocab_size();

        let ext = options
            .extend_with_ontology(&mut store, build_test_ontology().unwrap(), None)
            .unwrap();

        assert!(store.is_frozen());
        assert_eq!(store.vocab_size(), base + 5 + 8);
        assert_eq!(ext.ontology_index.ontology_ids().len(), 5);

        let base = base as TokenId;
        let expected = (base + 5..base + 13).collect::<Vec<_>>();
        assert_eq!(ext.pointer_index.ids(), expected.as_slice());
    }

    #[test]
    fn test_unsupported_dataset_leaves_store_unchanged() {
        let options = PointerTokenizerOptions::default()
            .with_dataset("FOO")
            .with_max_seq_len(Some(8));
        let mut store = build_test_store();
        let base = store.vocab_size();

        assert!(matches!(
            options.extend(&mut store, None),
            Err(PtrVocabError::Configuration(_))
        ));
        assert!(matches!(
            options.extend_with_ontology(&mut store, build_test_ontology().unwrap(), None),
            Err(PtrVocabError::Configuration(_))
        ));
        assert_eq!(store.vocab_size(), base);
        assert!(!store.is_frozen());
    }

    #[test]
    fn test_extend_from_file() {
        tempdir::TempDir::new("options_extend")
            .and_then(|dir| {
                let path = dir.path().join("ontology.json");
                std::fs::write(&path, TEST_ONTOLOGY_JSON)?;

                let options = PointerTokenizerOptions::new("unused", &path).with_max_seq_len(Some(4));
                let mut store = build_test_store();
                let ext = options.extend(&mut store, None).unwrap();
                assert_eq!(ext.ontology.ontology_vocab_size(), 5);
                assert_eq!(ext.pointer_index.len(), 4);

                dir.close()
            })
            .unwrap();
    }

    #[test]
    fn test_missing_ontology_leaves_store_unchanged() {
        let options = PointerTokenizerOptions::new("unused", "/nonexistent/ontology.json")
            .with_max_seq_len(Some(4));
        let mut store = build_test_store();
        let base = store.vocab_size();

        assert!(matches!(
            options.extend(&mut store, None),
            Err(PtrVocabError::Data(_))
        ));
        assert_eq!(store.vocab_size(), base);
        assert!(!store.is_frozen());
    }

    #[test]
    fn test_pointer_ontology_collision_leaves_store_unchanged() {
        let ontology = OntologyRegistry::from_json_str(
            r#"{"a": {"intents": ["@ptr1"], "slots": []}}"#,
            "]",
        )
        .unwrap();
        let options = PointerTokenizerOptions::default().with_max_seq_len(Some(4));
        let mut store = build_test_store();
        let base = store.vocab_size();

        assert!(matches!(
            options.extend_with_ontology(&mut store, ontology, None),
            Err(PtrVocabError::State(_))
        ));
        assert_eq!(store.vocab_size(), base);
        assert!(store.extension_tokens().is_empty());
    }

    #[test]
    fn test_structural_collision_leaves_store_unchanged() {
        let ontology = OntologyRegistry::from_json_str(
            r#"{"a": {"intents": ["<unk>"], "slots": []}}"#,
            "]",
        )
        .unwrap();
        let options = PointerTokenizerOptions::default().with_max_seq_len(Some(4));
        let mut store = build_test_store();
        let base = store.vocab_size();

        assert!(matches!(
            options.extend_with_ontology(&mut store, ontology, None),
            Err(PtrVocabError::Data(_))
        ));
        assert_eq!(store.vocab_size(), base);
    }

    #[test]
    fn test_frozen_store() {
        let options = PointerTokenizerOptions::default().with_max_seq_len(Some(4));
        let mut store = build_test_store();
        store.freeze();
        assert!(matches!(
            options.extend_with_ontology(&mut store, build_test_ontology().unwrap(), None),
            Err(PtrVocabError::State(_))
        ));
    }
}
