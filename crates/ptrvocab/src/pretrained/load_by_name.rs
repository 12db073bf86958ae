//! # Pretrained Vocabulary Loading

use std::path::Path;

#[cfg(feature = "download")]
use crate::disk_cache::PtrVocabDiskCache;
use crate::{
    PVResult,
    errors::PtrVocabError,
    pretrained::TokenizerConfig,
    vocab::{
        STORE_MANIFEST_FILE,
        StructuralTokenNames,
        TOKENIZER_FILE,
        VocabularyStore,
        load_tokenizer_path,
    },
};

/// A known pretrained subword vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PretrainedModel {
    /// The aliases for the model; the first is the primary name.
    pub aliases: &'static [&'static str],

    /// Mirror URLs for the model's `tokenizer.json`.
    pub tokenizer_urls: &'static [&'static str],

    /// Structural token names: ``[begin, end, pad, unknown]``.
    pub structural: [&'static str; 4],

    /// The model's maximum input length.
    pub model_max_length: usize,
}

impl PretrainedModel {
    /// The primary model name.
    pub fn name(&self) -> &'static str {
        self.aliases[0]
    }

    /// The structural token names.
    pub fn structural_names(&self) -> StructuralTokenNames {
        let [begin, end, pad, unknown] = self.structural;
        StructuralTokenNames::new(begin, end, pad, unknown)
    }

    /// Cache sub-directories for this model's files.
    pub fn cache_context(&self) -> Vec<&'static str> {
        self.name().split('/').collect()
    }
}

const BART_STRUCTURAL: [&str; 4] = ["<s>", "</s>", "<pad>", "<unk>"];

const PRETRAINED_MODELS: &[PretrainedModel] = &[
    PretrainedModel {
        aliases: &["facebook/bart-base", "bart-base"],
        tokenizer_urls: &["https://huggingface.co/facebook/bart-base/resolve/main/tokenizer.json"],
        structural: BART_STRUCTURAL,
        model_max_length: 1024,
    },
    PretrainedModel {
        aliases: &["facebook/bart-large", "bart-large"],
        tokenizer_urls: &["https://huggingface.co/facebook/bart-large/resolve/main/tokenizer.json"],
        structural: BART_STRUCTURAL,
        model_max_length: 1024,
    },
];

/// Resolve a pretrained model by name or alias.
///
/// ## Errors
/// [`PtrVocabError::Configuration`] for an unknown identifier.
pub fn resolve_pretrained(name: &str) -> PVResult<&'static PretrainedModel> {
    PRETRAINED_MODELS
        .iter()
        .find(|model| model.aliases.contains(&name))
        .ok_or_else(|| {
            PtrVocabError::Configuration(format!("unknown pretrained vocabulary: {name}"))
        })
}

/// List the available pretrained models.
///
/// ## Arguments
/// * `aliases` - Whether to include all aliases or just the primary names.
pub fn list_models(aliases: bool) -> Vec<String> {
    let mut models = Vec::new();
    for model in PRETRAINED_MODELS {
        if aliases {
            models.extend(model.aliases.iter().map(|a| a.to_string()));
        } else {
            models.push(model.name().to_string());
        }
    }
    models
}

/// A loaded base vocabulary.
#[derive(Debug)]
pub struct LoadedVocab {
    /// The vocabulary store.
    ///
    /// Frozen when loaded from a saved store directory.
    pub store: VocabularyStore,

    /// The model's maximum input length, when known.
    pub model_max_length: Option<usize>,
}

/// Load a base vocabulary from a local directory.
///
/// A directory holding a saved store manifest loads as that (frozen) store;
/// otherwise its `tokenizer.json` is loaded as a fresh base vocabulary,
/// with names and limits from an optional `tokenizer_config.json`.
pub fn load_vocab_dir(dir: impl AsRef<Path>) -> PVResult<LoadedVocab> {
    let dir = dir.as_ref();
    let config = TokenizerConfig::load_dir(dir)?;
    let model_max_length = config.as_ref().and_then(|c| c.model_max_length);

    if dir.join(STORE_MANIFEST_FILE).exists() {
        return Ok(LoadedVocab {
            store: VocabularyStore::load(dir)?,
            model_max_length,
        });
    }

    let tokenizer = load_tokenizer_path(dir.join(TOKENIZER_FILE))?;
    let structural = config.map(|c| c.structural).unwrap_or_default();
    Ok(LoadedVocab {
        store: VocabularyStore::from_tokenizer(tokenizer, structural)?,
        model_max_length,
    })
}

/// Load a base vocabulary by pretrained identifier, or local directory.
///
/// Pretrained resources are downloaded into, and read from, `disk_cache`.
///
/// ## Errors
/// [`PtrVocabError::Configuration`] if `name` is neither a directory nor
/// a known pretrained identifier.
#[cfg(feature = "download")]
pub fn load_vocab(
    name: &str,
    disk_cache: &mut PtrVocabDiskCache,
) -> PVResult<LoadedVocab> {
    if Path::new(name).is_dir() {
        return load_vocab_dir(name);
    }

    let model = resolve_pretrained(name)?;
    let path = disk_cache
        .load_cached_path(&model.cache_context(), model.tokenizer_urls, true)
        .map_err(|e| PtrVocabError::External(format!("{e:#}")))?;

    log::info!("Loading {} from {}", model.name(), path.display());
    let tokenizer = load_tokenizer_path(&path)?;
    Ok(LoadedVocab {
        store: VocabularyStore::from_tokenizer(tokenizer, model.structural_names())?,
        model_max_length: Some(model.model_max_length),
    })
}

/// Load a base vocabulary from a local directory.
///
/// Without the "download" feature only local directories are supported.
#[cfg(not(feature = "download"))]
pub fn load_vocab(name: &str) -> PVResult<LoadedVocab> {
    if Path::new(name).is_dir() {
        return load_vocab_dir(name);
    }
    resolve_pretrained(name)?;
    Err(PtrVocabError::Configuration(format!(
        "{name} requires the \"download\" feature"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_test_store;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve_pretrained("bart-base").unwrap().name(), "facebook/bart-base");
        assert_eq!(
            resolve_pretrained("facebook/bart-large").unwrap().model_max_length,
            1024
        );
        assert!(matches!(
            resolve_pretrained("gpt-17"),
            Err(PtrVocabError::Configuration(_))
        ));
    }

    #[test]
    fn test_list_models() {
        assert_eq!(
            list_models(false),
            vec!["facebook/bart-base", "facebook/bart-large"]
        );
        assert_eq!(list_models(true).len(), 4);
    }

    #[test]
    fn test_model_metadata() {
        let model = resolve_pretrained("bart-base").unwrap();
        assert_eq!(model.structural_names(), StructuralTokenNames::default());
        assert_eq!(model.cache_context(), vec!["facebook", "bart-base"]);
    }

    #[test]
    fn test_load_vocab_dir() {
        let store = build_test_store();

        tempdir::TempDir::new("pretrained_dir")
            .and_then(|dir| {
                store.tokenizer().save(dir.path().join(TOKENIZER_FILE), false).unwrap();
                std::fs::write(
                    dir.path().join("tokenizer_config.json"),
                    r#"{"model_max_length": 32}"#,
                )?;

                let loaded = load_vocab_dir(dir.path()).unwrap();
                assert!(!loaded.store.is_frozen());
                assert_eq!(loaded.model_max_length, Some(32));
                assert_eq!(loaded.store.vocab_size(), store.vocab_size());

                dir.close()
            })
            .unwrap();
    }

    #[test]
    fn test_load_vocab_dir_saved_store() {
        let mut store = build_test_store();
        store.add_tokens(&["GET_WEATHER"]).unwrap();
        store.freeze();

        tempdir::TempDir::new("pretrained_saved")
            .and_then(|dir| {
                store.save(dir.path()).unwrap();
                let loaded = load_vocab_dir(dir.path()).unwrap();
                assert!(loaded.store.is_frozen());
                assert_eq!(loaded.model_max_length, None);
                assert_eq!(loaded.store.id_of("GET_WEATHER"), store.id_of("GET_WEATHER"));
                dir.close()
            })
            .unwrap();
    }
}
