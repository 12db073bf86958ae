//! # Saved Pointer Tokenizers
//!
//! A saved tokenizer directory holds the vocabulary store
//! (see [`crate::vocab::io`]), the ontology, and the resolved options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    PVResult,
    errors::PtrVocabError,
    ontology::OntologyRegistry,
    pointers::PointerVocab,
    remap::RESTRICTED_LAYOUT_VERSION,
    tokenizer::{Extension, PointerTokenizer, PointerTokenizerOptions},
    vocab::{
        VocabularyStore,
        io::{read_json_path, write_json_path},
    },
};

/// File name of the saved ontology.
pub const ONTOLOGY_FILE: &str = "ontology.json";

/// File name of the saved pointer tokenizer config.
pub const POINTER_CONFIG_FILE: &str = "pointer_tokenizer.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedPointerConfig {
    layout_version: u32,
    options: PointerTokenizerOptions,
}

impl PointerTokenizer {
    /// Save to a directory.
    ///
    /// Creates the directory if needed; existing files are overwritten.
    pub fn save_pretrained(
        &self,
        dir: impl AsRef<Path>,
    ) -> PVResult<()> {
        let dir = dir.as_ref();
        self.store().save(dir)?;

        std::fs::write(dir.join(ONTOLOGY_FILE), self.ontology().to_json_string()?)?;

        let mut options = self.options().clone();
        options.ontology_path = ONTOLOGY_FILE.into();
        write_json_path(
            &SavedPointerConfig {
                layout_version: RESTRICTED_LAYOUT_VERSION,
                options,
            },
            dir.join(POINTER_CONFIG_FILE),
        )
    }

    /// Load a tokenizer saved by [`save_pretrained`](Self::save_pretrained).
    ///
    /// Ids and remap tables are rebuilt from the saved store; nothing is
    /// re-registered.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if the files are missing, the layout version
    /// is unsupported, or the saved extension does not match the saved
    /// ontology and pointer vocabulary.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn from_saved(dir: impl AsRef<Path>) -> PVResult<Self> {
        let dir = dir.as_ref();

        let config: SavedPointerConfig = read_json_path(dir.join(POINTER_CONFIG_FILE))?;
        if config.layout_version != RESTRICTED_LAYOUT_VERSION {
            return Err(PtrVocabError::Data(format!(
                "unsupported restricted vocabulary layout version: {}",
                config.layout_version
            )));
        }

        let mut options = config.options;
        options.ontology_path = dir.join(ONTOLOGY_FILE);
        options.dataset_kind()?;

        let store = VocabularyStore::load(dir)?;
        let ontology = OntologyRegistry::load(&options.ontology_path, &options.span_close_token)?;
        let pointers = options.pointer_vocab(None)?;
        check_saved_extension(&store, &ontology, &pointers)?;

        let extension = Extension {
            ontology_index: ontology.index(&store)?,
            pointer_index: pointers.index(&store)?,
            ontology,
            pointers,
        };
        Self::from_extension(store, options, extension)
    }
}

fn check_saved_extension(
    store: &VocabularyStore,
    ontology: &OntologyRegistry,
    pointers: &PointerVocab,
) -> PVResult<()> {
    let mut expected = ontology.ontology_tokens();
    expected.extend(pointers.generate());

    if store.extension_tokens() != expected.as_slice() {
        return Err(PtrVocabError::Data(
            "the saved vocabulary extension does not match the saved ontology and pointers"
                .to_string(),
        ));
    }
    Ok(())
}
