//! # Vocabulary Store IO
//!
//! A saved store is a directory holding the subword tokenizer
//! (`tokenizer.json`, including every extension token with its id)
//! and a manifest (`vocab_store.json`) recording the structural token
//! names and the extension order.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::{
    PVResult,
    errors::PtrVocabError,
    vocab::{StructuralTokenNames, VocabularyStore},
};

/// File name of the saved subword tokenizer.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// File name of the saved store manifest.
pub const STORE_MANIFEST_FILE: &str = "vocab_store.json";

/// Current manifest format version.
pub const STORE_MANIFEST_VERSION: u32 = 1;

/// Serialized store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Manifest format version.
    pub version: u32,

    /// Structural token names.
    pub structural: StructuralTokenNames,

    /// Extension tokens, in registration order.
    pub extension: Vec<String>,

    /// Was the store frozen when saved?
    pub frozen: bool,
}

impl StoreManifest {
    /// Describe a store.
    pub fn of(store: &VocabularyStore) -> Self {
        Self {
            version: STORE_MANIFEST_VERSION,
            structural: store.structural_names().clone(),
            extension: store.extension_tokens().to_vec(),
            frozen: store.is_frozen(),
        }
    }
}

/// Write a JSON value to a file.
pub(crate) fn write_json_path<V: Serialize>(
    value: &V,
    path: impl AsRef<Path>,
) -> PVResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON value from a file.
pub(crate) fn read_json_path<V: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> PVResult<V> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PtrVocabError::Data(format!("cannot open {}: {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PtrVocabError::Data(format!("malformed {}: {e}", path.display())))
}

impl VocabularyStore {
    /// Save the store to a directory.
    ///
    /// Creates the directory if needed; existing files are overwritten.
    pub fn save(
        &self,
        dir: impl AsRef<Path>,
    ) -> PVResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        self.tokenizer().save(dir.join(TOKENIZER_FILE), false)?;
        write_json_path(&StoreManifest::of(self), dir.join(STORE_MANIFEST_FILE))?;

        log::info!("Saved vocabulary store to {}", dir.display());
        Ok(())
    }

    /// Load a store saved by [`save`](Self::save).
    ///
    /// Token ids are reproduced exactly, and the frozen state is restored.
    pub fn load(dir: impl AsRef<Path>) -> PVResult<Self> {
        let dir = dir.as_ref();

        let manifest: StoreManifest = read_json_path(dir.join(STORE_MANIFEST_FILE))?;
        if manifest.version != STORE_MANIFEST_VERSION {
            return Err(PtrVocabError::Data(format!(
                "unsupported vocabulary store manifest version: {}",
                manifest.version
            )));
        }

        let tokenizer = load_tokenizer_path(dir.join(TOKENIZER_FILE))?;

        VocabularyStore::from_saved_parts(
            tokenizer,
            manifest.structural,
            manifest.extension,
            manifest.frozen,
        )
    }
}

/// Load a `tokenizer.json` file.
pub fn load_tokenizer_path(path: impl AsRef<Path>) -> PVResult<Tokenizer> {
    let path = path.as_ref();
    Tokenizer::from_file(path).map_err(|e| {
        PtrVocabError::Data(format!("cannot load tokenizer {}: {e}", path.display()))
    })
}
