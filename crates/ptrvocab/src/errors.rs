//! # Error Types

/// Errors from ptrvocab operations.
#[derive(Debug, thiserror::Error)]
pub enum PtrVocabError {
    /// Invalid or unsupported configuration.
    ///
    /// Raised during initialization, before any vocabulary mutation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ontology or saved vocabulary data is missing or malformed.
    #[error("data error: {0}")]
    Data(String),

    /// A lifecycle contract was violated.
    ///
    /// Extending a frozen store, building remap tables before the store
    /// is frozen, or using pointer-space operations without a remapper.
    #[error("state error: {0}")]
    State(String),

    /// A transform received an id outside its domain.
    #[error("{space} id {id} at position {position} is outside the {domain}")]
    Lookup {
        /// The id space the value was read from.
        space: &'static str,

        /// The offending id.
        id: u32,

        /// The position of the id in the input row.
        position: usize,

        /// Description of the valid domain.
        domain: &'static str,
    },

    /// Error from the subword tokenizer.
    #[error("tokenizer error: {0}")]
    Tokenizers(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

impl From<tokenizers::Error> for PtrVocabError {
    fn from(err: tokenizers::Error) -> Self {
        PtrVocabError::Tokenizers(err.to_string())
    }
}

/// Result type for ptrvocab operations.
pub type PVResult<T> = core::result::Result<T, PtrVocabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message() {
        let err = PtrVocabError::Lookup {
            space: "vocabulary",
            id: 17,
            position: 3,
            domain: "restricted output vocabulary",
        };
        assert_eq!(
            err.to_string(),
            "vocabulary id 17 at position 3 is outside the restricted output vocabulary"
        );
    }

    #[test]
    fn test_tokenizers_conversion() {
        let inner: tokenizers::Error = "boom".into();
        let err: PtrVocabError = inner.into();
        assert!(matches!(err, PtrVocabError::Tokenizers(ref msg) if msg == "boom"));
    }
}
