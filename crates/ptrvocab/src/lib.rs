//! # `ptrvocab` Pointer-Generator Vocabulary Extension
//!
//! Extends a pretrained subword vocabulary with the tokens a
//! pointer-generator semantic parser predicts: the intents and slots of
//! a domain ontology, a span-closing delimiter, and one positional pointer
//! token per input position. Converts between the full vocabulary id
//! space and the compact restricted output vocabulary
//! (``pointers ++ ontology ++ [end, begin, pad, unknown]``).
//!
//! See:
//! * [`vocab`] for the append-only [`vocab::VocabularyStore`].
//! * [`ontology`] to load intents and slots.
//! * [`pointers`] for positional pointer tokens.
//! * [`remap`] for the forward/inverse id maps.
//! * [`tokenizer`] for the [`PointerTokenizer`] facade.
//! * [`pretrained`] for known base vocabularies.
//!
//! ## Building a Pointer Tokenizer
//!
//! ```rust,ignore
//! use ptrvocab::{EncodeOptions, PaddingPolicy, PointerTokenizer, PointerTokenizerOptions};
//!
//! let options = PointerTokenizerOptions::new("facebook/bart-base", "topv2/ontology.json")
//!     .with_max_seq_len(Some(256));
//! let tokenizer = PointerTokenizer::from_options(&options)?;
//!
//! let batch = tokenizer.batch_encode_to_pointer_space(
//!     &["IN:GET_WEATHER SL:LOCATION @ptr5 ] ]"],
//!     &EncodeOptions::default().with_padding(PaddingPolicy::Longest),
//! )?;
//! let text = tokenizer.batch_decode_from_pointer_space(&batch.ids, true)?;
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

#[cfg(feature = "download")]
#[doc(inline)]
pub use ptrvocab_disk_cache as disk_cache;

pub mod errors;
pub mod ontology;
pub mod pointers;
pub mod pretrained;
pub mod remap;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[doc(inline)]
pub use errors::{PVResult, PtrVocabError};
#[doc(inline)]
pub use ontology::{DatasetKind, OntologyRegistry};
#[doc(inline)]
pub use pointers::PointerVocab;
#[doc(inline)]
pub use remap::IndexRemapper;
#[doc(inline)]
pub use tokenizer::{LazyPointerTokenizer, PointerBatch, PointerTokenizer, PointerTokenizerOptions};
#[doc(inline)]
pub use types::{CompactId, TokenId};
#[doc(inline)]
pub use vocab::{EncodeOptions, PaddingPolicy, TruncationPolicy, VocabularyStore};
