//! # Pointer Tokenizer
//!
//! The user-facing facade.
//!
//! * [`PointerTokenizerOptions`] - configuration, and the extension phase.
//! * [`PointerTokenizer`] - the frozen, extended vocabulary, with
//!   pointer-space batch encode/decode.
//! * [`LazyPointerTokenizer`] - one-time shared initialization.

pub mod lazy;
pub mod options;
pub mod pointer_tokenizer;
pub mod saved;

#[doc(inline)]
pub use lazy::LazyPointerTokenizer;
#[doc(inline)]
pub use options::{
    DEFAULT_PRETRAINED,
    DEFAULT_SPAN_CLOSE_TOKEN,
    Extension,
    PointerTokenizerOptions,
    extend_store,
};
#[doc(inline)]
pub use pointer_tokenizer::{PointerBatch, PointerTokenizer};
#[doc(inline)]
pub use saved::{ONTOLOGY_FILE, POINTER_CONFIG_FILE};
