//! # Vocabulary
//!
//! The owned, append-only subword vocabulary and its io.
//!
//! * [`VocabularyStore`] - base tokenizer plus ordered extension tokens.
//! * [`StructuralTokenNames`] / [`StructuralIds`] - begin, end, pad, unknown.
//! * [`EncodeOptions`] - per-call padding and truncation.

pub mod encode_options;
pub mod io;
pub mod structural;
pub mod vocab_store;

#[doc(inline)]
pub use encode_options::{EncodeOptions, PaddingPolicy, TruncationPolicy};
#[doc(inline)]
pub use io::{STORE_MANIFEST_FILE, StoreManifest, TOKENIZER_FILE, load_tokenizer_path};
#[doc(inline)]
pub use structural::{StructuralIds, StructuralTokenNames};
#[doc(inline)]
pub use vocab_store::VocabularyStore;
