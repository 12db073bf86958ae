//! # Pointer Tokens
//!
//! Positional placeholder tokens used by pointer-generator decoding
//! to copy input positions rather than generate subwords.

pub mod pointer_vocab;

#[doc(inline)]
pub use pointer_vocab::{DEFAULT_POINTER_PREFIX, PointerIndex, PointerVocab};
