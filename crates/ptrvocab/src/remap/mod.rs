//! # Id Remapping
//!
//! Conversion between the full vocabulary id space and the compact
//! restricted output vocabulary a pointer-generator decoder predicts over.

pub mod index_remapper;

#[doc(inline)]
pub use index_remapper::{
    IndexRemapper,
    NUM_STRUCTURAL_TOKENS,
    RESTRICTED_LAYOUT_VERSION,
    RestrictedSection,
};
