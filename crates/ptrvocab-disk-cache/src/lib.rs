//! # ptrvocab-disk-cache
//!
//! Local storage for pretrained vocabulary resources.
#![warn(missing_docs)]

pub mod cache_dir;
pub mod disk_cache;

pub use cache_dir::{CacheDirResolver, PTRVOCAB_CACHE_DIRS};
pub use disk_cache::{PtrVocabDiskCache, PtrVocabDiskCacheOptions};

/// Environment variable key to override the default cache directory.
pub const PTRVOCAB_CACHE_DIR: &str = "PTRVOCAB_CACHE_DIR";
