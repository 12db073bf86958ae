//! # Pretrained Vocabularies
//!
//! Known pretrained subword vocabularies, and loading by identifier
//! or local directory.

pub mod load_by_name;
pub mod tokenizer_config;

#[doc(inline)]
pub use load_by_name::{
    LoadedVocab,
    PretrainedModel,
    list_models,
    load_vocab,
    load_vocab_dir,
    resolve_pretrained,
};
#[doc(inline)]
pub use tokenizer_config::{TOKENIZER_CONFIG_FILE, TokenizerConfig};
