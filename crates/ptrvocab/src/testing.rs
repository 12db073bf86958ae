//! # Test Utilities
//!
//! Small offline fixtures: a word-level base tokenizer and a byte-level BPE
//! base tokenizer, both with BART-style structural tokens, and a two-domain
//! ontology.

use core::str::FromStr;

use serde_json::json;
use tokenizers::Tokenizer;

use crate::{
    PVResult,
    ontology::OntologyRegistry,
    vocab::{StructuralTokenNames, VocabularyStore},
};

/// Words in the fixture base vocabulary, after the four structural tokens.
pub const TEST_WORDS: &[&str] = &[
    "what", "is", "the", "weather", "in", "boston", "set", "an", "alarm", "for", "tomorrow",
    "at", "seven",
];

/// The two-domain fixture ontology.
pub const TEST_ONTOLOGY_JSON: &str = r#"{
    "weather": {"intents": ["GET_WEATHER"], "slots": ["LOCATION"]},
    "alarm": {"intents": ["SET_ALARM"], "slots": ["DATE_TIME"]}
}"#;

const STRUCTURAL: [&str; 4] = ["<s>", "<pad>", "</s>", "<unk>"];

fn structural_vocab(
    words: &[&str],
) -> (serde_json::Map<String, serde_json::Value>, Vec<serde_json::Value>) {
    let mut vocab = serde_json::Map::new();
    for (idx, word) in STRUCTURAL.iter().chain(words).enumerate() {
        vocab.insert(word.to_string(), json!(idx));
    }

    let added_tokens = STRUCTURAL
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            json!({
                "id": idx,
                "content": token,
                "single_word": false,
                "lstrip": false,
                "rstrip": false,
                "normalized": false,
                "special": true,
            })
        })
        .collect();

    (vocab, added_tokens)
}

/// Build the word-level fixture base [`Tokenizer`].
///
/// Ids: ``<s>=0, <pad>=1, </s>=2, <unk>=3``, then [`TEST_WORDS`] in order.
/// Whitespace is discarded, and no begin/end tokens are added.
pub fn build_test_tokenizer() -> Tokenizer {
    let (vocab, added_tokens) = structural_vocab(TEST_WORDS);

    let config = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "<unk>",
        },
    });

    Tokenizer::from_str(&config.to_string()).expect("fixture tokenizer")
}

/// Byte-level symbols in the BPE fixture vocabulary: the encoded space, then
/// the lowercase letters.
pub const TEST_BPE_SYMBOLS: &[&str] = &[
    "\u{120}", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p",
    "q", "r", "s", "t", "u", "v", "w", "x", "y", "z",
];

/// Build a byte-level BPE fixture base [`Tokenizer`], laid out like BART's.
///
/// Ids: ``<s>=0, <pad>=1, </s>=2, <unk>=3``, then [`TEST_BPE_SYMBOLS`] in
/// order. There are no merges, so words encode one letter per id. Spaces
/// survive pre-tokenization as `Ġ`, and encoding with special tokens wraps
/// the sequence in ``<s> .. </s>``.
pub fn build_test_bpe_tokenizer() -> Tokenizer {
    let (vocab, added_tokens) = structural_vocab(TEST_BPE_SYMBOLS);

    let config = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": null,
        "pre_tokenizer": {
            "type": "ByteLevel",
            "add_prefix_space": false,
            "trim_offsets": true,
            "use_regex": true,
        },
        "post_processor": {
            "type": "RobertaProcessing",
            "sep": ["</s>", 2],
            "cls": ["<s>", 0],
            "trim_offsets": true,
            "add_prefix_space": false,
        },
        "decoder": {
            "type": "ByteLevel",
            "add_prefix_space": true,
            "trim_offsets": true,
            "use_regex": true,
        },
        "model": {
            "type": "BPE",
            "dropout": null,
            "unk_token": null,
            "continuing_subword_prefix": null,
            "end_of_word_suffix": null,
            "fuse_unk": false,
            "byte_fallback": false,
            "ignore_merges": false,
            "vocab": vocab,
            "merges": [],
        },
    });

    Tokenizer::from_str(&config.to_string()).expect("fixture bpe tokenizer")
}

/// Build an unfrozen word-level fixture [`VocabularyStore`].
pub fn build_test_store() -> VocabularyStore {
    VocabularyStore::from_tokenizer(build_test_tokenizer(), StructuralTokenNames::default())
        .expect("fixture store")
}

/// Build an unfrozen byte-level BPE fixture [`VocabularyStore`].
pub fn build_test_bpe_store() -> VocabularyStore {
    VocabularyStore::from_tokenizer(build_test_bpe_tokenizer(), StructuralTokenNames::default())
        .expect("fixture bpe store")
}

/// Parse the fixture ontology.
pub fn build_test_ontology() -> PVResult<OntologyRegistry> {
    OntologyRegistry::from_json_str(TEST_ONTOLOGY_JSON, "]")
}
