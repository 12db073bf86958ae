//! # Dataset Kinds

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PVResult, errors::PtrVocabError};

/// Supported semantic-parsing datasets.
///
/// The dataset kind selects how the ontology source is interpreted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[non_exhaustive]
pub enum DatasetKind {
    /// The TOPv2 task-oriented parsing dataset.
    #[strum(to_string = "TOPv2", serialize = "topv2")]
    #[serde(rename = "TOPv2")]
    TopV2,
}

impl DatasetKind {
    /// Parse a dataset selector.
    ///
    /// ## Errors
    /// [`PtrVocabError::Configuration`] for any unsupported name.
    pub fn parse(name: &str) -> PVResult<Self> {
        Self::from_str(name).map_err(|_| {
            PtrVocabError::Configuration(format!("{name} is an unsupported dataset"))
        })
    }
}
