//! # Ontology Registry
//!
//! Parses a per-domain ontology description into deduplicated intent
//! and slot token sets, plus the span-closing delimiter.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{PVResult, errors::PtrVocabError};

/// The serialized form of a single domain.
///
/// Both fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainRecord {
    intents: Vec<String>,
    slots: Vec<String>,
}

/// The intents and slots of a single domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyDomain {
    /// The domain name.
    pub name: String,

    /// The domain's intent tokens.
    pub intents: BTreeSet<String>,

    /// The domain's slot tokens.
    pub slots: BTreeSet<String>,
}

impl OntologyDomain {
    /// Create a new domain.
    pub fn new<I, S>(
        name: &str,
        intents: I,
        slots: S,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            name: name.to_string(),
            intents: intents.into_iter().map(Into::into).collect(),
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// The union of all loaded domains.
///
/// All derived token sets iterate in lexicographic order, so the ids
/// assigned when the ontology is registered are reproducible run to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyRegistry {
    domains: BTreeMap<String, OntologyDomain>,
    intents: BTreeSet<String>,
    slots: BTreeSet<String>,
    span_close_token: String,
}

impl OntologyRegistry {
    /// Build a registry from domains.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if a token is empty, a domain name repeats,
    /// or the span-close token is also an intent or slot.
    pub fn from_domains<D>(
        domains: D,
        span_close_token: &str,
    ) -> PVResult<Self>
    where
        D: IntoIterator<Item = OntologyDomain>,
    {
        if span_close_token.is_empty() {
            return Err(PtrVocabError::Data(
                "the span-close token must be non-empty".to_string(),
            ));
        }

        let mut by_name = BTreeMap::new();
        let mut intents = BTreeSet::new();
        let mut slots = BTreeSet::new();

        for domain in domains {
            if let Some(token) = domain.intents.iter().chain(&domain.slots).find(|t| t.is_empty()) {
                return Err(PtrVocabError::Data(format!(
                    "domain {:?} has an empty ontology token {token:?}",
                    domain.name
                )));
            }

            intents.extend(domain.intents.iter().cloned());
            slots.extend(domain.slots.iter().cloned());

            let name = domain.name.clone();
            if by_name.insert(name.clone(), domain).is_some() {
                return Err(PtrVocabError::Data(format!(
                    "domain {name:?} is defined more than once"
                )));
            }
        }

        if intents.contains(span_close_token) || slots.contains(span_close_token) {
            return Err(PtrVocabError::Data(format!(
                "span-close token {span_close_token:?} collides with an ontology token"
            )));
        }

        Ok(Self {
            domains: by_name,
            intents,
            slots,
            span_close_token: span_close_token.to_string(),
        })
    }

    /// Parse a JSON ontology: ``{ domain: { "intents": [..], "slots": [..] } }``.
    pub fn from_json_str(
        json: &str,
        span_close_token: &str,
    ) -> PVResult<Self> {
        let records: BTreeMap<String, DomainRecord> = serde_json::from_str(json)
            .map_err(|e| PtrVocabError::Data(format!("malformed ontology: {e}")))?;
        Self::from_records(records, span_close_token)
    }

    /// Parse a JSON ontology from a reader.
    pub fn from_reader<R: Read>(
        reader: R,
        span_close_token: &str,
    ) -> PVResult<Self> {
        let records: BTreeMap<String, DomainRecord> = serde_json::from_reader(reader)
            .map_err(|e| PtrVocabError::Data(format!("malformed ontology: {e}")))?;
        Self::from_records(records, span_close_token)
    }

    /// Load a JSON ontology file.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if the file is missing or malformed.
    pub fn load(
        path: impl AsRef<Path>,
        span_close_token: &str,
    ) -> PVResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PtrVocabError::Data(format!("cannot open ontology {}: {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(file), span_close_token)
    }

    fn from_records(
        records: BTreeMap<String, DomainRecord>,
        span_close_token: &str,
    ) -> PVResult<Self> {
        Self::from_domains(
            records
                .into_iter()
                .map(|(name, r)| OntologyDomain::new(&name, r.intents, r.slots)),
            span_close_token,
        )
    }

    /// Serialize back to the JSON ontology form.
    pub fn to_json_string(&self) -> PVResult<String> {
        let records = self
            .domains
            .iter()
            .map(|(name, d)| {
                (
                    name.clone(),
                    DomainRecord {
                        intents: d.intents.iter().cloned().collect(),
                        slots: d.slots.iter().cloned().collect(),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// The loaded domains, by name.
    pub fn domains(&self) -> &BTreeMap<String, OntologyDomain> {
        &self.domains
    }

    /// Look up a domain by name.
    pub fn domain(
        &self,
        name: &str,
    ) -> Option<&OntologyDomain> {
        self.domains.get(name)
    }

    /// The deduplicated intent tokens, in lexicographic order.
    pub fn intents(&self) -> &BTreeSet<String> {
        &self.intents
    }

    /// The deduplicated slot tokens, in lexicographic order.
    pub fn slots(&self) -> &BTreeSet<String> {
        &self.slots
    }

    /// The span-closing delimiter token.
    pub fn span_close_token(&self) -> &str {
        &self.span_close_token
    }

    /// The ontology tokens, in registration order.
    ///
    /// The lexicographically ordered union of intents and slots, followed
    /// by the span-close token. A token that is both an intent and a slot
    /// appears once.
    pub fn ontology_tokens(&self) -> Vec<String> {
        let union: BTreeSet<&String> = self.intents.iter().chain(&self.slots).collect();

        let mut tokens = Vec::with_capacity(union.len() + 1);
        tokens.extend(union.into_iter().cloned());
        tokens.push(self.span_close_token.clone());
        tokens
    }

    /// The number of distinct ontology tokens, including the span-close token.
    pub fn ontology_vocab_size(&self) -> usize {
        self.intents.union(&self.slots).count() + 1
    }
}
