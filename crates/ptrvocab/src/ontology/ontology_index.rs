//! # Ontology Index
//!
//! The ids an [`OntologyRegistry`] received when registered
//! in a [`VocabularyStore`], with name/id maps in both directions.

use crate::{
    PVResult,
    errors::PtrVocabError,
    ontology::OntologyRegistry,
    types::{PVHashMap, TokenId, hash_map_with_capacity},
    vocab::VocabularyStore,
};

/// Registered ontology ids.
#[derive(Debug, Clone)]
pub struct OntologyIndex {
    ontology_ids: Vec<TokenId>,
    span_close_id: TokenId,

    intent_ids: Vec<TokenId>,
    intent_to_id: PVHashMap<String, TokenId>,
    id_to_intent: PVHashMap<TokenId, String>,

    slot_ids: Vec<TokenId>,
    slot_to_id: PVHashMap<String, TokenId>,
    id_to_slot: PVHashMap<TokenId, String>,
}

impl OntologyRegistry {
    /// Append the ontology tokens to the store, and index their ids.
    ///
    /// ## Errors
    /// [`PtrVocabError::State`] if the store is frozen; the store is unchanged.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn register(
        &self,
        store: &mut VocabularyStore,
    ) -> PVResult<OntologyIndex> {
        if let Some(id) = store.id_of(self.span_close_token())
            && store.structural_ids().contains(id)
        {
            return Err(PtrVocabError::Data(format!(
                "span-close token {:?} is a structural token",
                self.span_close_token()
            )));
        }

        let tokens = self.ontology_tokens();
        let added = store.add_tokens(&tokens)?;
        log::info!("Added {added} ontology tokens.");

        self.index(store)
    }

    /// Index the ids of an already registered ontology.
    ///
    /// ## Errors
    /// [`PtrVocabError::Data`] if a token is unregistered, or the span-close
    /// token shares an id with a structural token.
    pub fn index(
        &self,
        store: &VocabularyStore,
    ) -> PVResult<OntologyIndex> {
        let ontology_ids = store.try_ids_of(&self.ontology_tokens())?;
        let span_close_id = ontology_ids[ontology_ids.len() - 1];

        if store.structural_ids().contains(span_close_id) {
            return Err(PtrVocabError::Data(format!(
                "span-close token {:?} shares an id with a structural token",
                self.span_close_token()
            )));
        }

        let build = |names: &std::collections::BTreeSet<String>| -> PVResult<_> {
            let mut ids = Vec::with_capacity(names.len());
            let mut to_id = hash_map_with_capacity(names.len());
            let mut to_name = hash_map_with_capacity(names.len());
            for name in names {
                let id = store.id_of(name).ok_or_else(|| {
                    PtrVocabError::Data(format!("ontology token {name:?} is not registered"))
                })?;
                ids.push(id);
                to_id.insert(name.clone(), id);
                to_name.insert(id, name.clone());
            }
            Ok((ids, to_id, to_name))
        };

        let (intent_ids, intent_to_id, id_to_intent) = build(self.intents())?;
        let (slot_ids, slot_to_id, id_to_slot) = build(self.slots())?;

        Ok(OntologyIndex {
            ontology_ids,
            span_close_id,
            intent_ids,
            intent_to_id,
            id_to_intent,
            slot_ids,
            slot_to_id,
            id_to_slot,
        })
    }
}

impl OntologyIndex {
    /// All ontology ids, in registration order; the span-close id is last.
    pub fn ontology_ids(&self) -> &[TokenId] {
        &self.ontology_ids
    }

    /// The span-close id.
    pub fn span_close_id(&self) -> TokenId {
        self.span_close_id
    }

    /// Intent ids, in lexicographic intent order.
    pub fn intent_ids(&self) -> &[TokenId] {
        &self.intent_ids
    }

    /// Slot ids, in lexicographic slot order.
    pub fn slot_ids(&self) -> &[TokenId] {
        &self.slot_ids
    }

    /// The number of intents.
    pub fn num_intents(&self) -> usize {
        self.intent_ids.len()
    }

    /// The number of slots.
    pub fn num_slots(&self) -> usize {
        self.slot_ids.len()
    }

    /// Look up an intent's id.
    pub fn intent_id(
        &self,
        intent: &str,
    ) -> Option<TokenId> {
        self.intent_to_id.get(intent).copied()
    }

    /// Look up the intent for an id.
    pub fn intent_name(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.id_to_intent.get(&id).map(String::as_str)
    }

    /// Look up a slot's id.
    pub fn slot_id(
        &self,
        slot: &str,
    ) -> Option<TokenId> {
        self.slot_to_id.get(slot).copied()
    }

    /// Look up the slot for an id.
    pub fn slot_name(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.id_to_slot.get(&id).map(String::as_str)
    }
}
