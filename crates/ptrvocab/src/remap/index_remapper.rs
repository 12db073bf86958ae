//! # Index Remapper
//!
//! Dense, lossless maps between the full vocabulary id space and the
//! compact restricted-output-vocabulary id space.
//!
//! The compact id space is laid out as:
//!
//! ```text
//! [ pointer ids .. | ontology ids .. | end | begin | pad | unknown ]
//! ```
//!
//! This layout is a persisted contract; see [`RESTRICTED_LAYOUT_VERSION`].

use crate::{
    PVResult,
    errors::PtrVocabError,
    types::{CompactId, TokenId},
    vocab::{StructuralIds, VocabularyStore},
};

/// Version of the restricted vocabulary layout.
///
/// Must change whenever the concatenation order changes.
pub const RESTRICTED_LAYOUT_VERSION: u32 = 1;

/// The number of structural tokens at the tail of the compact id space.
pub const NUM_STRUCTURAL_TOKENS: usize = 4;

/// Which section of the restricted vocabulary a compact id falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictedSection {
    /// A pointer to input position `n`.
    Pointer(usize),

    /// The `n`-th ontology token.
    Ontology(usize),

    /// End-of-sequence.
    End,

    /// Beginning-of-sequence.
    Begin,

    /// Padding.
    Pad,

    /// Unknown.
    Unknown,
}

/// Forward and inverse maps over the restricted output vocabulary.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemapper {
    /// Indexed by full vocabulary id; `None` outside the restricted set.
    forward: Vec<Option<CompactId>>,

    /// Indexed by compact id.
    inverse: Vec<TokenId>,

    num_pointers: usize,
    num_ontology: usize,
}

impl IndexRemapper {
    /// Build the maps for a frozen store.
    ///
    /// ## Arguments
    /// * `store` - the frozen vocabulary store.
    /// * `pointer_ids` - pointer ids, in position order.
    /// * `ontology_ids` - ontology ids, in registration order.
    ///
    /// ## Errors
    /// * [`PtrVocabError::State`] if the store is not frozen, or if the
    ///   restricted vocabulary contains an id twice.
    /// * [`PtrVocabError::Data`] if an id is outside the store's vocabulary.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn build(
        store: &VocabularyStore,
        pointer_ids: &[TokenId],
        ontology_ids: &[TokenId],
    ) -> PVResult<Self> {
        if !store.is_frozen() {
            return Err(PtrVocabError::State(
                "remap tables require a frozen vocabulary store".to_string(),
            ));
        }
        Self::from_parts(
            store.vocab_size(),
            pointer_ids,
            ontology_ids,
            store.structural_ids(),
        )
    }

    /// Build the maps from raw ids.
    ///
    /// See [`build`](Self::build).
    pub fn from_parts(
        vocab_size: usize,
        pointer_ids: &[TokenId],
        ontology_ids: &[TokenId],
        structural: StructuralIds,
    ) -> PVResult<Self> {
        let inverse: Vec<TokenId> = pointer_ids
            .iter()
            .chain(ontology_ids)
            .chain(structural.restricted_order().iter())
            .copied()
            .collect();

        let mut forward: Vec<Option<CompactId>> = vec![None; vocab_size];
        for (compact, &id) in inverse.iter().enumerate() {
            let slot = forward.get_mut(id as usize).ok_or_else(|| {
                PtrVocabError::Data(format!(
                    "restricted id {id} is outside the vocabulary of size {vocab_size}"
                ))
            })?;
            if let Some(prev) = slot {
                return Err(PtrVocabError::State(format!(
                    "id {id} appears twice in the restricted vocabulary (compact ids {prev} and {compact})"
                )));
            }
            *slot = Some(compact as CompactId);
        }

        log::debug!(
            "Built remap tables: {} full ids -> {} compact ids",
            forward.len(),
            inverse.len()
        );

        Ok(Self {
            forward,
            inverse,
            num_pointers: pointer_ids.len(),
            num_ontology: ontology_ids.len(),
        })
    }

    /// The forward map, indexed by full vocabulary id.
    pub fn forward_map(&self) -> &[Option<CompactId>] {
        &self.forward
    }

    /// The inverse map, indexed by compact id.
    pub fn inverse_map(&self) -> &[TokenId] {
        &self.inverse
    }

    /// The size of the full vocabulary.
    pub fn full_vocab_size(&self) -> usize {
        self.forward.len()
    }

    /// The size of the restricted output vocabulary.
    ///
    /// ``num_pointers + num_ontology + 4``.
    pub fn restricted_size(&self) -> usize {
        self.inverse.len()
    }

    /// The number of pointer ids.
    pub fn num_pointers(&self) -> usize {
        self.num_pointers
    }

    /// The number of ontology ids.
    pub fn num_ontology(&self) -> usize {
        self.num_ontology
    }

    /// Is the full id in the restricted set?
    pub fn contains(
        &self,
        id: TokenId,
    ) -> bool {
        self.to_compact(id).is_some()
    }

    /// Map a full id to its compact id.
    pub fn to_compact(
        &self,
        id: TokenId,
    ) -> Option<CompactId> {
        self.forward.get(id as usize).copied().flatten()
    }

    /// Map a compact id to its full id.
    pub fn to_full(
        &self,
        compact: CompactId,
    ) -> Option<TokenId> {
        self.inverse.get(compact as usize).copied()
    }

    /// Classify a compact id by restricted-vocabulary section.
    pub fn section(
        &self,
        compact: CompactId,
    ) -> Option<RestrictedSection> {
        let c = compact as usize;
        let ontology_start = self.num_pointers;
        let structural_start = ontology_start + self.num_ontology;

        Some(if c < ontology_start {
            RestrictedSection::Pointer(c)
        } else if c < structural_start {
            RestrictedSection::Ontology(c - ontology_start)
        } else {
            match c - structural_start {
                0 => RestrictedSection::End,
                1 => RestrictedSection::Begin,
                2 => RestrictedSection::Pad,
                3 => RestrictedSection::Unknown,
                _ => return None,
            }
        })
    }

    /// Map full ids to compact ids, elementwise.
    ///
    /// ## Errors
    /// [`PtrVocabError::Lookup`] for the first id outside the restricted set.
    pub fn try_forward_transform(
        &self,
        ids: &[TokenId],
    ) -> PVResult<Vec<CompactId>> {
        ids.iter()
            .enumerate()
            .map(|(position, &id)| {
                self.to_compact(id).ok_or(PtrVocabError::Lookup {
                    space: "vocabulary",
                    id,
                    position,
                    domain: "restricted output vocabulary",
                })
            })
            .collect()
    }

    /// Map full ids to compact ids, elementwise.
    ///
    /// ## Panics
    /// If any id is outside the restricted set.
    pub fn forward_transform(
        &self,
        ids: &[TokenId],
    ) -> Vec<CompactId> {
        match self.try_forward_transform(ids) {
            Ok(compact) => compact,
            Err(err) => panic!("forward transform precondition violated: {err}"),
        }
    }

    /// Map compact ids to full ids, elementwise.
    ///
    /// ## Errors
    /// [`PtrVocabError::Lookup`] for the first id ``>= restricted_size()``.
    pub fn try_inverse_transform(
        &self,
        ids: &[CompactId],
    ) -> PVResult<Vec<TokenId>> {
        ids.iter()
            .enumerate()
            .map(|(position, &id)| {
                self.to_full(id).ok_or(PtrVocabError::Lookup {
                    space: "compact",
                    id,
                    position,
                    domain: "compact id range",
                })
            })
            .collect()
    }

    /// Map compact ids to full ids, elementwise.
    ///
    /// ## Panics
    /// If any id is ``>= restricted_size()``.
    pub fn inverse_transform(
        &self,
        ids: &[CompactId],
    ) -> Vec<TokenId> {
        match self.try_inverse_transform(ids) {
            Ok(full) => full,
            Err(err) => panic!("inverse transform precondition violated: {err}"),
        }
    }

    /// Forward-transform a batch of rows.
    pub fn try_forward_transform_batch<R>(
        &self,
        rows: &[R],
    ) -> PVResult<Vec<Vec<CompactId>>>
    where
        R: AsRef<[TokenId]> + Sync,
    {
        self.map_rows(rows, |row| self.try_forward_transform(row))
    }

    /// Inverse-transform a batch of rows.
    pub fn try_inverse_transform_batch<R>(
        &self,
        rows: &[R],
    ) -> PVResult<Vec<Vec<TokenId>>>
    where
        R: AsRef<[CompactId]> + Sync,
    {
        self.map_rows(rows, |row| self.try_inverse_transform(row))
    }

    fn map_rows<R, F>(
        &self,
        rows: &[R],
        f: F,
    ) -> PVResult<Vec<Vec<u32>>>
    where
        R: AsRef<[u32]> + Sync,
        F: Fn(&[u32]) -> PVResult<Vec<u32>> + Sync + Send,
    {
        #[cfg(feature = "rayon")]
        let mapped = {
            use rayon::prelude::*;
            rows.par_iter().map(|row| f(row.as_ref())).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let mapped = rows.iter().map(|row| f(row.as_ref())).collect();

        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURAL: StructuralIds = StructuralIds {
        begin: 0,
        end: 2,
        pad: 1,
        unknown: 3,
    };

    fn sample() -> IndexRemapper {
        // vocab: 0..4 structural, 4..10 words, 10..15 ontology, 15..23 pointers.
        let ontology: Vec<TokenId> = (10..15).collect();
        let pointers: Vec<TokenId> = (15..23).collect();
        IndexRemapper::from_parts(23, &pointers, &ontology, STRUCTURAL).unwrap()
    }

    #[test]
    fn test_layout() {
        let remap = sample();
        assert_eq!(remap.full_vocab_size(), 23);
        assert_eq!(remap.restricted_size(), 8 + 5 + NUM_STRUCTURAL_TOKENS);
        assert_eq!(remap.num_pointers(), 8);
        assert_eq!(remap.num_ontology(), 5);

        assert_eq!(remap.to_compact(15), Some(0));
        assert_eq!(remap.to_compact(22), Some(7));
        assert_eq!(remap.to_compact(10), Some(8));
        assert_eq!(remap.to_compact(2), Some(13));
        assert_eq!(remap.to_compact(0), Some(14));
        assert_eq!(remap.to_compact(1), Some(15));
        assert_eq!(remap.to_compact(3), Some(16));
        assert_eq!(remap.to_compact(5), None);
        assert_eq!(remap.to_compact(99), None);

        assert_eq!(remap.section(3), Some(RestrictedSection::Pointer(3)));
        assert_eq!(remap.section(9), Some(RestrictedSection::Ontology(1)));
        assert_eq!(remap.section(13), Some(RestrictedSection::End));
        assert_eq!(remap.section(14), Some(RestrictedSection::Begin));
        assert_eq!(remap.section(15), Some(RestrictedSection::Pad));
        assert_eq!(remap.section(16), Some(RestrictedSection::Unknown));
        assert_eq!(remap.section(17), None);
    }

    #[test]
    fn test_maps_are_exact_inverses() {
        let remap = sample();

        for (x, compact) in remap.forward_map().iter().enumerate() {
            match compact {
                Some(y) => assert_eq!(remap.inverse_map()[*y as usize], x as TokenId),
                None => assert!(!remap.inverse_map().contains(&(x as TokenId))),
            }
        }
        for (y, &x) in remap.inverse_map().iter().enumerate() {
            assert_eq!(remap.forward_map()[x as usize], Some(y as CompactId));
        }
    }

    #[test]
    fn test_transforms() {
        let remap = sample();
        let ids = vec![0, 11, 17, 14, 2, 1];

        let compact = remap.forward_transform(&ids);
        assert_eq!(compact, vec![14, 9, 2, 12, 13, 15]);
        assert_eq!(remap.inverse_transform(&compact), ids);
    }

    #[test]
    fn test_transform_preconditions() {
        let remap = sample();

        let err = remap.try_forward_transform(&[0, 5]).unwrap_err();
        assert!(matches!(
            err,
            PtrVocabError::Lookup {
                id: 5,
                position: 1,
                ..
            }
        ));

        let err = remap.try_inverse_transform(&[17]).unwrap_err();
        assert!(matches!(err, PtrVocabError::Lookup { id: 17, .. }));
    }

    #[test]
    #[should_panic(expected = "forward transform precondition violated")]
    fn test_forward_transform_panics() {
        sample().forward_transform(&[4]);
    }

    #[test]
    #[should_panic(expected = "inverse transform precondition violated")]
    fn test_inverse_transform_panics() {
        sample().inverse_transform(&[100]);
    }

    #[test]
    fn test_batch_transforms() {
        let remap = sample();
        let rows = vec![vec![0, 15, 2], vec![16, 1, 1]];

        let compact = remap.try_forward_transform_batch(&rows).unwrap();
        assert_eq!(compact, vec![vec![14, 0, 13], vec![1, 15, 15]]);
        assert_eq!(remap.try_inverse_transform_batch(&compact).unwrap(), rows);

        assert!(remap.try_forward_transform_batch(&[vec![0], vec![4]]).is_err());
    }

    #[test]
    fn test_duplicate_ids() {
        let err = IndexRemapper::from_parts(23, &[15, 16], &[10, 1], STRUCTURAL).unwrap_err();
        assert!(matches!(err, PtrVocabError::State(_)));
    }

    #[test]
    fn test_out_of_vocab_ids() {
        let err = IndexRemapper::from_parts(16, &[15, 16], &[10], STRUCTURAL).unwrap_err();
        assert!(matches!(err, PtrVocabError::Data(_)));
    }

    #[test]
    fn test_unfrozen_store() {
        let store = crate::testing::build_test_store();
        let err = IndexRemapper::build(&store, &[], &[]).unwrap_err();
        assert!(matches!(err, PtrVocabError::State(_)));
    }
}
