//! # Ontology
//!
//! Domain ontologies (intents, slots, and the span-close delimiter)
//! and the ids they receive once registered.

pub mod dataset_kind;
pub mod ontology_index;
pub mod ontology_registry;

#[doc(inline)]
pub use dataset_kind::DatasetKind;
#[doc(inline)]
pub use ontology_index::OntologyIndex;
#[doc(inline)]
pub use ontology_registry::{OntologyDomain, OntologyRegistry};
