//! # Common Types

/// An id in the full (extended) vocabulary id space.
///
/// This is the id type of the underlying [`tokenizers::Tokenizer`].
pub type TokenId = u32;

/// An id in the compact restricted-output-vocabulary id space.
pub type CompactId = u32;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type PVHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PVHashMap<K, V> {
            PVHashMap::with_capacity(capacity)
        }

        /// Type Alias for hash sets in this crate.
        pub type PVHashSet<V> = ahash::AHashSet<V>;
    } else {
        /// Type Alias for hash maps in this crate.
        pub type PVHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PVHashMap<K, V> {
            PVHashMap::with_capacity(capacity)
        }

        /// Type Alias for hash sets in this crate.
        pub type PVHashSet<V> = std::collections::HashSet<V>;
    }
}

/// Compile-time check that a value is [`Send`].
#[cfg(any(test, feature = "testing"))]
pub fn check_is_send<S: Send>(_: &S) {}

/// Compile-time check that a value is [`Sync`].
#[cfg(any(test, feature = "testing"))]
pub fn check_is_sync<S: Sync>(_: &S) {}
