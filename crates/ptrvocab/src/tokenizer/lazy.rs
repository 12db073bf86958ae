//! # Lazy Shared Initialization
//!
//! Worker threads that each need the pointer tokenizer share a single
//! [`LazyPointerTokenizer`]; the extension phase runs exactly once, on
//! first use, and every worker observes the same frozen vocabulary.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    PVResult,
    tokenizer::{PointerTokenizer, PointerTokenizerOptions},
};

type InitFn = dyn Fn() -> PVResult<PointerTokenizer> + Send + Sync;

/// A [`PointerTokenizer`] built on first access.
///
/// Concurrent first accesses block until one initialization completes.
/// A failed initialization leaves the cell empty; nothing partial is
/// published, and the next access retries.
pub struct LazyPointerTokenizer {
    init: Box<InitFn>,
    cell: OnceCell<Arc<PointerTokenizer>>,
}

impl core::fmt::Debug for LazyPointerTokenizer {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("LazyPointerTokenizer")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl LazyPointerTokenizer {
    /// Build from options on first access.
    pub fn new(options: PointerTokenizerOptions) -> Self {
        Self::with_init(move || PointerTokenizer::from_options(&options))
    }

    /// Build with a custom initializer on first access.
    pub fn with_init<F>(init: F) -> Self
    where
        F: Fn() -> PVResult<PointerTokenizer> + Send + Sync + 'static,
    {
        Self {
            init: Box::new(init),
            cell: OnceCell::new(),
        }
    }

    /// Get the tokenizer, initializing it if needed.
    pub fn get(&self) -> PVResult<Arc<PointerTokenizer>> {
        self.cell
            .get_or_try_init(|| {
                log::debug!("Initializing shared pointer tokenizer");
                (self.init)().map(Arc::new)
            })
            .cloned()
    }

    /// Get the tokenizer, if already initialized.
    pub fn get_if_initialized(&self) -> Option<Arc<PointerTokenizer>> {
        self.cell.get().cloned()
    }

    /// Has initialization completed?
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        errors::PtrVocabError,
        testing::{build_test_ontology, build_test_store},
        types::{check_is_send, check_is_sync},
    };

    fn build() -> PVResult<PointerTokenizer> {
        PointerTokenizer::from_store_with_ontology(
            build_test_store(),
            build_test_ontology()?,
            &PointerTokenizerOptions::default().with_max_seq_len(Some(8)),
            None,
        )
    }

    #[test]
    fn test_single_initialization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = {
            let calls = calls.clone();
            Arc::new(LazyPointerTokenizer::with_init(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                build()
            }))
        };
        check_is_send(&lazy);
        check_is_sync(&lazy);
        assert!(!lazy.is_initialized());

        let handles = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.get().unwrap().vocab_size())
            })
            .collect::<Vec<_>>();
        let sizes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sizes.iter().all(|&s| s == 17 + 5 + 8));
        assert!(Arc::ptr_eq(
            &lazy.get().unwrap(),
            &lazy.get_if_initialized().unwrap()
        ));
    }

    #[test]
    fn test_failed_initialization_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = {
            let calls = calls.clone();
            LazyPointerTokenizer::with_init(move || {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(PtrVocabError::Configuration("first attempt".to_string()))
                } else {
                    build()
                }
            })
        };

        assert!(lazy.get().is_err());
        assert!(!lazy.is_initialized());
        assert!(lazy.get().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
