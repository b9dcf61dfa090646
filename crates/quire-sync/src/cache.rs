use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use quire_types::CacheSnapshot;

/// The snapshot readers are served from.
///
/// Readers take an `Arc` to the current snapshot and keep it as long as
/// they like; a replacement swaps the pointer, so every reader sees either
/// the whole old snapshot or the whole new one.
#[derive(Debug, Default)]
pub struct LiveCache {
    current: RwLock<Arc<CacheSnapshot>>,
    generation: AtomicU64,
}

impl LiveCache {
    pub fn new(initial: CacheSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            generation: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.current.read().expect("live cache lock poisoned").clone()
    }

    /// Swap in `next` and return the new generation number.
    pub fn replace(&self, next: CacheSnapshot) -> u64 {
        let mut current = self.current.write().expect("live cache lock poisoned");
        *current = Arc::new(next);
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
