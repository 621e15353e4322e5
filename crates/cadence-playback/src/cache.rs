//! Rendered-buffer cache keyed by content signature.
//!
//! Entries are never evicted. Each signature owns a `OnceLock` cell, so two
//! threads asking for the same signature at once render it once; the second
//! blocks on the cell rather than the whole map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use cadence_backend_audio::RenderedBuffer;
use cadence_spec::Signature;

type Cell = Arc<OnceLock<Arc<RenderedBuffer>>>;

/// Append-only memo of rendered buffers.
#[derive(Debug, Default)]
pub struct BufferCache {
    entries: Mutex<HashMap<Signature, Cell>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BufferCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffer for `signature`, calling `render` on first use.
    pub fn get_or_render<F>(&self, signature: &Signature, render: F) -> Arc<RenderedBuffer>
    where
        F: FnOnce() -> RenderedBuffer,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.entry(signature.clone()).or_default().clone()
        };

        let mut rendered = false;
        let buffer = cell
            .get_or_init(|| {
                rendered = true;
                let started = Instant::now();
                let buffer = render();
                tracing::debug!(
                    signature = %signature,
                    frames = buffer.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "rendered buffer"
                );
                Arc::new(buffer)
            })
            .clone();

        if rendered {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        buffer
    }

    /// Returns the cached buffer without rendering.
    pub fn get(&self, signature: &Signature) -> Option<Arc<RenderedBuffer>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(signature).and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.get(signature).is_some()
    }

    /// Number of rendered entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that rendered.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_spec::SignatureKind;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn signature(name: &str) -> Signature {
        Signature::of_value(SignatureKind::Sfx, &serde_json::json!({ "event": name }))
    }

    #[test]
    fn test_renders_once_per_signature() {
        let cache = BufferCache::new();
        let renders = AtomicUsize::new(0);
        let render = || {
            renders.fetch_add(1, Ordering::SeqCst);
            RenderedBuffer::silent(10, 1_000)
        };

        let a = cache.get_or_render(&signature("tap"), render);
        let b = cache.get_or_render(&signature("tap"), render);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        cache.get_or_render(&signature("coin"), render);
        assert_eq!(renders.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_does_not_render() {
        let cache = BufferCache::new();
        assert!(cache.get(&signature("tap")).is_none());
        assert!(cache.is_empty());
        cache.get_or_render(&signature("tap"), || RenderedBuffer::silent(1, 1_000));
        assert!(cache.contains(&signature("tap")));
    }

    #[test]
    fn test_concurrent_requests_coalesce() {
        let cache = Arc::new(BufferCache::new());
        let renders = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let renders = Arc::clone(&renders);
                thread::spawn(move || {
                    cache.get_or_render(&signature("reveal"), || {
                        renders.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(20));
                        RenderedBuffer::silent(100, 1_000)
                    })
                })
            })
            .collect();

        let buffers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert!(buffers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.hits() + cache.misses(), 8);
        assert_eq!(cache.misses(), 1);
    }
}
