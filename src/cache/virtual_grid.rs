//! LRU-cached virtual sampling grid

use glam::DVec3;
use lru::LruCache;
use std::num::NonZeroUsize;

use super::{CacheConfig, CacheStats, GridSampler};
use crate::field::ScalarField;
use crate::types::FieldBox;

/// A scalar field discretized on demand over a box.
///
/// Samples are computed lazily and memoized by flat index. For a fixed
/// index and a deterministic field the returned value is identical whether
/// it comes from the cache or a fresh evaluation.
pub struct CachedVirtualGrid<F> {
    field: F,
    resolution: [usize; 3],
    bounds: FieldBox,
    cache: Option<LruCache<usize, f64>>,
    stats: CacheStats,
}

impl<F: ScalarField> CachedVirtualGrid<F> {
    /// Sample `field` on a grid of `resolution` cells spanning `bounds`
    pub fn new(field: F, resolution: [usize; 3], bounds: FieldBox, config: CacheConfig) -> Self {
        let capacity = config.resolve(resolution);
        tracing::debug!(?resolution, capacity, "virtual grid cache");
        CachedVirtualGrid {
            field,
            resolution,
            bounds,
            cache: NonZeroUsize::new(capacity).map(LruCache::new),
            stats: CacheStats::default(),
        }
    }

    /// Wrapped field
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Counters since construction (or the last [`clear`](Self::clear))
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Maximum number of cached samples (0 when caching is off)
    pub fn capacity(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.cap().get())
    }

    /// Samples currently cached
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    /// Drop every cached sample and reset the counters
    pub fn clear(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.stats = CacheStats::default();
    }

    /// Unwrap the field
    pub fn into_field(self) -> F {
        self.field
    }

    /// Flat key of a sample, `None` outside `[0, n]` on some axis
    #[inline]
    fn key(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let [nx, ny, nz] = self.resolution;
        if i > nx || j > ny || k > nz {
            return None;
        }
        Some(i + (nx + 1) * (j + (ny + 1) * k))
    }
}

impl<F: ScalarField> GridSampler for CachedVirtualGrid<F> {
    fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    fn bounds(&self) -> FieldBox {
        self.bounds
    }

    fn value_at(&mut self, i: usize, j: usize, k: usize) -> f64 {
        let key = self.key(i, j, k);
        if let (Some(key), Some(cache)) = (key, self.cache.as_mut()) {
            if let Some(&v) = cache.get(&key) {
                self.stats.hits += 1;
                return v;
            }
        }

        self.stats.misses += 1;
        let point = self.index_to_field(i, j, k);
        let value = self.field.value_at(point);

        if let (Some(key), Some(cache)) = (key, self.cache.as_mut()) {
            if cache.push(key, value).is_some() {
                self.stats.evictions += 1;
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FnField;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_field(
        calls: Arc<AtomicUsize>,
    ) -> FnField<impl Fn(DVec3) -> f64 + Send + Sync> {
        FnField(move |p: DVec3| {
            calls.fetch_add(1, Ordering::Relaxed);
            p.x + 2.0 * p.y + 3.0 * p.z
        })
    }

    #[test]
    fn test_index_to_field_corners() {
        let g = CachedVirtualGrid::new(
            FnField(|_: DVec3| 0.0),
            [4, 2, 8],
            FieldBox::new(DVec3::new(-1.0, 0.0, 1.0), DVec3::new(1.0, 1.0, 3.0)),
            CacheConfig::default(),
        );
        assert_eq!(g.index_to_field(0, 0, 0), DVec3::new(-1.0, 0.0, 1.0));
        assert_eq!(g.index_to_field(4, 2, 8), DVec3::new(1.0, 1.0, 3.0));
        assert_eq!(g.index_to_field(2, 1, 4), DVec3::new(0.0, 0.5, 2.0));
        assert_eq!(g.grid_to_field(DVec3::new(1.0, 0.5, 2.0)), DVec3::new(-0.5, 0.25, 1.5));
    }

    #[test]
    fn test_repeat_queries_evaluate_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut g = CachedVirtualGrid::new(
            counting_field(Arc::clone(&calls)),
            [2, 2, 2],
            FieldBox::cube(1.0),
            CacheConfig::with_capacity(1),
        );
        let first = g.value_at(1, 2, 0);
        for _ in 0..10 {
            assert_eq!(g.value_at(1, 2, 0), first);
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(g.stats().hits, 10);
        assert_eq!(g.stats().misses, 1);
    }

    #[test]
    fn test_eviction_recomputes_identically() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut g = CachedVirtualGrid::new(
            counting_field(Arc::clone(&calls)),
            [3, 3, 3],
            FieldBox::cube(1.0),
            CacheConfig::with_capacity(2),
        );
        let a = g.value_at(0, 0, 0);
        g.value_at(1, 0, 0);
        g.value_at(2, 0, 0);
        assert_eq!(g.stats().evictions, 1);
        assert_eq!(g.cached_len(), 2);

        // (0,0,0) was least recently used and got evicted.
        assert_eq!(g.value_at(0, 0, 0), a);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_sweep_with_default_capacity_evaluates_each_index_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let n = 5;
        let mut g = CachedVirtualGrid::new(
            counting_field(Arc::clone(&calls)),
            [n, n, n],
            FieldBox::cube(1.0),
            CacheConfig::default(),
        );
        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    for (di, dj, dk) in [
                        (0, 0, 0),
                        (1, 0, 0),
                        (1, 1, 0),
                        (0, 1, 0),
                        (0, 0, 1),
                        (1, 0, 1),
                        (1, 1, 1),
                        (0, 1, 1),
                    ] {
                        g.value_at(i + di, j + dj, k + dk);
                    }
                }
            }
        }
        assert_eq!(calls.load(Ordering::Relaxed), (n + 1) * (n + 1) * (n + 1));
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut g = CachedVirtualGrid::new(
            counting_field(Arc::clone(&calls)),
            [1, 1, 1],
            FieldBox::cube(1.0),
            CacheConfig::with_capacity(0),
        );
        g.value_at(0, 0, 0);
        g.value_at(0, 0, 0);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(g.capacity(), 0);
    }

    #[test]
    fn test_out_of_range_index_bypasses_cache() {
        let mut g = CachedVirtualGrid::new(
            FnField(|p: DVec3| p.x),
            [2, 2, 2],
            FieldBox::new(DVec3::ZERO, DVec3::splat(2.0)),
            CacheConfig::default(),
        );
        assert_eq!(g.value_at(3, 0, 0), 3.0);
        assert_eq!(g.cached_len(), 0);
    }
}
