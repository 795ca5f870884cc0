use crate::Result;
use crate::pattern::{PatternTile, rasterize};
use mapstyle_core::{PatternSpec, Rgb};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Default upper bound on memoized tiles.
pub const DEFAULT_MAX_TILES: usize = 4096;

/// Memoizes rasterized tiles by `(spec, colour)`.
///
/// Tiles are pure functions of their key, so a cached tile is indistinguishable from a freshly
/// drawn one. Safe to share between threads.
///
/// Entries are never evicted. Once `max_tiles` entries are held, tiles for new keys are still
/// drawn and returned but not stored; call [`PatternCache::clear`] to start over.
#[derive(Debug)]
pub struct PatternCache {
    tiles: RwLock<FxHashMap<(PatternSpec, Rgb), Arc<PatternTile>>>,
    max_tiles: usize,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::with_max_tiles(DEFAULT_MAX_TILES)
    }
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tiles(max_tiles: usize) -> Self {
        Self {
            tiles: RwLock::default(),
            max_tiles,
        }
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    pub fn get_or_rasterize(&self, spec: PatternSpec, colour: Rgb) -> Result<Arc<PatternTile>> {
        let key = (spec, colour);
        if let Some(tile) = self
            .tiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::trace!(kind = spec.kind().as_str(), colour = %colour, "pattern cache hit");
            return Ok(Arc::clone(tile));
        }

        let tile = Arc::new(rasterize(spec, colour)?);
        let mut tiles = self.tiles.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = tiles.get(&key) {
            return Ok(Arc::clone(existing));
        }
        if tiles.len() >= self.max_tiles {
            tracing::debug!(
                max_tiles = self.max_tiles,
                "pattern cache full; tile not stored"
            );
            return Ok(tile);
        }
        tiles.insert(key, Arc::clone(&tile));
        Ok(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.tiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapstyle_core::PatternKind;

    #[test]
    fn caches_by_spec_and_colour() {
        let cache = PatternCache::new();
        let spec = PatternSpec::new(PatternKind::Blob, 14).unwrap();
        let a = cache.get_or_rasterize(spec, Rgb::new(1, 2, 3)).unwrap();
        let b = cache.get_or_rasterize(spec, Rgb::new(1, 2, 3)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get_or_rasterize(spec, Rgb::new(3, 2, 1)).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_tile_equals_fresh_tile() {
        let cache = PatternCache::new();
        let spec = PatternSpec::new(PatternKind::Cross, 5).unwrap();
        let colour = Rgb::new(9, 99, 199);
        let cached = cache.get_or_rasterize(spec, colour).unwrap();
        assert_eq!(*cached, rasterize(spec, colour).unwrap());
    }

    #[test]
    fn full_cache_still_returns_tiles_without_storing_them() {
        let cache = PatternCache::with_max_tiles(2);
        let spec = PatternSpec::new(PatternKind::Forward, 8).unwrap();
        let stored = cache.get_or_rasterize(spec, Rgb::new(1, 1, 1)).unwrap();
        cache.get_or_rasterize(spec, Rgb::new(2, 2, 2)).unwrap();
        assert_eq!(cache.len(), 2);

        let colour = Rgb::new(3, 3, 3);
        let a = cache.get_or_rasterize(spec, colour).unwrap();
        let b = cache.get_or_rasterize(spec, colour).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, rasterize(spec, colour).unwrap());

        let again = cache.get_or_rasterize(spec, Rgb::new(1, 1, 1)).unwrap();
        assert!(Arc::ptr_eq(&stored, &again));
    }

    #[test]
    fn default_cap() {
        assert_eq!(PatternCache::new().max_tiles(), DEFAULT_MAX_TILES);
    }
}
