//! Memoized dispatch keyed on the descriptor, series index and layout.

use crate::config::LayoutParams;
use crate::dispatch::{ChartView, dispatch_series};
use crate::models::ChartDescriptor;
use ahash::AHashMap;

pub const DEFAULT_CAPACITY: usize = 64;

/// Bounded geometry cache. When full, the whole map is dropped before the next insert.
#[derive(Debug)]
pub struct GeometryCache {
    entries: AHashMap<String, ChartView>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl GeometryCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: AHashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Same result as [`dispatch_series`], computed at most once per distinct input.
    pub fn get_or_dispatch(
        &mut self,
        descriptor: &ChartDescriptor,
        series_index: usize,
        layout: &LayoutParams,
    ) -> ChartView {
        let Some(key) = cache_key(descriptor, series_index, layout) else {
            self.misses += 1;
            return dispatch_series(descriptor, series_index, layout);
        };
        if let Some(view) = self.entries.get(&key) {
            self.hits += 1;
            log::trace!("geometry cache hit ({} entries)", self.entries.len());
            return view.clone();
        }

        self.misses += 1;
        let view = dispatch_series(descriptor, series_index, layout);
        if self.entries.len() >= self.capacity {
            log::trace!("geometry cache full at {}, clearing", self.capacity);
            self.entries.clear();
        }
        self.entries.insert(key, view.clone());
        view
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Canonical JSON of the inputs. Object keys in `rawData` rows are ordered, so equal
/// inputs give equal keys.
fn cache_key(
    descriptor: &ChartDescriptor,
    series_index: usize,
    layout: &LayoutParams,
) -> Option<String> {
    match serde_json::to_string(&(descriptor, series_index, layout)) {
        Ok(key) => Some(key),
        Err(e) => {
            log::debug!("uncacheable descriptor: {e}");
            None
        }
    }
}
