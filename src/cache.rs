//! Bookkeeping of what each canvas painted, so painters can release resources of nodes that
//! left the screen.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use waterui_scene::ObjectId;

use crate::canvas::CanvasId;
use crate::sync::lock;

#[derive(Debug, Default)]
struct CacheEntry {
    /// Nodes painted during the last completed frame.
    painted: HashSet<ObjectId>,
    /// Nodes painted during the frame in progress.
    current: HashSet<ObjectId>,
}

/// Per-canvas record of painted nodes, shared by every canvas of a driver.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: Mutex<HashMap<CanvasId, CacheEntry>>,
}

impl RenderCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CanvasId, CacheEntry>> {
        lock(&self.entries)
    }

    /// Records that `object` was painted on `canvas` in the current frame.
    pub fn touch(&self, canvas: CanvasId, object: ObjectId) {
        self.entries().entry(canvas).or_default().current.insert(object);
    }

    /// Drops `object` from the record of `canvas`.
    pub fn forget(&self, canvas: CanvasId, object: ObjectId) {
        if let Some(entry) = self.entries().get_mut(&canvas) {
            entry.painted.remove(&object);
            entry.current.remove(&object);
        }
    }

    /// Whether `object` is known to be on screen for `canvas`.
    #[must_use]
    pub fn contains(&self, canvas: CanvasId, object: ObjectId) -> bool {
        self.entries()
            .get(&canvas)
            .is_some_and(|entry| entry.painted.contains(&object) || entry.current.contains(&object))
    }

    /// Finishes a frame.
    ///
    /// Canvases in `refreshed` keep only what they painted this frame. Canvases missing from
    /// `live` are dropped entirely. Returns every node that is no longer on screen, paired with
    /// the canvas that painted it.
    pub fn clean_canvases(
        &self,
        refreshed: &[CanvasId],
        live: &[CanvasId],
    ) -> Vec<(CanvasId, ObjectId)> {
        let mut evicted = Vec::new();
        let mut entries = self.entries();

        entries.retain(|canvas, entry| {
            if live.contains(canvas) {
                return true;
            }
            evicted.extend(entry.painted.drain().map(|object| (*canvas, object)));
            evicted.extend(entry.current.drain().map(|object| (*canvas, object)));
            false
        });

        for canvas in refreshed {
            let Some(entry) = entries.get_mut(canvas) else {
                continue;
            };
            let current = std::mem::take(&mut entry.current);
            evicted.extend(
                entry
                    .painted
                    .difference(&current)
                    .map(|object| (*canvas, *object)),
            );
            entry.painted = current;
        }

        evicted.sort_unstable();
        evicted.dedup();
        evicted
    }

    /// Number of canvases with a record.
    #[must_use]
    pub fn canvas_count(&self) -> usize {
        self.entries().len()
    }
}
