//! Per-entity in-flight tracking.
//!
//! A transition on booking `B1` disables `B1`'s buttons only. The guard
//! clears the id when dropped, whether the request succeeded, failed or the
//! future was abandoned.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of ids with a request in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` busy; `None` if a request for it is already running.
    pub fn try_begin(&self, id: &str) -> Option<InFlightGuard> {
        let inserted = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string());
        inserted.then(|| InFlightGuard {
            ids: self.ids.clone(),
            id: id.to_string(),
        })
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn busy_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

/// Releases its id on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
