//! Visible focus/click queue for the kitchen home layout.
//!
//! Queue position 0 is the first task row after the left panel. Fridge rows
//! come first, then shopping rows, each bucket capped independently and
//! completed reminders excluded.
//!
//! The renderer is the authority on what was actually drawn, so after every
//! frame it records a [`FocusQueueSnapshot`]. The reducer prefers that
//! snapshot over a fresh resolution, but only while it is provably current.

use log::trace;
use serde::Serialize;

use super::config::Config;
use super::state::{AppState, DashboardModel};

/// Cache key for the queue-shaping knobs. Other configuration never changes
/// the queue, so it never invalidates the cache either.
pub fn kitchen_queue_key(config: &Config) -> String {
    format!("{}:{}", config.inventory_max_rows, config.shopping_max_rows)
}

/// Fresh resolution from the domain list, in stored order.
pub fn resolve_kitchen_queue(model: &DashboardModel, config: &Config) -> Vec<usize> {
    let inventory_cap = config.inventory_max_rows.max(1);
    let shopping_cap = config.shopping_max_rows.max(1);
    let mut fridge = Vec::with_capacity(inventory_cap);
    let mut shopping = Vec::with_capacity(shopping_cap);

    for (idx, reminder) in model.reminders.iter().enumerate() {
        if reminder.completed {
            continue;
        }
        if reminder.is_fridge() {
            if fridge.len() < inventory_cap {
                fridge.push(idx);
            }
        } else if shopping.len() < shopping_cap {
            shopping.push(idx);
        }
    }

    fridge.extend(shopping);
    fridge
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FocusQueueSnapshot {
    pub key: String,
    pub rids: Vec<String>,
    /// `DashboardModel::revision` the frame was drawn from.
    pub revision: u64,
}

impl FocusQueueSnapshot {
    pub fn new(key: impl Into<String>, rids: Vec<String>, revision: u64) -> Self {
        Self {
            key: key.into(),
            rids,
            revision,
        }
    }

    /// Builds the write-back value from the domain indices a frame rendered.
    pub fn capture(model: &DashboardModel, rendered: &[usize], config: &Config) -> Self {
        Self {
            key: kitchen_queue_key(config),
            rids: rendered
                .iter()
                .filter_map(|&idx| model.reminders.get(idx))
                .map(|reminder| reminder.rid.clone())
                .collect(),
            revision: model.revision,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rids.is_empty()
    }
}

/// Resolves the snapshot back to domain indices, or `None` when it is stale.
///
/// Stale means: different queue key, different list revision, or any cached
/// rid that no longer names a live incomplete reminder. A current snapshot
/// with no rids is honoured: the frame had no room for task rows, so focus
/// stays on the left panel. A never-rendered snapshot has an empty key and
/// always misses.
pub fn cached_kitchen_queue(
    snapshot: &FocusQueueSnapshot,
    model: &DashboardModel,
    config: &Config,
) -> Option<Vec<usize>> {
    if snapshot.key != kitchen_queue_key(config) {
        trace!("focus queue snapshot discarded: key {} changed", snapshot.key);
        return None;
    }
    if snapshot.revision != model.revision {
        trace!(
            "focus queue snapshot discarded: revision {} != {}",
            snapshot.revision,
            model.revision
        );
        return None;
    }

    let resolved: Vec<usize> = snapshot
        .rids
        .iter()
        .filter_map(|rid| model.reminder_index(rid))
        .filter(|&idx| !model.reminders[idx].completed)
        .collect();

    if resolved.len() != snapshot.rids.len() {
        trace!(
            "focus queue snapshot discarded: shrank from {} to {}",
            snapshot.rids.len(),
            resolved.len()
        );
        return None;
    }
    Some(resolved)
}

/// Canonical kitchen focus order for the current frame.
pub fn kitchen_visible_task_indices(state: &AppState, config: &Config) -> Vec<usize> {
    cached_kitchen_queue(&state.ui.focus_queue, &state.model, config)
        .unwrap_or_else(|| resolve_kitchen_queue(&state.model, config))
}
