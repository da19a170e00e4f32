//! Content-addressed memo for AI reports.
//!
//! Keys are the serialized request input. Concurrent callers asking for the
//! same key share a single provider call; only successful results are kept,
//! so a failure leaves the key free for the next attempt. The map is bounded:
//! past `capacity` keys the least recently used entry is dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};

pub const DEFAULT_CAPACITY: usize = 256;

/// Stable text form of a request input.
pub fn fingerprint<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Order-insensitive key for a set of university ids.
pub fn id_set_key(ids: &[String]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted.join(",")
}

struct Slot<T> {
    cell: Arc<OnceCell<T>>,
    last_used: u64,
}

struct Slots<T> {
    clock: u64,
    map: HashMap<String, Slot<T>>,
}

pub struct ResponseCache<T> {
    enabled: bool,
    capacity: usize,
    slots: Mutex<Slots<T>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self {
            enabled,
            capacity,
            slots: Mutex::new(Slots {
                clock: 0,
                map: HashMap::new(),
            }),
        }
    }

    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: String, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled || self.capacity == 0 {
            return fetch().await;
        }
        let cell = self.checkout(&key).await;
        let result = cell.get_or_try_init(fetch).await.cloned();
        if result.is_err() {
            self.release(&key, &cell).await;
        }
        result
    }

    /// Returns the cell for `key`, creating it and evicting the least
    /// recently used entry when the map is full.
    async fn checkout(&self, key: &str) -> Arc<OnceCell<T>> {
        let mut slots = self.slots.lock().await;
        slots.clock += 1;
        let now = slots.clock;
        if let Some(slot) = slots.map.get_mut(key) {
            slot.last_used = now;
            return slot.cell.clone();
        }

        if slots.map.len() >= self.capacity {
            let oldest = slots
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                slots.map.remove(&oldest);
            }
        }

        let cell = Arc::new(OnceCell::new());
        slots.map.insert(
            key.to_string(),
            Slot {
                cell: cell.clone(),
                last_used: now,
            },
        );
        cell
    }

    /// Forgets a key whose fetch failed, unless another caller has since
    /// filled or replaced the cell.
    async fn release(&self, key: &str, cell: &Arc<OnceCell<T>>) {
        let mut slots = self.slots.lock().await;
        let empty = slots
            .map
            .get(key)
            .is_some_and(|slot| Arc::ptr_eq(&slot.cell, cell) && !slot.cell.initialized());
        if empty {
            slots.map.remove(key);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.slots.lock().await.map.len()
    }
}
