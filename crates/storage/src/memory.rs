use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::Store;

/// In-process [`Store`](crate::Store) used by tests and `--memory-store`.
///
/// Mirrors the Redis behavior the rest of the workspace depends on: lazy
/// key expiry, score-then-member ordering inside sorted sets, member dedup
/// on re-add, and rank normalization where out-of-range indexes clamp to an
/// empty range instead of failing.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    values: HashMap<String, Entry>,
    ranked: HashMap<String, Vec<(f64, String)>>,
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Normalize a `[start, stop]` rank pair against a collection of `len`
/// members. Returns ascending-rank bounds, or `None` for an empty range.
fn normalize_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }
    let mut start = if start < 0 { len + start } else { start };
    let mut stop = if stop < 0 { len + stop } else { stop };
    if start < 0 {
        start = 0;
    }
    if stop > len - 1 {
        stop = len - 1;
    }
    if start > stop || stop < 0 || start > len - 1 {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.lock();
        if inner.values.get(key).is_some_and(Entry::expired) {
            inner.values.remove(key);
            return Ok(None);
        }
        Ok(inner.values.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.values.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.lock();
        let (current, expires_at) = match inner.values.get(key) {
            Some(entry) if !entry.expired() => {
                let n = entry
                    .value
                    .parse::<i64>()
                    .map_err(|_| StoreError::Unavailable("value is not an integer".into()))?;
                (n, entry.expires_at)
            }
            _ => (0, None),
        };
        let next = current + 1;
        inner.values.insert(
            key.to_owned(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let set = inner.ranked.entry(key.to_owned()).or_default();
        match set.iter_mut().find(|(_, m)| m == member) {
            Some(slot) => slot.0 = score,
            None => set.push((score, member.to_owned())),
        }
        set.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        Ok(())
    }

    async fn zrem_range_by_rank(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let Some(set) = inner.ranked.get_mut(key) else {
            return Ok(0);
        };
        let Some((start, stop)) = normalize_range(set.len(), start, stop) else {
            return Ok(0);
        };
        let removed = set.drain(start..=stop).count();
        Ok(removed as u64)
    }

    async fn zrev_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let inner = self.lock();
        let Some(set) = inner.ranked.get(key) else {
            return Ok(Vec::new());
        };
        let Some((start, stop)) = normalize_range(set.len(), start, stop) else {
            return Ok(Vec::new());
        };
        Ok(set
            .iter()
            .rev()
            .skip(start)
            .take(stop - start + 1)
            .map(|(_, member)| member.clone())
            .collect())
    }
}
