//! Delivery deduplication.
//!
//! Slack and the storage trigger both redeliver events they think were lost.
//! The guard remembers event IDs for a TTL so each delivery is processed once
//! per process.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entry count above which stale IDs are swept on insert.
const SWEEP_THRESHOLD: usize = 10_000;

/// In-memory map of event ID → first-seen time.
///
/// Thread-safe via `std::sync::Mutex` (non-async, held briefly).
pub struct DedupGuard {
    ttl: Duration,
    seen: Mutex<HashMap<String, Instant>>,
}

impl DedupGuard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Record `event_id`. Returns `true` the first time an ID is seen within
    /// the TTL, `false` for a redelivery.
    pub fn first_seen(&self, event_id: &str) -> bool {
        self.first_seen_at(event_id, Instant::now())
    }

    fn first_seen_at(&self, event_id: &str, now: Instant) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());

        if seen.len() > SWEEP_THRESHOLD {
            seen.retain(|_, at| now.duration_since(*at) < self.ttl);
        }

        match seen.get(event_id) {
            Some(at) if now.duration_since(*at) < self.ttl => false,
            _ => {
                seen.insert(event_id.to_string(), now);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_delivery_is_a_duplicate() {
        let guard = DedupGuard::new(Duration::from_secs(600));
        assert!(guard.first_seen("Ev01"));
        assert!(!guard.first_seen("Ev01"));
        assert!(guard.first_seen("Ev02"));
    }

    #[test]
    fn ids_expire_after_ttl() {
        let guard = DedupGuard::new(Duration::from_secs(10));
        let start = Instant::now();
        assert!(guard.first_seen_at("Ev01", start));
        assert!(!guard.first_seen_at("Ev01", start + Duration::from_secs(9)));
        assert!(guard.first_seen_at("Ev01", start + Duration::from_secs(11)));
    }

    #[test]
    fn stale_entries_are_swept_when_large() {
        let guard = DedupGuard::new(Duration::from_secs(1));
        let start = Instant::now();
        for i in 0..=SWEEP_THRESHOLD {
            guard.first_seen_at(&format!("old-{i}"), start);
        }
        assert_eq!(guard.len(), SWEEP_THRESHOLD + 1);

        guard.first_seen_at("fresh", start + Duration::from_secs(5));
        assert_eq!(guard.len(), 1);
    }
}
