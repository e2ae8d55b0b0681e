//! Single-flight guard
//!
//! At most one holder per key. A second caller for a key that is already in
//! flight is turned away instead of queued; the slot frees itself when the
//! guard is dropped, whether the work finished, failed or was abandoned.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct SingleFlight {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if someone already holds it.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<FlightGuard> {
        let key = key.into();
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(key.clone()) {
            return None;
        }

        Some(FlightGuard {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct FlightGuard {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let flights = SingleFlight::new();

        let _guard = flights.try_acquire("recursion|activity").unwrap();
        assert!(flights.try_acquire("recursion|activity").is_none());

        // Other keys are independent.
        let other = flights.try_acquire("recursion|votes");
        assert!(other.is_some());
    }

    #[test]
    fn test_drop_releases_slot() {
        let flights = SingleFlight::new();

        {
            let _guard = flights.try_acquire("closures").unwrap();
        }

        assert!(flights.try_acquire("closures").is_some());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let flights = SingleFlight::new();
        let clone = flights.clone();

        let guard = flights.try_acquire("lifetimes").unwrap();
        let handle = tokio::spawn(async move { clone.try_acquire("lifetimes").is_none() });
        assert!(handle.await.unwrap());

        drop(guard);
        assert!(flights.try_acquire("lifetimes").is_some());
    }
}
