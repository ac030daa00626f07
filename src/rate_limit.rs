//! Outbound request throttling.
//!
//! `RateLimiter` hands out request slots at least `interval` apart and is
//! shared by every worker calling the same provider. `Throttled` wraps a
//! collaborator so each geocode or ordering call waits for a slot first.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{GeocodeError, SequencingError};
use crate::traits::{GeoPoint, Geocoder, OrderedRoute, RouteOrderer, TravelMode};

/// Minimum-interval limiter. A zero interval never blocks.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Block until the next slot is due.
    pub fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let now = Instant::now();
        let slot = {
            let mut next = self.next_slot.lock();
            let slot = next.map_or(now, |due| due.max(now));
            *next = Some(slot + self.interval);
            slot
        };

        if slot > now {
            thread::sleep(slot - now);
        }
    }
}

/// A collaborator whose calls are gated by a shared limiter.
pub struct Throttled<'a, T: ?Sized> {
    inner: &'a T,
    limiter: &'a RateLimiter,
}

impl<'a, T: ?Sized> Throttled<'a, T> {
    pub fn new(inner: &'a T, limiter: &'a RateLimiter) -> Self {
        Self { inner, limiter }
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Throttled<'_, T> {
    fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodeError> {
        self.limiter.acquire();
        self.inner.geocode(address)
    }
}

impl<T: RouteOrderer + ?Sized> RouteOrderer for Throttled<'_, T> {
    fn order(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<OrderedRoute, SequencingError> {
        self.limiter.acquire();
        self.inner.order(origin, destination, waypoints)
    }

    fn max_waypoints(&self) -> Option<usize> {
        self.inner.max_waypoints()
    }

    fn requires_coordinates(&self) -> bool {
        self.inner.requires_coordinates()
    }

    fn travel_mode(&self) -> Option<TravelMode> {
        self.inner.travel_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_does_not_block() {
        let limiter = RateLimiter::unlimited();
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire();
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_slots_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(20));
        let start = Instant::now();
        for _ in 0..4 {
            limiter.acquire();
        }
        // First slot is immediate, the next three wait one interval each.
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_slots_are_spaced_across_threads() {
        let limiter = RateLimiter::new(Duration::from_millis(15));
        let start = Instant::now();
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| limiter.acquire());
            }
        });
        assert!(start.elapsed() >= Duration::from_millis(45));
    }
}
