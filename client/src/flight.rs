//! Single-flight guard of a cursor client.

use std::sync::atomic::{AtomicBool, Ordering};

/// Marks whether a client has a request outstanding.
#[derive(Debug, Default)]
pub struct Flight(AtomicBool);

/// Holds the flight open. Dropping it lands the flight, including when the
/// future owning it is cancelled.
#[derive(Debug)]
#[must_use = "the flight lands as soon as the guard is dropped"]
pub struct FlightGuard<'flight>(&'flight AtomicBool);

impl Flight {
    /// Take off unless a request is already outstanding.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(&self.0))
    }

    /// Whether a request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
