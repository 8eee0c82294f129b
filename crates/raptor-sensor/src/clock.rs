//! Simulation clock as seen by the dispatcher.
//!
//! The only thing the adapter needs from the host clock is its time scale: a
//! scale of exactly zero means the simulation is paused and every inbound
//! record is discarded.

use std::sync::atomic::{AtomicU32, Ordering};

/// Read-only view of the host simulation clock.
pub trait SimClock: Send + Sync {
    /// Current time scale (`1.0` = real time, `0.0` = paused).
    fn time_scale(&self) -> f32;

    fn is_paused(&self) -> bool {
        self.time_scale() == 0.0
    }
}

/// Clock whose time scale can be changed from any thread.
///
/// The scale is stored as raw `f32` bits in an atomic.
#[derive(Debug)]
pub struct SharedClock {
    scale_bits: AtomicU32,
}

impl SharedClock {
    /// A running clock (time scale `1.0`).
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    pub fn with_time_scale(scale: f32) -> Self {
        Self {
            scale_bits: AtomicU32::new(scale.to_bits()),
        }
    }

    pub fn set_time_scale(&self, scale: f32) {
        self.scale_bits.store(scale.to_bits(), Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.set_time_scale(0.0);
    }

    pub fn resume(&self) {
        self.set_time_scale(1.0);
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock for SharedClock {
    fn time_scale(&self) -> f32 {
        f32::from_bits(self.scale_bits.load(Ordering::SeqCst))
    }
}
