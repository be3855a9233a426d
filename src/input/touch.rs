//! Touch input samples

use serde::{Deserialize, Serialize};

/// Phase of a raw touch sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw touch sample from the platform input system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    /// Monotonic timestamp in milliseconds
    #[serde(alias = "t")]
    pub timestamp_ms: u64,
    pub phase: TouchPhase,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, timestamp_ms: u64, phase: TouchPhase) -> Self {
        Self { x, y, timestamp_ms, phase }
    }

    pub fn down(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(x, y, timestamp_ms, TouchPhase::Down)
    }

    pub fn moved(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(x, y, timestamp_ms, TouchPhase::Move)
    }

    pub fn up(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(x, y, timestamp_ms, TouchPhase::Up)
    }

    pub fn cancel(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(x, y, timestamp_ms, TouchPhase::Cancel)
    }
}
