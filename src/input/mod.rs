//! Input handling - touch samples and gesture recognition
//!
//! This module provides:
//! - Raw touch sample types
//! - Gesture recognition (taps, long press, swipes)
//! - The callback surface hosts implement to receive gestures

mod callbacks;
mod gestures;
mod touch;

pub use callbacks::*;
pub use gestures::*;
pub use touch::*;
