//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame deltas from animation-frame timestamps
//! - Wall-clock time (achievement unlock stamps)

use crate::consts::MAX_FRAME_DELTA_MS;

/// Turns absolute frame timestamps into deltas
///
/// A single frame never reports more than `MAX_FRAME_DELTA_MS`, which only
/// matters when the host stalls (a hidden tab pauses the game first).
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous timestamp, clamped to `MAX_FRAME_DELTA_MS`.
    ///
    /// The first call after creation or `rebase` returns 0.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS as f64) as f32,
            None => 0.0,
        };
        self.last = Some(timestamp_ms);
        dt
    }

    /// Forget the previous timestamp (after start or resume)
    pub fn rebase(&mut self) {
        self.last = None;
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
