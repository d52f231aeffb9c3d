//! Score awards and combo chain timing

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Points for one pop: `points × (1 + (combo − 1) × 0.1) × multiplier`, rounded
pub fn award(points: i64, combo: u32, multiplier: f32) -> i64 {
    let chain = combo.max(1) - 1;
    let factor = 1.0 + chain as f64 * COMBO_STEP;
    (points as f64 * factor * multiplier as f64).round() as i64
}

/// Chain of successive pops inside a decaying window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Time left in the window (ms)
    pub timer_ms: f32,
}

impl Combo {
    /// Register a successful pop; returns the new chain length
    pub fn hit(&mut self) -> u32 {
        self.count += 1;
        self.timer_ms = COMBO_WINDOW_MS;
        self.count
    }

    /// A click that popped nothing breaks the chain immediately
    pub fn miss(&mut self) {
        self.count = 0;
    }

    /// Count down the window; returns true if the chain just expired
    pub fn decay(&mut self, dt_ms: f32) -> bool {
        if self.timer_ms <= 0.0 {
            return false;
        }
        self.timer_ms -= dt_ms;
        if self.timer_ms <= 0.0 {
            self.timer_ms = 0.0;
            let expired = self.count > 0;
            self.count = 0;
            return expired;
        }
        false
    }

    /// Force a chain length and window (cheat codes, super-combo)
    pub fn force(&mut self, count: u32, timer_ms: f32) {
        self.count = count;
        self.timer_ms = timer_ms;
    }

    pub fn is_active(&self) -> bool {
        self.count > 0 && self.timer_ms > 0.0
    }
}
