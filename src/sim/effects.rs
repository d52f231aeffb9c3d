//! Timed global modifiers
//!
//! Slow-time and double-points are countdowns decremented once per tick.
//! Re-activating an effect overwrites its countdown; durations never stack.
//! Cheat codes may set permanent base values underneath the timed effects.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A timed effect that just ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiredEffect {
    SlowTime,
    DoublePoints,
}

/// Time-scale and score-multiplier state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effects {
    /// Permanent time scale (1 unless a code slowed the game for good)
    pub base_time_scale: f32,
    /// Permanent score multiplier (1 unless a code raised it)
    pub base_multiplier: f32,
    /// Remaining slow-time (ms)
    pub slow_time_ms: f32,
    /// Remaining double-points (ms)
    pub double_points_ms: f32,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            base_time_scale: 1.0,
            base_multiplier: 1.0,
            slow_time_ms: 0.0,
            double_points_ms: 0.0,
        }
    }
}

impl Effects {
    /// Start (or restart) slow-time
    pub fn activate_slow_time(&mut self, duration_ms: f32) {
        self.slow_time_ms = duration_ms;
    }

    /// Start (or restart) double-points
    pub fn activate_double_points(&mut self, duration_ms: f32) {
        self.double_points_ms = duration_ms;
    }

    pub fn is_slow_time(&self) -> bool {
        self.slow_time_ms > 0.0 || self.base_time_scale < 1.0
    }

    pub fn is_double_points(&self) -> bool {
        self.double_points_ms > 0.0
    }

    /// Multiplier applied to tick deltas
    pub fn time_scale(&self) -> f32 {
        if self.slow_time_ms > 0.0 {
            self.base_time_scale.min(SLOW_TIME_SCALE)
        } else {
            self.base_time_scale
        }
    }

    /// Multiplier applied to score awards
    pub fn points_multiplier(&self) -> f32 {
        if self.double_points_ms > 0.0 {
            self.base_multiplier * DOUBLE_POINTS_FACTOR
        } else {
            self.base_multiplier
        }
    }

    /// Count down timed effects by unscaled time
    pub fn advance(&mut self, dt_ms: f32) -> Vec<ExpiredEffect> {
        let mut expired = Vec::new();
        if self.slow_time_ms > 0.0 {
            self.slow_time_ms -= dt_ms;
            if self.slow_time_ms <= 0.0 {
                self.slow_time_ms = 0.0;
                expired.push(ExpiredEffect::SlowTime);
            }
        }
        if self.double_points_ms > 0.0 {
            self.double_points_ms -= dt_ms;
            if self.double_points_ms <= 0.0 {
                self.double_points_ms = 0.0;
                expired.push(ExpiredEffect::DoublePoints);
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let effects = Effects::default();
        assert_eq!(effects.time_scale(), 1.0);
        assert_eq!(effects.points_multiplier(), 1.0);
        assert!(!effects.is_slow_time());
        assert!(!effects.is_double_points());
    }

    #[test]
    fn test_slow_time_expires() {
        let mut effects = Effects::default();
        effects.activate_slow_time(SLOW_TIME_MS);
        assert_eq!(effects.time_scale(), SLOW_TIME_SCALE);
        assert!(effects.advance(4999.0).is_empty());
        assert_eq!(effects.advance(2.0), vec![ExpiredEffect::SlowTime]);
        assert_eq!(effects.time_scale(), 1.0);
    }

    #[test]
    fn test_reactivation_restarts_not_stacks() {
        let mut effects = Effects::default();
        effects.activate_double_points(DOUBLE_POINTS_MS);
        effects.advance(8000.0);
        effects.activate_double_points(DOUBLE_POINTS_MS);
        assert_eq!(effects.double_points_ms, DOUBLE_POINTS_MS);
        // The first activation's deadline no longer applies
        assert!(effects.advance(3000.0).is_empty());
        assert_eq!(effects.points_multiplier(), 2.0);
        assert_eq!(effects.advance(7000.0), vec![ExpiredEffect::DoublePoints]);
        assert_eq!(effects.points_multiplier(), 1.0);
    }

    #[test]
    fn test_double_points_scales_base() {
        let mut effects = Effects {
            base_multiplier: 5.0,
            ..Default::default()
        };
        effects.activate_double_points(DOUBLE_POINTS_MS);
        assert_eq!(effects.points_multiplier(), 10.0);
    }

    #[test]
    fn test_slow_time_expiry_keeps_permanent_scale() {
        let mut effects = Effects {
            base_time_scale: 0.3,
            ..Default::default()
        };
        effects.activate_slow_time(100.0);
        assert_eq!(effects.time_scale(), 0.3);
        effects.advance(200.0);
        assert_eq!(effects.time_scale(), 0.3);
        assert!(effects.is_slow_time());
    }
}
