//! Timed bubble spawning
//!
//! Picks a category from a single uniform roll, places the bubble along the
//! bottom edge and launches it upward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleKind};
use crate::consts::*;

/// Category thresholds before the secrets bonus
const SPECIAL_ODDS: f32 = 0.05;
const RARE_ODDS: f32 = 0.15;
const OBSTACLE_ODDS: f32 = 0.25;

/// Map a uniform roll in [0, 1) to a bubble category.
///
/// Every secret found widens the Special and Rare bands by one percent.
pub fn choose_kind(roll: f32, secrets_found: u32) -> BubbleKind {
    let bonus = secrets_found as f32 * SECRET_ODDS_BONUS;
    if roll < SPECIAL_ODDS + bonus {
        BubbleKind::Special
    } else if roll < RARE_ODDS + bonus {
        BubbleKind::Rare
    } else if roll < OBSTACLE_ODDS {
        BubbleKind::Obstacle
    } else {
        BubbleKind::Normal
    }
}

/// Everything besides the RNG that shapes a new bubble
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    pub area: Vec2,
    pub level: u32,
    pub secrets_found: u32,
    pub giant: bool,
    pub anti_gravity: bool,
    pub rainbow: bool,
}

/// Create one bubble along the bottom edge
pub fn spawn_bubble<R: Rng>(id: u32, rng: &mut R, params: &SpawnParams) -> Bubble {
    let mut radius = rng.random_range(MIN_RADIUS..MAX_RADIUS);
    if params.giant {
        radius *= GIANT_SCALE;
    }

    let span = (params.area.x - radius * 2.0).max(0.0);
    let x = rng.random::<f32>() * span + radius;
    let y = params.area.y - radius;

    let kind = choose_kind(rng.random::<f32>(), params.secrets_found);
    let mut bubble = Bubble::new(id, Vec2::new(x, y), radius, kind, rng);

    let speed = rng.random_range(MIN_RISE_SPEED..MAX_RISE_SPEED);
    // Anti-gravity only flips the launch; gravity itself flips for bubbles
    // already in play when the modifier is switched on
    bubble.vel.y = if params.anti_gravity { speed } else { -speed };
    if params.level >= SPEED_RAMP_LEVEL {
        bubble.vel.y *= 1.0 + (params.level - SPEED_RAMP_LEVEL) as f32 * SPEED_RAMP_PER_LEVEL;
    }
    bubble.rainbow = params.rainbow;

    log::debug!("Spawned {:?} bubble {} at ({:.0}, {:.0}) r={:.1}", kind, id, x, y, radius);
    bubble
}

/// Accumulates scaled time and fires once per spawn interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Time since the last spawn (ms)
    pub timer_ms: f32,
    /// Interval between spawns (ms)
    pub rate_ms: f32,
}

impl Spawner {
    pub fn new(rate_ms: f32) -> Self {
        Self {
            timer_ms: 0.0,
            rate_ms: rate_ms.max(MIN_SPAWN_RATE_MS),
        }
    }

    /// Add elapsed time; returns true when a bubble is due
    pub fn maybe_spawn(&mut self, elapsed_ms: f32) -> bool {
        self.timer_ms += elapsed_ms;
        if self.timer_ms >= self.rate_ms {
            self.timer_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Shorten the interval after a level-up
    pub fn speed_up(&mut self) {
        self.rate_ms = (self.rate_ms * SPAWN_RATE_DECAY).max(MIN_SPAWN_RATE_MS);
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_RATE_MS)
    }
}
