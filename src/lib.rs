//! Bubble Pop - a click-driven arcade bubble popper
//!
//! Core modules:
//! - `sim`: Simulation (bubble physics, spawning, scoring, progression, effects)
//! - `ledger`: Persistent secret codes, modifiers and achievements
//! - `game`: Lifecycle facade wiring the simulation to its collaborators
//! - `renderer`: Drawing-surface abstraction and render descriptors
//! - `persistence`: Key-value document storage with default fallback
//! - `platform`: Frame clock and wall-clock helpers

pub mod audio;
pub mod game;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use game::Game;
pub use ledger::{Achievement, Ledger, Modifier, SecretCode};
pub use profile::Profile;
pub use settings::{Difficulty, Settings};
pub use stats::PlayStats;

/// Game configuration constants
pub mod consts {
    /// Reference frame length (ms). Per-frame physics constants are tuned for it.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest delta the frame clock reports for one animation frame
    pub const MAX_FRAME_DELTA_MS: f32 = 1000.0;

    /// Minimum play area (smaller surfaces are raised to this)
    pub const MIN_PLAY_WIDTH: f32 = 300.0;
    pub const MIN_PLAY_HEIGHT: f32 = 400.0;

    /// Bubble physics, per reference frame
    pub const GRAVITY: f32 = 0.03;
    pub const FRICTION: f32 = 0.98;
    pub const RESTITUTION: f32 = 0.7;
    /// Bubbles this far above the top edge are gone
    pub const EXIT_MARGIN: f32 = 100.0;

    /// Pop animation length in ticks (fixed, independent of frame pacing)
    pub const POP_FRAMES: u32 = 10;

    /// Bubble radius range and giant-mode scale
    pub const MIN_RADIUS: f32 = 20.0;
    pub const MAX_RADIUS: f32 = 40.0;
    pub const GIANT_SCALE: f32 = 1.5;
    /// Upward launch speed range (per reference frame)
    pub const MIN_RISE_SPEED: f32 = 1.0;
    pub const MAX_RISE_SPEED: f32 = 3.0;

    /// Hover easing
    pub const HOVER_SCALE: f32 = 1.15;
    pub const HOVER_EASE: f32 = 0.1;
    /// Extra hit radius for pointer-down (finger-friendly)
    pub const HIT_SLOP: f32 = 10.0;

    /// Combo chain window and per-step bonus
    pub const COMBO_WINDOW_MS: f32 = 1000.0;
    pub const COMBO_STEP: f64 = 0.1;
    /// Combo length at which the combo cue plays
    pub const COMBO_CUE_THRESHOLD: u32 = 3;

    /// Progression
    pub const START_LIVES: i32 = 3;
    pub const IMMORTAL_LIVES: i32 = 999;
    pub const START_LEVEL_TARGET: f64 = 500.0;
    pub const LEVEL_TARGET_GROWTH: f64 = 1.5;
    pub const SPAWN_RATE_DECAY: f32 = 0.9;
    pub const MIN_SPAWN_RATE_MS: f32 = 200.0;
    pub const DEFAULT_SPAWN_RATE_MS: f32 = 1000.0;
    pub const INITIAL_BUBBLES: usize = 10;
    /// Level from which bubbles launch faster, and the per-level boost
    pub const SPEED_RAMP_LEVEL: u32 = 5;
    pub const SPEED_RAMP_PER_LEVEL: f32 = 0.05;

    /// Timed effects
    pub const SLOW_TIME_SCALE: f32 = 0.5;
    pub const SLOW_TIME_MS: f32 = 5000.0;
    pub const DOUBLE_POINTS_FACTOR: f32 = 2.0;
    pub const DOUBLE_POINTS_MS: f32 = 10000.0;

    /// Spawn odds bonus per secret found
    pub const SECRET_ODDS_BONUS: f32 = 0.01;
    /// Secret input is forgotten after this long without a keystroke
    pub const SECRET_INPUT_TIMEOUT_MS: f32 = 2000.0;
}
