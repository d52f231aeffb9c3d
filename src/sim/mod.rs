//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Deltas come from the caller, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod bubble;
pub mod effects;
pub mod input;
pub mod physics;
pub mod progression;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, BubbleKind, BubblePhase, Popped, Sparkle, SpecialEffect};
pub use effects::{Effects, ExpiredEffect};
pub use input::{activate_modifier, apply_code, key_down, pointer_down, pointer_move};
pub use physics::BubbleFate;
pub use progression::LifeOutcome;
pub use scoring::Combo;
pub use spawner::{SpawnParams, Spawner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{start_game, tick, toggle_pause};
