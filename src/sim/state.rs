//! Game state and core simulation types
//!
//! Everything a running game owns lives here. Restarting replaces it wholesale
//! except for the RNG stream, the play area and session immortality.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleKind, SpecialEffect};
use super::effects::{Effects, ExpiredEffect};
use super::scoring::Combo;
use super::spawner::{SpawnParams, Spawner, spawn_bubble};
use crate::consts::*;
use crate::ledger::{Modifier, SecretBuffer, SecretCode};
use crate::profile::Profile;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, not started yet
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Things that happened during a tick or input call, for the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    BubblePopped {
        kind: BubbleKind,
        award: i64,
        combo: u32,
    },
    ComboBroken,
    EffectStarted(SpecialEffect),
    EffectExpired(ExpiredEffect),
    LevelUp {
        level: u32,
    },
    LifeLost {
        lives: i32,
    },
    /// Immortality absorbed what would have been game over
    ImmortalSaved,
    GameOver {
        score: i64,
    },
    CodeActivated(SecretCode),
    ModifierActivated(Modifier),
    AchievementUnlocked {
        id: String,
        title: String,
    },
}

/// Complete state of one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG stream started from
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Play area size (width, height)
    pub area: Vec2,
    pub score: i64,
    pub level: u32,
    pub lives: i32,
    pub level_progress: f64,
    pub level_target: f64,
    pub combo: Combo,
    pub spawner: Spawner,
    pub effects: Effects,
    /// Session immortality: absorbs game over instead of preventing life loss
    pub immortal: bool,
    pub secret_input: SecretBuffer,
    /// Live bubbles, in spawn order (later ones draw on top)
    pub bubbles: Vec<Bubble>,
    /// Scaled simulation time since start (ms)
    pub time_ms: f64,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            area: Vec2::new(800.0, 600.0),
            score: 0,
            level: 1,
            lives: START_LIVES,
            level_progress: 0.0,
            level_target: START_LEVEL_TARGET,
            combo: Combo::default(),
            spawner: Spawner::default(),
            effects: Effects::default(),
            immortal: false,
            secret_input: SecretBuffer::default(),
            bubbles: Vec::new(),
            time_ms: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset everything a new game starts fresh with
    pub fn reset(&mut self, spawn_rate_ms: f32) {
        self.phase = GamePhase::Ready;
        self.score = 0;
        self.level = 1;
        self.lives = START_LIVES;
        self.level_progress = 0.0;
        self.level_target = START_LEVEL_TARGET;
        self.combo = Combo::default();
        self.spawner = Spawner::new(spawn_rate_ms);
        self.effects = Effects::default();
        self.secret_input.clear();
        self.bubbles.clear();
        self.time_ms = 0.0;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resize the play area, enforcing the minimum size
    pub fn set_play_area(&mut self, width: f32, height: f32) {
        if width < MIN_PLAY_WIDTH || height < MIN_PLAY_HEIGHT {
            log::warn!(
                "Play area {}x{} too small, using at least {}x{}",
                width,
                height,
                MIN_PLAY_WIDTH,
                MIN_PLAY_HEIGHT
            );
        }
        self.area = Vec2::new(width.max(MIN_PLAY_WIDTH), height.max(MIN_PLAY_HEIGHT));
    }

    /// Add (or subtract) score, never dropping below zero
    pub fn add_score(&mut self, amount: i64) {
        self.score = (self.score + amount).max(0);
    }

    /// Spawn one bubble using the current modifiers and secrets bonus
    pub fn spawn_bubble(&mut self, profile: &Profile) {
        let ledger = &profile.ledger;
        let params = SpawnParams {
            area: self.area,
            level: self.level,
            secrets_found: profile.secrets_found(),
            giant: ledger.has_modifier(Modifier::GiantBubbles),
            anti_gravity: ledger.has_modifier(Modifier::AntiGravity),
            rainbow: ledger.has_modifier(Modifier::RainbowMode),
        };
        let id = self.next_entity_id();
        let bubble = spawn_bubble(id, &mut self.rng, &params);
        self.bubbles.push(bubble);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Fraction of the current level completed (0-1), for progress bars
    pub fn level_fraction(&self) -> f32 {
        if self.level_target <= 0.0 {
            return 0.0;
        }
        (self.level_progress / self.level_target).clamp(0.0, 1.0) as f32
    }

    /// Number of bubbles still in play (not mid-pop)
    pub fn active_bubbles(&self) -> usize {
        self.bubbles.iter().filter(|b| b.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.level_target, START_LEVEL_TARGET);
        assert_eq!(state.effects.time_scale(), 1.0);
        assert_eq!(state.effects.points_multiplier(), 1.0);
    }

    #[test]
    fn test_score_never_negative() {
        let mut state = GameState::new(1);
        state.add_score(10);
        state.add_score(-20);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_play_area_minimum() {
        let mut state = GameState::new(1);
        state.set_play_area(100.0, 1000.0);
        assert_eq!(state.area, Vec2::new(MIN_PLAY_WIDTH, 1000.0));
    }

    #[test]
    fn test_reset_keeps_session_immortality() {
        let mut state = GameState::new(1);
        state.immortal = true;
        state.score = 900;
        state.lives = 1;
        state.reset(600.0);
        assert!(state.immortal);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.spawner.rate_ms, 600.0);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(5);
        let profile = Profile::default();
        for _ in 0..5 {
            state.spawn_bubble(&profile);
        }
        let mut ids: Vec<_> = state.bubbles.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
