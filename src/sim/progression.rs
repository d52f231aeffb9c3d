//! Level pacing, lives and game over
//!
//! Level-ups are checked once per scoring event. Life loss can be blocked by
//! ledger immortality (no life lost at all) or absorbed by session immortality
//! (lives refilled instead of game over).

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::ledger::{self, SecretCode};
use crate::profile::Profile;

/// Result of a bubble escaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// Immortality flags kept the life
    Spared,
    /// One life lost, game continues
    Lost,
    /// Lives ran out but session immortality refilled them
    Saved,
    /// Lives ran out
    GameOver,
}

/// Add level progress, then run one level-up check
pub fn add_progress(state: &mut GameState, profile: &mut Profile, amount: i64) -> bool {
    state.level_progress = (state.level_progress + amount as f64).max(0.0);
    check_level_up(state, profile)
}

/// Level up once if progress reached the target
pub fn check_level_up(state: &mut GameState, profile: &mut Profile) -> bool {
    if state.level_progress < state.level_target {
        return false;
    }
    state.level += 1;
    state.level_progress = 0.0;
    state.level_target = (state.level_target * LEVEL_TARGET_GROWTH).round();
    state.spawner.speed_up();
    profile.stats.record_level(state.level);

    log::info!(
        "Level up! Now level {} (next target {}, spawn every {:.0}ms)",
        state.level,
        state.level_target,
        state.spawner.rate_ms
    );
    state.events.push(GameEvent::LevelUp { level: state.level });
    true
}

/// A non-obstacle bubble escaped
pub fn lose_life(state: &mut GameState, profile: &mut Profile) -> LifeOutcome {
    if profile.ledger.blocks_life_loss() {
        log::debug!("Immortality active - no life lost");
        return LifeOutcome::Spared;
    }

    state.lives -= 1;
    state.events.push(GameEvent::LifeLost { lives: state.lives });
    log::info!("Lost a life, {} remaining", state.lives);

    if state.lives > 0 {
        return LifeOutcome::Lost;
    }

    if state.immortal {
        state.lives = IMMORTAL_LIVES;
        state.events.push(GameEvent::ImmortalSaved);
        log::info!("Immortality absorbed game over");
        return LifeOutcome::Saved;
    }

    enter_game_over(state, profile);
    LifeOutcome::GameOver
}

/// Terminal transition
pub fn enter_game_over(state: &mut GameState, profile: &mut Profile) {
    state.phase = GamePhase::GameOver;
    if profile.stats.record_final_score(state.score) {
        log::info!("New best score: {}", state.score);
    }
    log::info!("Game over at level {} with {} points", state.level, state.score);
    state.events.push(GameEvent::GameOver { score: state.score });
}

/// Unlock an achievement and report it if new
pub fn grant_achievement(
    state: &mut GameState,
    profile: &mut Profile,
    def: &ledger::AchievementDef,
    now: f64,
) {
    if profile.unlock_achievement(def, now) {
        state.events.push(GameEvent::AchievementUnlocked {
            id: def.id.to_string(),
            title: def.title.to_string(),
        });
    }
}

/// Score/combo/level milestones, checked after every successful pop
pub fn check_achievements(state: &mut GameState, profile: &mut Profile, now: f64) {
    if state.score >= 1000 {
        grant_achievement(state, profile, &ledger::SCORE_1000, now);
    }
    if state.score >= 5000 {
        grant_achievement(state, profile, &ledger::SCORE_5000, now);
    }
    if state.combo.count >= 5 {
        grant_achievement(state, profile, &ledger::COMBO_5, now);
    }
    if state.combo.count >= 10 {
        grant_achievement(state, profile, &ledger::COMBO_10, now);
        profile.ledger.unlock_code(SecretCode::Combo);
    }
    if state.level >= 5 {
        grant_achievement(state, profile, &ledger::LEVEL_5, now);
    }
    if state.level >= 10 {
        grant_achievement(state, profile, &ledger::LEVEL_10, now);
        profile.ledger.unlock_code(SecretCode::Bubble);
    }
    profile.stats.record_combo(state.combo.count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Modifier;

    fn running() -> (GameState, Profile) {
        let mut state = GameState::new(11);
        state.phase = GamePhase::Running;
        (state, Profile::default())
    }

    #[test]
    fn test_single_level_up_at_target() {
        let (mut state, mut profile) = running();
        assert!(!add_progress(&mut state, &mut profile, 200));
        assert!(!add_progress(&mut state, &mut profile, 250));
        assert!(add_progress(&mut state, &mut profile, 60));
        assert_eq!(state.level, 2);
        assert_eq!(state.level_progress, 0.0);
        assert_eq!(state.level_target, 750.0);
        assert!((state.spawner.rate_ms - 900.0).abs() < 1e-3);
        assert_eq!(profile.stats.max_level, 2);
    }

    #[test]
    fn test_large_award_levels_up_once() {
        let (mut state, mut profile) = running();
        assert!(add_progress(&mut state, &mut profile, 5000));
        assert_eq!(state.level, 2);
        assert_eq!(state.level_progress, 0.0);
    }

    #[test]
    fn test_progress_never_negative() {
        let (mut state, mut profile) = running();
        add_progress(&mut state, &mut profile, -20);
        assert_eq!(state.level_progress, 0.0);
    }

    #[test]
    fn test_life_loss_to_game_over() {
        let (mut state, mut profile) = running();
        state.score = 120;
        assert_eq!(lose_life(&mut state, &mut profile), LifeOutcome::Lost);
        assert_eq!(lose_life(&mut state, &mut profile), LifeOutcome::Lost);
        assert_eq!(lose_life(&mut state, &mut profile), LifeOutcome::GameOver);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(profile.stats.best_score, 120);
        assert!(state.events.contains(&GameEvent::GameOver { score: 120 }));
    }

    #[test]
    fn test_session_immortality_absorbs_game_over() {
        let (mut state, mut profile) = running();
        state.immortal = true;
        state.lives = 1;
        assert_eq!(lose_life(&mut state, &mut profile), LifeOutcome::Saved);
        assert_eq!(state.lives, IMMORTAL_LIVES);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_ledger_immortality_spares_life() {
        let (mut state, mut profile) = running();
        profile.ledger.activate_modifier(Modifier::Immortal);
        assert_eq!(lose_life(&mut state, &mut profile), LifeOutcome::Spared);
        assert_eq!(state.lives, START_LIVES);
    }

    #[test]
    fn test_achievements_unlock_once() {
        let (mut state, mut profile) = running();
        state.score = 1200;
        state.combo.force(10, 500.0);
        check_achievements(&mut state, &mut profile, 1.0);
        check_achievements(&mut state, &mut profile, 2.0);
        let ids: Vec<_> = profile.ledger.achievements().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["score1000", "combo5", "combo10"]);
        assert_eq!(profile.secrets_found(), 3);
        assert!(profile.ledger.has_code(SecretCode::Combo));
        assert_eq!(profile.stats.highest_combo, 10);
    }
}
