//! Pointer and keyboard handling
//!
//! Input is applied immediately rather than queued into the next tick: a pop
//! resolves against the bubbles exactly where they were drawn.

use glam::Vec2;

use super::bubble::{Popped, SpecialEffect};
use super::progression;
use super::scoring;
use super::state::{GameEvent, GamePhase, GameState};
use super::tick::toggle_pause;
use crate::consts::*;
use crate::ledger::{self, Modifier, SecretCode};
use crate::profile::Profile;

/// Pop the topmost bubble under `point`. Returns true if something popped.
///
/// A click that hits nothing breaks the combo.
pub fn pointer_down(state: &mut GameState, profile: &mut Profile, point: Vec2, now: f64) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }

    // Topmost (last drawn) first; bubbles already popping fall through
    let hit = state
        .bubbles
        .iter_mut()
        .rev()
        .find(|b| b.hit_test(point, HIT_SLOP) && b.is_active())
        .and_then(|b| b.pop());
    let Some(Popped { kind, points, effect }) = hit else {
        state.combo.miss();
        return false;
    };

    profile.stats.record_pop();
    if let Some(effect) = effect {
        apply_special_effect(state, effect);
    }

    let combo = state.combo.hit();
    let award = scoring::award(points, combo, state.effects.points_multiplier());
    state.add_score(award);
    state.events.push(GameEvent::BubblePopped { kind, award, combo });
    log::trace!("Popped {:?} for {} (combo {})", kind, award, combo);

    progression::add_progress(state, profile, award);
    progression::check_achievements(state, profile, now);
    true
}

/// Update hover flags. Returns true when the pointer is over a bubble.
pub fn pointer_move(state: &mut GameState, point: Vec2) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    let mut any = false;
    for bubble in &mut state.bubbles {
        bubble.hovered = bubble.is_active() && bubble.hit_test(point, 0.0);
        any |= bubble.hovered;
    }
    any
}

/// Handle a key press (`key` uses DOM `KeyboardEvent.key` naming)
pub fn key_down(state: &mut GameState, profile: &mut Profile, key: &str, now: f64) {
    match state.phase {
        GamePhase::Running => {}
        GamePhase::Paused => {
            if key == "Escape" {
                toggle_pause(state);
            }
            return;
        }
        GamePhase::Ready | GamePhase::GameOver => return,
    }

    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        state.secret_input.push(ch);
        if let Some(code) = profile.ledger.check_secret_input(&mut state.secret_input) {
            apply_code(state, profile, code, now);
        }
    }

    match key {
        "Escape" => {
            toggle_pause(state);
        }
        " " if profile.ledger.has_code(SecretCode::Combo) => {
            activate_modifier(state, profile, Modifier::SuperCombo);
        }
        "r" if profile.ledger.has_code(SecretCode::Bubble) => {
            activate_modifier(state, profile, Modifier::RainbowMode);
        }
        "g" if profile.ledger.has_code(SecretCode::Bubble) => {
            activate_modifier(state, profile, Modifier::GiantBubbles);
        }
        "a" if profile.ledger.has_code(SecretCode::Pop) => {
            activate_modifier(state, profile, Modifier::AntiGravity);
        }
        _ => {}
    }
}

fn apply_special_effect(state: &mut GameState, effect: SpecialEffect) {
    match effect {
        SpecialEffect::SlowTime => state.effects.activate_slow_time(SLOW_TIME_MS),
        SpecialEffect::DoublePoints => state.effects.activate_double_points(DOUBLE_POINTS_MS),
        SpecialEffect::ExtraLife => state.lives += 1,
    }
    log::debug!("Special effect {:?}", effect);
    state.events.push(GameEvent::EffectStarted(effect));
}

/// Turn on a modifier and apply it to bubbles already in play
pub fn activate_modifier(state: &mut GameState, profile: &mut Profile, modifier: Modifier) -> bool {
    if !profile.ledger.activate_modifier(modifier) {
        return false;
    }

    match modifier {
        Modifier::RainbowMode => {
            for bubble in &mut state.bubbles {
                bubble.rainbow = true;
            }
        }
        Modifier::GiantBubbles => {
            for bubble in &mut state.bubbles {
                bubble.radius *= GIANT_SCALE;
            }
        }
        Modifier::AntiGravity => {
            for bubble in &mut state.bubbles {
                bubble.gravity = -bubble.gravity;
            }
        }
        Modifier::SuperCombo => {
            let count = state.combo.count.max(5);
            state.combo.force(count, 3000.0);
        }
        _ => {}
    }

    log::info!("Modifier {:?} activated", modifier);
    state.events.push(GameEvent::ModifierActivated(modifier));
    true
}

/// Immediate bonuses of a freshly typed code (its flags are already recorded)
pub fn apply_code(state: &mut GameState, profile: &mut Profile, code: SecretCode, now: f64) {
    match code {
        SecretCode::GodMode => {
            state.lives = IMMORTAL_LIVES;
            state.effects.base_multiplier = 10.0;
            state.combo.force(20, COMBO_WINDOW_MS * 10.0);
            state.add_score(50_000);
            state.effects.base_time_scale = 0.3;
            progression::grant_achievement(state, profile, &ledger::GOD_MODE, now);
        }
        SecretCode::Money => {
            state.add_score(10_000);
            state.effects.base_multiplier = state.effects.base_multiplier.max(5.0);
        }
        SecretCode::Speed => {
            state.effects.base_time_scale = SLOW_TIME_SCALE;
        }
        SecretCode::Life => {
            state.lives = 99;
        }
        SecretCode::Master => {
            state.lives = IMMORTAL_LIVES;
            state.effects.base_multiplier = 20.0;
            state.combo.force(50, COMBO_WINDOW_MS * 20.0);
            state.add_score(100_000);
            state.effects.base_time_scale = 0.2;
            state.level += 5;
            profile.stats.record_level(state.level);
            for def in &ledger::MASTER_CATALOG {
                progression::grant_achievement(state, profile, def, now);
            }
        }
        SecretCode::Immortal => {
            state.immortal = true;
            state.lives = IMMORTAL_LIVES;
            progression::grant_achievement(state, profile, &ledger::IMMORTAL, now);
        }
        SecretCode::Points => {
            state.add_score(1000);
            progression::add_progress(state, profile, 1000);
        }
        SecretCode::Bubble | SecretCode::Pop | SecretCode::Combo => {}
    }
    state.events.push(GameEvent::CodeActivated(code));
}
