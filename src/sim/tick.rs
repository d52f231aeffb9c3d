//! Variable-timestep simulation tick
//!
//! Core game loop: timers first, then spawning, then bubble motion. Physics is
//! scaled to the reference frame so pacing holds at any display refresh rate.

use super::physics::{self, BubbleFate};
use super::progression::{self, LifeOutcome};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::profile::Profile;

/// Begin (or restart) a game at the given starting spawn interval
pub fn start_game(state: &mut GameState, profile: &mut Profile, spawn_rate_ms: f32) {
    state.reset(spawn_rate_ms);
    state.phase = GamePhase::Running;

    for _ in 0..INITIAL_BUBBLES {
        state.spawn_bubble(profile);
    }
    profile.stats.record_game_started();

    if state.immortal {
        state.lives = IMMORTAL_LIVES;
    }

    log::info!(
        "Game started (seed {}, spawn every {:.0}ms)",
        state.seed,
        state.spawner.rate_ms
    );
    state.events.push(GameEvent::Started);
}

/// Flip between Running and Paused. Other phases are left alone.
pub fn toggle_pause(state: &mut GameState) -> GamePhase {
    match state.phase {
        GamePhase::Running => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Resumed);
        }
        _ => {}
    }
    state.phase
}

/// Advance the game by `dt_ms` of wall time. Negative deltas count as zero.
pub fn tick(state: &mut GameState, profile: &mut Profile, dt_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let dt_ms = dt_ms.max(0.0);

    // Effect durations and the code buffer run on wall time
    for expired in state.effects.advance(dt_ms) {
        log::debug!("{:?} wore off", expired);
        state.events.push(GameEvent::EffectExpired(expired));
    }
    state.secret_input.advance(dt_ms);

    let scaled = dt_ms * state.effects.time_scale();
    state.time_ms += scaled as f64;

    if state.spawner.maybe_spawn(scaled) {
        state.spawn_bubble(profile);
    }

    if state.combo.decay(scaled) {
        state.events.push(GameEvent::ComboBroken);
    }

    // Reverse so removals don't shift bubbles still to visit
    let area = state.area;
    let mut i = state.bubbles.len();
    while i > 0 {
        i -= 1;
        match physics::step_bubble(&mut state.bubbles[i], scaled, area) {
            BubbleFate::Alive => {}
            BubbleFate::Finished => {
                state.bubbles.remove(i);
            }
            BubbleFate::Escaped => {
                let bubble = state.bubbles.remove(i);
                if bubble.kind.costs_life()
                    && progression::lose_life(state, profile) == LifeOutcome::GameOver
                {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Modifier;
    use crate::sim::bubble::{Bubble, BubbleKind, BubblePhase};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn started(seed: u64) -> (GameState, Profile) {
        let mut state = GameState::new(seed);
        let mut profile = Profile::default();
        start_game(&mut state, &mut profile, 1000.0);
        (state, profile)
    }

    fn escaping_bubble(id: u32, kind: BubbleKind) -> Bubble {
        let mut rng = Pcg32::seed_from_u64(id as u64);
        let mut b = Bubble::new(id, Vec2::new(400.0, -200.0), 20.0, kind, &mut rng);
        b.vel = Vec2::new(0.0, -5.0);
        b
    }

    #[test]
    fn test_start_spawns_initial_bubbles() {
        let (state, profile) = started(1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.bubbles.len(), INITIAL_BUBBLES);
        assert_eq!(profile.stats.total_games, 1);
        assert_eq!(state.events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_tick_pause() {
        let (mut state, mut profile) = started(2);
        assert_eq!(toggle_pause(&mut state), GamePhase::Paused);

        let before: Vec<_> = state.bubbles.iter().map(|b| b.pos).collect();
        tick(&mut state, &mut profile, 100.0);
        let after: Vec<_> = state.bubbles.iter().map(|b| b.pos).collect();
        assert_eq!(before, after);

        assert_eq!(toggle_pause(&mut state), GamePhase::Running);
    }

    #[test]
    fn test_spawn_cadence() {
        let (mut state, mut profile) = started(3);
        state.bubbles.clear();
        for _ in 0..59 {
            tick(&mut state, &mut profile, FRAME_MS);
        }
        assert_eq!(state.bubbles.len(), 0);
        for _ in 0..2 {
            tick(&mut state, &mut profile, FRAME_MS);
        }
        assert_eq!(state.bubbles.len(), 1);
    }

    #[test]
    fn test_escape_costs_life() {
        let (mut state, mut profile) = started(4);
        state.bubbles = vec![escaping_bubble(100, BubbleKind::Normal)];
        tick(&mut state, &mut profile, FRAME_MS);
        assert_eq!(state.lives, START_LIVES - 1);
        assert!(state.bubbles.iter().all(|b| b.id != 100));
    }

    #[test]
    fn test_obstacle_escape_is_free() {
        let (mut state, mut profile) = started(5);
        state.bubbles = vec![escaping_bubble(100, BubbleKind::Obstacle)];
        tick(&mut state, &mut profile, FRAME_MS);
        assert_eq!(state.lives, START_LIVES);
    }

    #[test]
    fn test_game_over_stops_processing() {
        let (mut state, mut profile) = started(6);
        state.lives = 1;
        state.score = 77;
        state.bubbles = vec![
            escaping_bubble(100, BubbleKind::Normal),
            escaping_bubble(101, BubbleKind::Normal),
        ];
        tick(&mut state, &mut profile, FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        // The second escapee was never reached
        assert_eq!(state.bubbles.len(), 1);
        assert_eq!(profile.stats.best_score, 77);

        let lives = state.lives;
        tick(&mut state, &mut profile, FRAME_MS);
        assert_eq!(state.lives, lives);
    }

    #[test]
    fn test_immortal_modifier_keeps_lives() {
        let (mut state, mut profile) = started(7);
        profile.ledger.activate_modifier(Modifier::Immortal);
        state.bubbles = vec![escaping_bubble(100, BubbleKind::Normal)];
        tick(&mut state, &mut profile, FRAME_MS);
        assert_eq!(state.lives, START_LIVES);
    }

    #[test]
    fn test_pop_animation_removes_bubble() {
        let (mut state, mut profile) = started(8);
        state.bubbles.truncate(1);
        assert!(state.bubbles[0].pop().is_some());
        for _ in 0..POP_FRAMES {
            tick(&mut state, &mut profile, FRAME_MS);
            if state.bubbles.iter().any(|b| b.id == 1) {
                assert!(matches!(state.bubbles[0].phase, BubblePhase::Popping { .. }));
            }
        }
        assert!(state.bubbles.iter().all(|b| b.id != 1));
    }

    #[test]
    fn test_long_tick_breaks_combo() {
        let (mut state, mut profile) = started(10);
        state.bubbles.clear();
        state.events.clear();
        state.combo.hit();
        tick(&mut state, &mut profile, 1001.0);
        assert_eq!(state.combo.count, 0);
        assert!(state.events.contains(&GameEvent::ComboBroken));
    }

    #[test]
    fn test_long_tick_runs_effects_out() {
        let (mut state, mut profile) = started(11);
        state.bubbles.clear();
        state.effects.activate_double_points(DOUBLE_POINTS_MS);
        tick(&mut state, &mut profile, DOUBLE_POINTS_MS + 1.0);
        assert!(!state.effects.is_double_points());
    }

    #[test]
    fn test_slow_time_halves_spawn_clock() {
        let (mut state, mut profile) = started(9);
        state.effects.activate_slow_time(SLOW_TIME_MS);
        tick(&mut state, &mut profile, 100.0);
        assert!((state.spawner.timer_ms - 50.0).abs() < 1e-3);
        assert!((state.effects.slow_time_ms - (SLOW_TIME_MS - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let (mut a, mut pa) = started(42);
        let (mut b, mut pb) = started(42);
        for _ in 0..600 {
            tick(&mut a, &mut pa, FRAME_MS);
            tick(&mut b, &mut pb, FRAME_MS);
        }
        let pos_a: Vec<_> = a.bubbles.iter().map(|x| (x.id, x.pos)).collect();
        let pos_b: Vec<_> = b.bubbles.iter().map(|x| (x.id, x.pos)).collect();
        assert_eq!(pos_a, pos_b);
        assert_eq!(a.lives, b.lives);
    }
}
