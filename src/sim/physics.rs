//! Bubble integration and play-area boundary response
//!
//! Physics constants are tuned per reference frame (60 Hz). Deltas are
//! converted to reference frames so any host frame rate integrates the same
//! trajectories a fixed 60 Hz step would.

use glam::Vec2;

use super::bubble::Bubble;
use crate::consts::*;

/// What happened to a bubble during one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleFate {
    /// Still in play (or mid-pop)
    Alive,
    /// Pop animation finished
    Finished,
    /// Floated out over the top edge
    Escaped,
}

/// Convert a millisecond delta into reference frames
#[inline]
pub fn frames(dt_ms: f32) -> f32 {
    dt_ms / FRAME_MS
}

/// Apply gravity and friction, then move
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, gravity: f32, dt_ms: f32) {
    let steps = frames(dt_ms);
    vel.y += gravity * steps;
    *vel *= FRICTION.powf(steps);
    *pos += *vel * steps;
}

/// Reflect a velocity off a surface with the given normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Keep a circle inside the play area, bouncing off the side walls and floor
/// with restitution. The top edge is open: bubbles leave through it.
///
/// Returns true if any edge was hit.
pub fn resolve_bounds(pos: &mut Vec2, vel: &mut Vec2, radius: f32, area: Vec2) -> bool {
    let mut hit = false;

    let normal_x = if pos.x - radius < 0.0 {
        pos.x = radius;
        Some(Vec2::X)
    } else if pos.x + radius > area.x {
        pos.x = area.x - radius;
        Some(Vec2::NEG_X)
    } else {
        None
    };
    if let Some(normal) = normal_x {
        let reflected = reflect_velocity(*vel, normal);
        vel.x = reflected.x * RESTITUTION;
        hit = true;
    }

    let normal_y = if pos.y + radius > area.y {
        pos.y = area.y - radius;
        Some(Vec2::NEG_Y)
    } else {
        None
    };
    if let Some(normal) = normal_y {
        let reflected = reflect_velocity(*vel, normal);
        vel.y = reflected.y * RESTITUTION;
        hit = true;
    }

    hit
}

/// Advance a single bubble one tick and classify the result
pub fn step_bubble(bubble: &mut Bubble, dt_ms: f32, area: Vec2) -> BubbleFate {
    bubble.animate();
    bubble.tick(dt_ms, area);

    if bubble.is_removed() {
        BubbleFate::Finished
    } else if bubble.escaped() {
        BubbleFate::Escaped
    } else {
        BubbleFate::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bubble::BubbleKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const AREA: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_reflect_velocity() {
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_integrate_one_reference_frame() {
        let mut pos = Vec2::new(100.0, 100.0);
        let mut vel = Vec2::new(1.0, -2.0);
        integrate(&mut pos, &mut vel, GRAVITY, FRAME_MS);

        let expected_vy = (-2.0 + GRAVITY) * FRICTION;
        assert!((vel.y - expected_vy).abs() < 1e-5);
        assert!((vel.x - FRICTION).abs() < 1e-5);
        assert!((pos.y - (100.0 + expected_vy)).abs() < 1e-4);
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let mut pos = Vec2::new(50.0, 50.0);
        let mut vel = Vec2::new(3.0, -3.0);
        integrate(&mut pos, &mut vel, GRAVITY, 0.0);
        assert_eq!(pos, Vec2::new(50.0, 50.0));
        assert_eq!(vel, Vec2::new(3.0, -3.0));
    }

    #[test]
    fn test_left_wall_bounce() {
        let mut pos = Vec2::new(5.0, 300.0);
        let mut vel = Vec2::new(-10.0, 0.0);
        assert!(resolve_bounds(&mut pos, &mut vel, 20.0, AREA));
        assert_eq!(pos.x, 20.0);
        assert!((vel.x - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_floor_bounce() {
        let mut pos = Vec2::new(400.0, 595.0);
        let mut vel = Vec2::new(0.0, 4.0);
        assert!(resolve_bounds(&mut pos, &mut vel, 20.0, AREA));
        assert_eq!(pos.y, 580.0);
        assert!((vel.y + 2.8).abs() < 1e-5);
    }

    #[test]
    fn test_inside_is_untouched() {
        let mut pos = Vec2::new(400.0, 300.0);
        let mut vel = Vec2::new(1.0, 1.0);
        assert!(!resolve_bounds(&mut pos, &mut vel, 20.0, AREA));
        assert_eq!(vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_step_reports_finished_pop() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bubble =
            Bubble::new(1, Vec2::new(100.0, 300.0), 25.0, BubbleKind::Normal, &mut rng);
        bubble.pop();
        let mut fate = BubbleFate::Alive;
        for _ in 0..POP_FRAMES {
            fate = step_bubble(&mut bubble, FRAME_MS, AREA);
        }
        assert_eq!(fate, BubbleFate::Finished);
    }

    #[test]
    fn test_top_edge_is_open() {
        let mut pos = Vec2::new(400.0, -50.0);
        let mut vel = Vec2::new(0.0, -2.0);
        assert!(!resolve_bounds(&mut pos, &mut vel, 20.0, AREA));
        assert_eq!(pos.y, -50.0);
    }

    #[test]
    fn test_step_reports_escape() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut bubble =
            Bubble::new(1, Vec2::new(100.0, -200.0), 25.0, BubbleKind::Normal, &mut rng);
        bubble.vel = Vec2::new(0.0, -5.0);
        assert_eq!(step_bubble(&mut bubble, FRAME_MS, AREA), BubbleFate::Escaped);
    }

    #[test]
    fn test_inverted_gravity_bubble_eventually_escapes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bubble =
            Bubble::new(1, Vec2::new(400.0, 575.0), 25.0, BubbleKind::Rare, &mut rng);
        bubble.gravity = -GRAVITY;
        bubble.vel = Vec2::new(0.0, 3.0);
        let mut fate = BubbleFate::Alive;
        for _ in 0..2000 {
            fate = step_bubble(&mut bubble, FRAME_MS, AREA);
            if fate != BubbleFate::Alive {
                break;
            }
        }
        assert_eq!(fate, BubbleFate::Escaped);
    }

    #[test]
    fn test_normal_gravity_bubble_settles_on_floor() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut bubble =
            Bubble::new(1, Vec2::new(400.0, 575.0), 25.0, BubbleKind::Normal, &mut rng);
        bubble.vel = Vec2::new(0.0, -3.0);
        for _ in 0..2000 {
            assert_eq!(step_bubble(&mut bubble, FRAME_MS, AREA), BubbleFate::Alive);
        }
        assert!(bubble.pos.y + bubble.radius <= AREA.y + 1e-3);
    }
}
