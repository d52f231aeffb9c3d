//! Bubble entity
//!
//! One movable, poppable object. Physics state drives gameplay; hover, glow,
//! sparkles and rainbow hue are cosmetic and never affect scoring.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics;
use crate::consts::*;

/// Bubble categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BubbleKind {
    #[default]
    Normal,
    Rare,
    Special,
    /// Negative points, free to let escape
    Obstacle,
}

impl BubbleKind {
    /// Points awarded for popping (before combo and multiplier)
    pub fn points(self) -> i64 {
        match self {
            BubbleKind::Normal => 10,
            BubbleKind::Rare => 30,
            BubbleKind::Special => 50,
            BubbleKind::Obstacle => -20,
        }
    }

    /// Number of decorative sparkles orbiting the bubble
    pub fn sparkle_count(self) -> usize {
        match self {
            BubbleKind::Special => 8,
            BubbleKind::Rare => 4,
            _ => 0,
        }
    }

    /// Whether letting this bubble escape costs a life
    pub fn costs_life(self) -> bool {
        self != BubbleKind::Obstacle
    }
}

/// Effects carried by Special bubbles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    SlowTime,
    DoublePoints,
    ExtraLife,
}

impl SpecialEffect {
    pub const ALL: [SpecialEffect; 3] = [
        SpecialEffect::SlowTime,
        SpecialEffect::DoublePoints,
        SpecialEffect::ExtraLife,
    ];
}

/// Lifecycle of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubblePhase {
    Active,
    /// Pop animation running, counted in ticks
    Popping { frame: u32 },
    /// Gone for good
    Removed,
}

/// What a successful pop hands back to the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popped {
    pub kind: BubbleKind,
    pub points: i64,
    pub effect: Option<SpecialEffect>,
}

/// Decorative particle orbiting a Rare/Special bubble
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sparkle {
    pub angle: f32,
    pub distance: f32,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Per-bubble gravity (negated under anti-gravity)
    pub gravity: f32,
    pub kind: BubbleKind,
    pub effect: Option<SpecialEffect>,
    pub phase: BubblePhase,

    // Cosmetic
    pub hovered: bool,
    pub hover_scale: f32,
    pub glow: f32,
    pub rotation: f32,
    pub rainbow: bool,
    pub hue: f32,
    pub sparkles: Vec<Sparkle>,
}

impl Bubble {
    /// Create a bubble of the given kind at `pos`
    pub fn new<R: Rng>(id: u32, pos: Vec2, radius: f32, kind: BubbleKind, rng: &mut R) -> Self {
        let effect = (kind == BubbleKind::Special)
            .then(|| SpecialEffect::ALL[rng.random_range(0..SpecialEffect::ALL.len())]);

        let sparkles = (0..kind.sparkle_count())
            .map(|_| Sparkle {
                angle: rng.random::<f32>() * std::f32::consts::TAU,
                distance: radius * 1.2,
                size: rng.random_range(2.0..5.0),
                speed: rng.random_range(0.01..0.03),
                opacity: rng.random_range(0.5..1.0),
            })
            .collect();

        Self {
            id,
            pos,
            vel: Vec2::new(
                rng.random_range(-1.0..1.0),
                -rng.random_range(MIN_RISE_SPEED..MAX_RISE_SPEED),
            ),
            radius,
            gravity: GRAVITY,
            kind,
            effect,
            phase: BubblePhase::Active,
            hovered: false,
            hover_scale: 1.0,
            glow: 0.0,
            rotation: 0.0,
            rainbow: false,
            hue: rng.random::<f32>() * 360.0,
            sparkles,
        }
    }

    /// Points this bubble is worth
    pub fn points(&self) -> i64 {
        self.kind.points()
    }

    pub fn is_active(&self) -> bool {
        self.phase == BubblePhase::Active
    }

    pub fn is_removed(&self) -> bool {
        self.phase == BubblePhase::Removed
    }

    /// Pop animation progress (0 while active, 1 once removed)
    pub fn pop_progress(&self) -> f32 {
        match self.phase {
            BubblePhase::Active => 0.0,
            BubblePhase::Popping { frame } => frame as f32 / POP_FRAMES as f32,
            BubblePhase::Removed => 1.0,
        }
    }

    /// Advance one tick. `dt_ms` is already time-scaled.
    pub fn tick(&mut self, dt_ms: f32, area: Vec2) {
        match self.phase {
            BubblePhase::Popping { frame } => {
                let frame = frame + 1;
                self.phase = if frame >= POP_FRAMES {
                    BubblePhase::Removed
                } else {
                    BubblePhase::Popping { frame }
                };
            }
            BubblePhase::Removed => {}
            BubblePhase::Active => {
                physics::integrate(&mut self.pos, &mut self.vel, self.gravity, dt_ms);
                physics::resolve_bounds(&mut self.pos, &mut self.vel, self.radius, area);
            }
        }
    }

    /// Whether `point` lies within the (hover-scaled) bubble plus `extra_radius`
    pub fn hit_test(&self, point: Vec2, extra_radius: f32) -> bool {
        self.pos.distance(point) <= self.radius * self.hover_scale + extra_radius
    }

    /// Start popping. Returns `None` if already popping or removed.
    ///
    /// The special effect only travels in the returned `Popped`, so it can be
    /// applied at most once per bubble.
    pub fn pop(&mut self) -> Option<Popped> {
        if !self.is_active() {
            return None;
        }
        self.phase = BubblePhase::Popping { frame: 0 };
        Some(Popped {
            kind: self.kind,
            points: self.points(),
            effect: self.effect,
        })
    }

    /// Ease hover/glow toward target and spin decorations
    pub fn animate(&mut self) {
        if !self.is_active() {
            return;
        }
        let (scale_target, glow_target) = if self.hovered {
            (HOVER_SCALE, 1.0)
        } else {
            (1.0, 0.0)
        };
        self.hover_scale += (scale_target - self.hover_scale) * HOVER_EASE;
        self.glow += (glow_target - self.glow) * HOVER_EASE;

        self.rotation += 0.02;
        for sparkle in &mut self.sparkles {
            sparkle.angle += sparkle.speed;
        }
        if self.rainbow {
            self.hue = (self.hue + 1.0) % 360.0;
        }
    }

    /// Whether the bubble has floated past the top exit margin
    pub fn escaped(&self) -> bool {
        self.pos.y + self.radius < -EXIT_MARGIN
    }
}
