//! Rendering module
//!
//! Draws a frame through the `DrawSurface` trait: immediate-mode circles,
//! rectangles and text. The canvas backend lives in `canvas` (WASM only).

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod style;

use glam::Vec2;

use crate::sim::{GamePhase, GameState};
pub use style::{BubbleStyle, Marker, Rgba, bubble_style};
use style::{BACKGROUND, WHITE, fade};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// Drawing collaborator
pub trait DrawSurface {
    /// Surface size in CSS pixels
    fn size(&self) -> Vec2;
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    /// Centered text
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Rgba);
}

const HUD_TEXT: f32 = 20.0;
const BAR_HEIGHT: f32 = 8.0;
const OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.55];
const HEART: Rgba = [1.0, 0.3, 0.4, 1.0];
const GOLD: Rgba = [1.0, 0.84, 0.0, 1.0];
const CYAN: Rgba = [0.4, 0.9, 1.0, 1.0];

/// Draw one full frame: background, bubbles, HUD and phase overlays
pub fn draw_frame<S: DrawSurface + ?Sized>(surface: &mut S, state: &GameState) {
    let size = surface.size();
    surface.fill_rect(Vec2::ZERO, size, BACKGROUND);

    for bubble in &state.bubbles {
        if let Some(style) = bubble_style(bubble) {
            draw_bubble(surface, &style);
        }
    }

    draw_hud(surface, state, size);

    match state.phase {
        GamePhase::Paused => draw_banner(surface, size, "PAUSED", None),
        GamePhase::GameOver => {
            let detail = format!("Score {} - Level {}", state.score, state.level);
            draw_banner(surface, size, "GAME OVER", Some(&detail));
        }
        GamePhase::Ready => draw_banner(surface, size, "BUBBLE POP", Some("Click to start")),
        GamePhase::Running => {}
    }
}

fn draw_bubble<S: DrawSurface + ?Sized>(surface: &mut S, style: &BubbleStyle) {
    let a = style.alpha;
    let r = style.radius;

    if let Some(glow) = style.glow {
        surface.stroke_circle(style.center, r + 4.0, 6.0, fade(glow, a));
    }
    surface.fill_circle(style.center, r, fade(style.fill, a));
    surface.stroke_circle(style.center, r, 2.0, fade(style.border, a));

    // Highlight
    let shine = style.center + Vec2::new(-r * 0.3, -r * 0.3);
    surface.fill_circle(shine, r * 0.25, fade(WHITE, 0.8 * a));

    for &(pos, size, opacity) in &style.sparkles {
        surface.fill_circle(pos, size, fade(WHITE, opacity * a));
    }

    match style.marker {
        Marker::Star => surface.text("★", style.center, r * 0.8, fade(WHITE, a)),
        Marker::Cross => surface.text("✕", style.center, r * 0.8, fade(WHITE, a)),
        Marker::None => {}
    }
    surface.text(
        &style.label,
        style.center + Vec2::new(0.0, r * 0.55),
        (r * 0.45).max(10.0),
        fade(WHITE, 0.9 * a),
    );
}

fn draw_hud<S: DrawSurface + ?Sized>(surface: &mut S, state: &GameState, size: Vec2) {
    let line = HUD_TEXT + 6.0;
    surface.text(
        &format!("Score {}", state.score),
        Vec2::new(90.0, line),
        HUD_TEXT,
        WHITE,
    );
    surface.text(
        &format!("Level {}", state.level),
        Vec2::new(size.x * 0.5, line),
        HUD_TEXT,
        WHITE,
    );
    surface.text(
        &format!("♥ {}", state.lives),
        Vec2::new(size.x - 60.0, line),
        HUD_TEXT,
        HEART,
    );

    // Level progress bar under the top line
    let bar_pos = Vec2::new(20.0, line + 14.0);
    let bar_size = Vec2::new(size.x - 40.0, BAR_HEIGHT);
    surface.fill_rect(bar_pos, bar_size, fade(WHITE, 0.15));
    surface.fill_rect(
        bar_pos,
        Vec2::new(bar_size.x * state.level_fraction(), BAR_HEIGHT),
        CYAN,
    );

    let mut indicator_y = bar_pos.y + BAR_HEIGHT + HUD_TEXT;
    if state.combo.count > 1 {
        surface.text(
            &format!("Combo x{}", state.combo.count),
            Vec2::new(size.x * 0.5, indicator_y),
            HUD_TEXT,
            GOLD,
        );
        indicator_y += line;
    }
    if state.effects.is_slow_time() {
        surface.text("SLOW TIME", Vec2::new(size.x * 0.5, indicator_y), HUD_TEXT * 0.8, CYAN);
        indicator_y += line;
    }
    if state.effects.is_double_points() {
        surface.text("DOUBLE POINTS", Vec2::new(size.x * 0.5, indicator_y), HUD_TEXT * 0.8, GOLD);
    }
}

fn draw_banner<S: DrawSurface + ?Sized>(surface: &mut S, size: Vec2, title: &str, detail: Option<&str>) {
    surface.fill_rect(Vec2::ZERO, size, OVERLAY);
    let center = size * 0.5;
    surface.text(title, center, 48.0, WHITE);
    if let Some(detail) = detail {
        surface.text(detail, center + Vec2::new(0.0, 44.0), HUD_TEXT, WHITE);
    }
}
