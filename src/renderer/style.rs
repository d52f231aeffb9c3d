//! Bubble appearance
//!
//! Pure mapping from bubble state to draw parameters. Colours are linear
//! RGBA in 0-1, like every other colour in the renderer.

use glam::Vec2;

use crate::sim::{Bubble, BubbleKind, BubblePhase};

pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const BACKGROUND: Rgba = [0.06, 0.08, 0.16, 1.0];

/// HSL (degrees, 0-1, 0-1) to RGBA
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Rgba {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, alpha]
}

/// CSS `rgba()` string
pub fn to_css(color: Rgba) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Same colour, alpha scaled
pub fn fade(color: Rgba, factor: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * factor]
}

fn rgb8(r: u8, g: u8, b: u8, a: f32) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Marker drawn over the bubble centre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Star,
    Cross,
}

/// Everything needed to draw one bubble
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleStyle {
    pub center: Vec2,
    /// Radius after hover/pop scaling
    pub radius: f32,
    pub fill: Rgba,
    pub border: Rgba,
    pub glow: Option<Rgba>,
    /// Overall opacity (fades out while popping)
    pub alpha: f32,
    pub marker: Marker,
    pub label: String,
    /// Sparkle centres and sizes
    pub sparkles: Vec<(Vec2, f32, f32)>,
}

/// Base fill and border for a kind
pub fn kind_colors(kind: BubbleKind) -> (Rgba, Rgba) {
    match kind {
        BubbleKind::Normal => (rgb8(0, 100, 255, 0.8), rgb8(0, 70, 225, 1.0)),
        BubbleKind::Rare => (rgb8(255, 215, 0, 0.8), rgb8(225, 185, 0, 1.0)),
        BubbleKind::Special => (rgb8(255, 0, 255, 0.8), rgb8(225, 0, 225, 1.0)),
        BubbleKind::Obstacle => (rgb8(255, 0, 0, 0.8), rgb8(225, 0, 0, 1.0)),
    }
}

/// Describe how a bubble should look this frame. Removed bubbles draw nothing.
pub fn bubble_style(bubble: &Bubble) -> Option<BubbleStyle> {
    let (scale, alpha) = match bubble.phase {
        BubblePhase::Removed => return None,
        BubblePhase::Active => (bubble.hover_scale, 1.0),
        BubblePhase::Popping { .. } => {
            let progress = bubble.pop_progress();
            (1.0 + 0.5 * progress, 1.0 - progress)
        }
    };

    let (fill, border) = if bubble.rainbow {
        (
            hsla(bubble.hue, 1.0, 0.5, 0.8),
            hsla(bubble.hue, 1.0, 0.4, 1.0),
        )
    } else {
        kind_colors(bubble.kind)
    };

    let glow = (bubble.glow > 0.01).then(|| {
        let tint = match bubble.kind {
            BubbleKind::Special => rgb8(255, 0, 255, 1.0),
            BubbleKind::Rare => rgb8(255, 215, 0, 1.0),
            _ => WHITE,
        };
        fade(tint, bubble.glow * 0.7)
    });

    let marker = match bubble.kind {
        BubbleKind::Special => Marker::Star,
        BubbleKind::Obstacle => Marker::Cross,
        _ => Marker::None,
    };

    let sparkles = if bubble.is_active() {
        bubble
            .sparkles
            .iter()
            .map(|s| {
                let offset = Vec2::from_angle(s.angle + bubble.rotation) * s.distance;
                (bubble.pos + offset, s.size, s.opacity)
            })
            .collect()
    } else {
        Vec::new()
    };

    let points = bubble.points();
    let label = if points > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    };

    Some(BubbleStyle {
        center: bubble.pos,
        radius: bubble.radius * scale,
        fill,
        border,
        glow,
        alpha,
        marker,
        label,
        sparkles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bubble(kind: BubbleKind) -> Bubble {
        let mut rng = Pcg32::seed_from_u64(3);
        Bubble::new(1, Vec2::new(50.0, 50.0), 20.0, kind, &mut rng)
    }

    #[test]
    fn test_hsla_primaries() {
        let red = hsla(0.0, 1.0, 0.5, 1.0);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
        let blue = hsla(240.0, 1.0, 0.5, 0.5);
        assert!((blue[2] - 1.0).abs() < 1e-5 && blue[0].abs() < 1e-5);
        assert_eq!(blue[3], 0.5);
        let wrapped = hsla(360.0, 1.0, 0.5, 1.0);
        assert!((wrapped[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_to_css() {
        assert_eq!(to_css([1.0, 0.0, 0.5, 0.8]), "rgba(255, 0, 128, 0.800)");
    }

    #[test]
    fn test_kind_markers() {
        assert_eq!(bubble_style(&bubble(BubbleKind::Special)).map(|s| s.marker), Some(Marker::Star));
        assert_eq!(bubble_style(&bubble(BubbleKind::Obstacle)).map(|s| s.marker), Some(Marker::Cross));
        assert_eq!(bubble_style(&bubble(BubbleKind::Normal)).map(|s| s.marker), Some(Marker::None));
    }

    #[test]
    fn test_obstacle_label_is_negative() {
        let style = bubble_style(&bubble(BubbleKind::Obstacle));
        assert_eq!(style.map(|s| s.label), Some("-20".to_string()));
    }

    #[test]
    fn test_pop_grows_and_fades() {
        let mut b = bubble(BubbleKind::Normal);
        b.pop();
        b.phase = BubblePhase::Popping { frame: 5 };
        let style = bubble_style(&b);
        assert_eq!(style.as_ref().map(|s| s.radius), Some(25.0));
        assert_eq!(style.as_ref().map(|s| s.alpha), Some(0.5));

        b.phase = BubblePhase::Removed;
        assert!(bubble_style(&b).is_none());
    }

    #[test]
    fn test_rainbow_overrides_kind_color() {
        let mut b = bubble(BubbleKind::Obstacle);
        b.rainbow = true;
        b.hue = 120.0;
        let style = bubble_style(&b);
        assert_eq!(style.map(|s| s.fill), Some(hsla(120.0, 1.0, 0.5, 0.8)));
    }
}
