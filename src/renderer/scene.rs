//! Frame composition: what the show looks like on a [`Canvas`]

use super::canvas::Canvas;
use crate::config::ShowConfig;
use crate::consts::{ROCKET_HEAD_RADIUS, TRAIL_ALPHA, TRAIL_WIDTH};
use crate::settings::QualityPreset;
use crate::sim::{Rocket, Show};

/// Draw one frame of `show`
///
/// Nothing is cleared: the background is faded in translucently so earlier
/// frames linger as streaks.
pub fn draw_show<C: Canvas>(
    show: &Show,
    config: &ShowConfig,
    quality: QualityPreset,
    canvas: &mut C,
) {
    if canvas.viewport().is_empty() {
        return;
    }
    canvas.fade(config.background, config.background_fade);

    for rocket in show.rockets() {
        draw_rocket(rocket, quality.trail_quality(), canvas);
    }
}

pub fn draw_rocket<C: Canvas>(rocket: &Rocket, trail_fraction: f32, canvas: &mut C) {
    if rocket.is_exploded() {
        for p in rocket.particles() {
            canvas.disc(p.pos, p.radius, p.color.with_alpha(p.alpha()));
        }
        return;
    }

    let trail = rocket.trail();
    let len = trail.len();
    // Segment i runs from point i to i + 1; low quality drops the oldest
    // segments, alpha still follows the full trail
    let segments = len.saturating_sub(1);
    let kept = ((segments as f32) * trail_fraction.clamp(0.0, 1.0)).ceil() as usize;
    for i in segments - kept.min(segments)..segments {
        let (Some(from), Some(to)) = (trail.get(i), trail.get(i + 1)) else {
            continue;
        };
        let alpha = i as f32 / len as f32 * TRAIL_ALPHA;
        canvas.line(from, to, TRAIL_WIDTH, rocket.color.with_alpha(alpha));
    }
    canvas.disc(rocket.pos, ROCKET_HEAD_RADIUS, rocket.color.with_alpha(1.0));
}
