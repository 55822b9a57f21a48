use crate::geometry::{build_pixel_path, ArcLengthIndex, BoardLayout, Bounds};
use crate::models::{CycleResults, GameboardState, WireBlipTiming};
use crate::style::WireStyle;
use crate::timing::WireAnimationCache;
use crate::visual::{signal_to_color, signal_to_glow, GlowParams, Palette};

use super::surface::{stroke_polyline, DrawSurface};
use super::wires::{apply_line_style, extend};
use super::RenderOptions;

/// Alpha steps a blip is drawn in, tail to head.
pub const BLIP_SUB_SEGMENTS: usize = 5;
/// Head-most sub-segments that carry glow.
pub const BLIP_GLOW_SEGMENTS: usize = 2;
/// Blip length cap in grid cells.
pub const BLIP_MAX_CELLS: f64 = 3.0;
/// Blip length cap as a fraction of the wire length.
pub const BLIP_MAX_PATH_FRACTION: f64 = 0.2;

/// Fraction of the wire a blip has travelled at `global_progress`, or `None`
/// before departure, from arrival on, for empty windows and for non-finite
/// progress.
pub fn blip_progress(timing: &WireBlipTiming, global_progress: f64) -> Option<f64> {
    let duration = timing.duration();
    if duration <= 0.0 {
        return None;
    }
    let raw = (global_progress - timing.depart_phase) / duration;
    if !raw.is_finite() || raw <= 0.0 || raw >= 1.0 {
        return None;
    }
    Some(raw)
}

/// Draws the in-flight signal blips of paused playback.
#[allow(clippy::too_many_arguments)]
pub fn render_blips<S: DrawSurface + ?Sized>(
    surface: &mut S,
    board: &GameboardState,
    layout: &BoardLayout,
    style: &WireStyle,
    animation: &WireAnimationCache,
    global_progress: f64,
    cycle: Option<&CycleResults>,
    options: &RenderOptions,
) -> Option<Bounds> {
    let palette = Palette::zero(style);
    let mut drawn: Option<Bounds> = None;

    for wire in &board.paths {
        let Some(timing) = animation.get(&wire.id) else {
            continue;
        };
        let Some(raw_t) = blip_progress(timing, global_progress) else {
            continue;
        };
        if options.live_only && cycle.is_some_and(|c| !c.is_wire_live(wire)) {
            continue;
        }

        let path = ArcLengthIndex::new(build_pixel_path(wire, Some(&board.chips), layout));
        let total = path.total_length();
        if total <= 0.0 {
            continue;
        }

        let blip_length = (BLIP_MAX_CELLS * layout.cell_size).min(BLIP_MAX_PATH_FRACTION * total);
        let head = raw_t * total;
        let tail = (head - blip_length).max(0.0);

        let color = signal_to_color(timing.signal_value, &palette).to_css();
        let glow = signal_to_glow(
            timing.signal_value,
            &GlowParams::BLIP,
            options.boost_for(&wire.id),
        );

        let steps = BLIP_SUB_SEGMENTS as f64;
        let mut pad = style.blip_width / 2.0;
        for k in 0..BLIP_SUB_SEGMENTS {
            let f0 = k as f64 / steps;
            let f1 = (k + 1) as f64 / steps;
            let piece = path.slice(tail + (head - tail) * f0, tail + (head - tail) * f1);

            surface.save();
            apply_line_style(surface, &color, style.blip_width, (f0 + f1) / 2.0);
            if glow > 0.0 && k >= BLIP_SUB_SEGMENTS - BLIP_GLOW_SEGMENTS {
                surface.set_shadow_color(&color);
                surface.set_shadow_blur(glow);
                pad = pad.max(glow);
            }
            stroke_polyline(surface, &piece);
            surface.restore();
        }

        extend(&mut drawn, &path.slice(tail, head), pad);
    }

    drawn
}
