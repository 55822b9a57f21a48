//! Signal scalar to stroke color and glow radius.

use crate::style::{Rgb, WireStyle};

/// Full-polarity point for boards that ramp from the neutral gray.
pub const NEUTRAL_RAMP_END: f64 = 75.0;
/// Full-polarity point for contexts that ramp from the zero color.
pub const ZERO_RAMP_END: f64 = 100.0;
/// Signal magnitude at which glow reaches its maximum radius.
pub const GLOW_FULL_SIGNAL: f64 = 100.0;

const BOOST_THRESHOLD_DROP: f64 = 50.0;
const BOOST_RADIUS_GAIN: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub base: Rgb,
    pub positive: Rgb,
    pub negative: Rgb,
    pub ramp_end: f64,
}

impl Palette {
    /// Ramp from the neutral gray, saturating at [`NEUTRAL_RAMP_END`].
    pub fn neutral(style: &WireStyle) -> Self {
        Self {
            base: style.neutral,
            positive: style.positive,
            negative: style.negative,
            ramp_end: NEUTRAL_RAMP_END,
        }
    }

    /// Ramp from the zero color, saturating at [`ZERO_RAMP_END`].
    pub fn zero(style: &WireStyle) -> Self {
        Self {
            base: style.zero,
            positive: style.positive,
            negative: style.negative,
            ramp_end: ZERO_RAMP_END,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowParams {
    pub threshold: f64,
    pub max_radius: f64,
}

impl GlowParams {
    pub const WIRE: GlowParams = GlowParams {
        threshold: 75.0,
        max_radius: 12.0,
    };
    pub const BLIP: GlowParams = GlowParams {
        threshold: 75.0,
        max_radius: 30.0,
    };
}

pub fn signal_to_color(value: f64, palette: &Palette) -> Rgb {
    if !value.is_finite() {
        return palette.base;
    }
    let t = if palette.ramp_end > 0.0 {
        (value.abs() / palette.ramp_end).min(1.0)
    } else {
        1.0
    };
    let target = if value >= 0.0 {
        &palette.positive
    } else {
        &palette.negative
    };
    palette.base.lerp(target, t)
}

/// Glow radius for `value`; 0 up to and including the threshold.
///
/// `boost` in `[0, 1]` lowers the threshold and widens the radius for
/// emphasized wires.
pub fn signal_to_glow(value: f64, params: &GlowParams, boost: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let boost = boost.clamp(0.0, 1.0);
    let threshold = params.threshold - BOOST_THRESHOLD_DROP * boost;
    let max_radius = params.max_radius + BOOST_RADIUS_GAIN * boost;

    let magnitude = value.abs();
    if magnitude <= threshold {
        return 0.0;
    }
    let ramp = GLOW_FULL_SIGNAL - threshold;
    if ramp <= 0.0 {
        return max_radius;
    }
    ((magnitude - threshold) / ramp).min(1.0) * max_radius
}
