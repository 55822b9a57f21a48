//! Wire style tokens.
//!
//! Themes hand over a flat string map; numbers arrive string-encoded. A dev
//! override may replace the whole style. Callers resolve a [`WireStyle`] once
//! per frame and pass it down explicitly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ThemeTokens = HashMap<String, String>;

pub const TOKEN_WIRE_BASE: &str = "wire-base";
pub const TOKEN_SIGNAL_NEUTRAL: &str = "signal-neutral";
pub const TOKEN_SIGNAL_ZERO: &str = "signal-zero";
pub const TOKEN_SIGNAL_POSITIVE: &str = "signal-positive";
pub const TOKEN_SIGNAL_NEGATIVE: &str = "signal-negative";
pub const TOKEN_WIRE_WIDTH: &str = "wire-width";
pub const TOKEN_WIRE_BASE_ALPHA: &str = "wire-base-alpha";
pub const TOKEN_BLIP_WIDTH: &str = "blip-width";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the `#` is optional, extra alpha digits are ignored).
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let digits = hex.as_bytes().get(..6)?;
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel blend toward `other`, rounded to the nearest integer.
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireStyle {
    /// Stroke color of the always-drawn base pass.
    pub wire_base: Rgb,
    /// Zero-signal color on boards that ramp from a neutral gray.
    pub neutral: Rgb,
    /// Zero-signal color where the ramp starts from black.
    pub zero: Rgb,
    pub positive: Rgb,
    pub negative: Rgb,
    pub base_width: f64,
    pub base_alpha: f64,
    pub blip_width: f64,
}

impl Default for WireStyle {
    fn default() -> Self {
        Self {
            wire_base: Rgb::new(0x3a, 0x3f, 0x4b),
            neutral: Rgb::new(0x8a, 0x8f, 0x99),
            zero: Rgb::new(0x1e, 0x21, 0x27),
            positive: Rgb::new(0x3d, 0xdc, 0x84),
            negative: Rgb::new(0xff, 0x53, 0x70),
            base_width: 3.0,
            base_alpha: 0.35,
            blip_width: 4.0,
        }
    }
}

impl WireStyle {
    /// Builds a style from theme tokens, keeping the default for anything
    /// missing or unparsable.
    pub fn from_tokens(tokens: &ThemeTokens) -> Self {
        let defaults = Self::default();
        let color = |key: &str, fallback: Rgb| {
            tokens
                .get(key)
                .and_then(|v| Rgb::parse_hex(v))
                .unwrap_or(fallback)
        };
        let number = |key: &str, fallback: f64| {
            tokens
                .get(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(fallback)
        };

        Self {
            wire_base: color(TOKEN_WIRE_BASE, defaults.wire_base),
            neutral: color(TOKEN_SIGNAL_NEUTRAL, defaults.neutral),
            zero: color(TOKEN_SIGNAL_ZERO, defaults.zero),
            positive: color(TOKEN_SIGNAL_POSITIVE, defaults.positive),
            negative: color(TOKEN_SIGNAL_NEGATIVE, defaults.negative),
            base_width: number(TOKEN_WIRE_WIDTH, defaults.base_width),
            base_alpha: number(TOKEN_WIRE_BASE_ALPHA, defaults.base_alpha).min(1.0),
            blip_width: number(TOKEN_BLIP_WIDTH, defaults.blip_width),
        }
    }

    /// Style for one frame: the dev override wins outright when present.
    pub fn resolve(tokens: &ThemeTokens, dev_override: Option<&WireStyle>) -> Self {
        match dev_override {
            Some(style) => style.clone(),
            None => Self::from_tokens(tokens),
        }
    }
}
