//! Frame composition: wires first, blips on top.
//!
//! Everything here draws through [`DrawSurface`] and never reads pixels back.
//! Style, layout and cycle data are per-frame snapshots owned by the caller.

mod blips;
mod surface;
mod wires;

pub use blips::{
    blip_progress, render_blips, BLIP_GLOW_SEGMENTS, BLIP_MAX_CELLS, BLIP_MAX_PATH_FRACTION,
    BLIP_SUB_SEGMENTS,
};
pub use surface::{
    stroke_polyline, DrawSurface, LineCap, LineJoin, RecordingSurface, StrokeRecord, StrokeState,
};
pub use wires::{render_wires, SamplingMode};

use std::collections::HashMap;

use log::debug;

use crate::geometry::{BoardLayout, Bounds};
use crate::models::{CycleResults, GameboardState, Wire};
use crate::style::WireStyle;
use crate::timing::WireAnimationCache;

/// Per-frame switches for the wire and blip passes.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Draw only the base pass.
    pub neutral_only: bool,
    /// Hide signal on wires whose chips did not run this cycle.
    pub live_only: bool,
    pub sampling: SamplingMode,
    /// Emphasis boost in `[0, 1]` keyed by wire id.
    pub emphasis: HashMap<String, f64>,
}

impl RenderOptions {
    pub fn boost_for(&self, wire_id: &str) -> f64 {
        self.emphasis
            .get(wire_id)
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Whether the glow and color passes run for `wire`.
    ///
    /// Neutral-only mode and liveness filtering drop both passes, not only
    /// the glow: a filtered wire is drawn as the neutral base stroke alone.
    pub fn shows_signal(&self, wire: &Wire, cycle: Option<&CycleResults>) -> bool {
        if self.neutral_only {
            return false;
        }
        !(self.live_only && cycle.is_some_and(|c| !c.is_wire_live(wire)))
    }
}

/// Snapshot of everything one frame needs.
pub struct FrameInput<'a> {
    pub board: &'a GameboardState,
    pub layout: &'a BoardLayout,
    pub style: &'a WireStyle,
    pub cycle: Option<&'a CycleResults>,
    /// Timings for pause mode; blips are drawn only when this and
    /// `global_progress` are both set.
    pub animation: Option<&'a WireAnimationCache>,
    pub global_progress: Option<f64>,
    pub options: &'a RenderOptions,
}

/// Renders one frame and hands the drawn area to `capture`, if any.
pub fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &FrameInput<'_>,
    capture: Option<&mut dyn FnMut(&Bounds)>,
) -> Option<Bounds> {
    let mut drawn = render_wires(
        surface,
        frame.board,
        frame.layout,
        frame.style,
        frame.cycle,
        frame.options,
    );

    let mut blips_drawn = false;
    if let (Some(animation), Some(progress)) = (frame.animation, frame.global_progress) {
        if let Some(blips) = render_blips(
            surface,
            frame.board,
            frame.layout,
            frame.style,
            animation,
            progress,
            frame.cycle,
            frame.options,
        ) {
            blips_drawn = true;
            match drawn.as_mut() {
                Some(bounds) => bounds.union(&blips),
                None => drawn = Some(blips),
            }
        }
    }

    debug!(
        "[render] board={} wires={} blips={} bounds={:?}",
        frame.board.id,
        frame.board.paths.len(),
        blips_drawn,
        drawn
    );

    if let (Some(callback), Some(bounds)) = (capture, drawn.as_ref()) {
        callback(bounds);
    }
    drawn
}
