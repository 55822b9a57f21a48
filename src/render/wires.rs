use crate::geometry::{build_pixel_path, BoardLayout, Bounds, Point};
use crate::models::{CycleResults, GameboardState, Wire};
use crate::sampler::get_segment_signal;
use crate::style::WireStyle;
use crate::visual::{signal_to_color, signal_to_glow, GlowParams, Palette};

use super::surface::{stroke_polyline, DrawSurface, LineCap, LineJoin};
use super::RenderOptions;

/// Opacity of the glow pass; the color pass draws fully opaque on top.
const GLOW_PASS_ALPHA: f64 = 0.8;

/// Where a wire's signal values come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// One value per polyline segment from the wire's ring buffer.
    #[default]
    Segment,
    /// One uniform value for the whole wire from the cycle result.
    Wire { playpoint: usize },
}

/// Draws every wire in three passes: base, glow, color.
///
/// Returns the area touched, padded by stroke width and glow.
pub fn render_wires<S: DrawSurface + ?Sized>(
    surface: &mut S,
    board: &GameboardState,
    layout: &BoardLayout,
    style: &WireStyle,
    cycle: Option<&CycleResults>,
    options: &RenderOptions,
) -> Option<Bounds> {
    let palette = Palette::neutral(style);
    let mut drawn: Option<Bounds> = None;

    for wire in &board.paths {
        let points = build_pixel_path(wire, Some(&board.chips), layout);
        if points.is_empty() {
            continue;
        }

        draw_base_pass(surface, &points, style);
        let mut pad = style.base_width / 2.0;

        if points.len() < 2 || !options.shows_signal(wire, cycle) {
            extend(&mut drawn, &points, pad);
            continue;
        }

        let boost = options.boost_for(&wire.id);
        let runs = signal_runs(wire, &points, cycle, options.sampling);

        for (run, value) in &runs {
            let glow = signal_to_glow(*value, &GlowParams::WIRE, boost);
            if glow <= 0.0 {
                continue;
            }
            let color = signal_to_color(*value, &palette).to_css();
            surface.save();
            apply_line_style(surface, &color, style.base_width, GLOW_PASS_ALPHA);
            surface.set_shadow_color(&color);
            surface.set_shadow_blur(glow);
            stroke_polyline(surface, run);
            surface.restore();
            pad = pad.max(glow);
        }

        for (run, value) in &runs {
            let color = signal_to_color(*value, &palette).to_css();
            surface.save();
            apply_line_style(surface, &color, style.base_width, 1.0);
            stroke_polyline(surface, run);
            surface.restore();
        }

        extend(&mut drawn, &points, pad);
    }

    drawn
}

fn draw_base_pass<S: DrawSurface + ?Sized>(surface: &mut S, points: &[Point], style: &WireStyle) {
    surface.save();
    apply_line_style(surface, &style.wire_base.to_css(), style.base_width, style.base_alpha);
    stroke_polyline(surface, points);
    surface.restore();
}

/// Pieces of the polyline paired with the value they are colored by.
fn signal_runs<'p>(
    wire: &Wire,
    points: &'p [Point],
    cycle: Option<&CycleResults>,
    sampling: SamplingMode,
) -> Vec<(&'p [Point], f64)> {
    match sampling {
        SamplingMode::Segment => {
            let segments = points.len() - 1;
            points
                .windows(2)
                .enumerate()
                .map(|(i, run)| (run, get_segment_signal(wire, i, segments)))
                .collect()
        }
        SamplingMode::Wire { playpoint } => {
            let value = cycle.map_or(0.0, |c| c.wire_value(&wire.id, playpoint));
            vec![(points, value)]
        }
    }
}

pub(super) fn apply_line_style<S: DrawSurface + ?Sized>(
    surface: &mut S,
    color: &str,
    width: f64,
    alpha: f64,
) {
    surface.set_stroke_style(color);
    surface.set_line_width(width);
    surface.set_global_alpha(alpha);
    surface.set_line_cap(LineCap::Round);
    surface.set_line_join(LineJoin::Round);
}

pub(super) fn extend(drawn: &mut Option<Bounds>, points: &[Point], pad: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut bounds = Bounds::around(*first);
    for p in rest {
        bounds.include(*p);
    }
    let bounds = bounds.inflate(pad);
    match drawn {
        Some(existing) => existing.union(&bounds),
        None => *drawn = Some(bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection_point::ConnectionPoint;
    use crate::models::{GridCell, PortRef};
    use crate::render::surface::RecordingSurface;
    use crate::render::surface::StrokeState;

    fn layout() -> BoardLayout {
        BoardLayout {
            cell_size: 10.0,
            cols: 20,
            rows: 12,
        }
    }

    /// Input CP 0 -> output CP 0 through two routed cells: three segments.
    fn board_with(samples: &[f64]) -> GameboardState {
        let mut wire = Wire::new(
            "w",
            PortRef::output(ConnectionPoint::input(0), 0),
            PortRef::input(ConnectionPoint::output(0), 0),
        )
        .with_route(vec![GridCell::new(5, 3), GridCell::new(10, 3)]);
        for s in samples {
            wire.push_sample(*s);
        }
        GameboardState {
            id: "b".into(),
            chips: Default::default(),
            paths: vec![wire],
        }
    }

    #[test]
    fn quiet_wire_draws_base_and_color_only() {
        let board = board_with(&[0.0]);
        let style = WireStyle::default();
        let mut surface = RecordingSurface::new();
        render_wires(&mut surface, &board, &layout(), &style, None, &RenderOptions::default());

        // 1 base stroke + 3 color segments, no glow.
        assert_eq!(surface.strokes.len(), 4);
        let base = &surface.strokes[0];
        assert_eq!(base.points.len(), 4);
        assert_eq!(base.state.stroke_style, style.wire_base.to_css());
        assert_eq!(base.state.global_alpha, style.base_alpha);
        for color in &surface.strokes[1..] {
            assert_eq!(color.state.stroke_style, style.neutral.to_css());
            assert_eq!(color.state.shadow_blur, 0.0);
            assert_eq!(color.points.len(), 2);
        }
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.current_state(), &StrokeState::default());
    }

    #[test]
    fn hot_segments_get_glow_pass() {
        // Newest sample 100 on the source end, older history is quiet.
        let board = board_with(&[100.0]);
        let style = WireStyle::default();
        let mut surface = RecordingSurface::new();
        render_wires(&mut surface, &board, &layout(), &style, None, &RenderOptions::default());

        let glows: Vec<_> = surface.strokes.iter().filter(|s| s.state.shadow_blur > 0.0).collect();
        assert_eq!(glows.len(), 1);
        assert_eq!(glows[0].state.shadow_blur, GlowParams::WIRE.max_radius);
        assert_eq!(glows[0].points[0], Point::new(0.0, 30.0));
        assert_eq!(glows[0].state.shadow_color, style.positive.to_css());
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn neutral_only_skips_signal_passes() {
        let board = board_with(&[100.0]);
        let options = RenderOptions {
            neutral_only: true,
            ..RenderOptions::default()
        };
        let mut surface = RecordingSurface::new();
        render_wires(&mut surface, &board, &layout(), &WireStyle::default(), None, &options);
        assert_eq!(surface.strokes.len(), 1);
    }

    #[test]
    fn dead_wires_are_filtered_by_liveness() {
        let mut board = board_with(&[100.0]);
        board.paths[0].source = PortRef::output("sleeping", 0);
        board.chips.insert(
            "sleeping".into(),
            crate::models::ChipState {
                id: "sleeping".into(),
                chip_type: "not".into(),
                position: GridCell::new(2, 2),
                params: Default::default(),
                socket_count: 1,
                plug_count: 1,
            },
        );
        let cycle = CycleResults::default();
        let options = RenderOptions {
            live_only: true,
            ..RenderOptions::default()
        };
        let mut surface = RecordingSurface::new();
        render_wires(&mut surface, &board, &layout(), &WireStyle::default(), Some(&cycle), &options);
        assert_eq!(surface.strokes.len(), 1);
    }

    #[test]
    fn wire_level_sampling_strokes_whole_polyline() {
        let board = board_with(&[]);
        let mut cycle = CycleResults::default();
        cycle.wire_values.insert("w".into(), vec![0.0, -100.0]);
        let options = RenderOptions {
            sampling: SamplingMode::Wire { playpoint: 1 },
            ..RenderOptions::default()
        };
        let style = WireStyle::default();
        let mut surface = RecordingSurface::new();
        let bounds =
            render_wires(&mut surface, &board, &layout(), &style, Some(&cycle), &options).unwrap();

        // base, glow, color
        assert_eq!(surface.strokes.len(), 3);
        assert!(surface.strokes.iter().all(|s| s.points.len() == 4));
        assert_eq!(surface.strokes[2].state.stroke_style, style.negative.to_css());
        assert_eq!(bounds.min, Point::new(-12.0, 18.0));
        assert_eq!(bounds.max, Point::new(212.0, 42.0));
    }

    #[test]
    fn single_point_wire_draws_base_only() {
        let wire = Wire::new(
            "dot",
            PortRef::output(ConnectionPoint::input(0), 0),
            PortRef::input("missing", 0),
        );
        let mut hot = wire.clone();
        hot.push_sample(100.0);
        let board = GameboardState {
            id: "b".into(),
            chips: Default::default(),
            paths: vec![hot],
        };
        let mut surface = RecordingSurface::new();
        render_wires(&mut surface, &board, &layout(), &WireStyle::default(), None, &RenderOptions::default());
        assert_eq!(surface.strokes.len(), 1);
        assert_eq!(surface.strokes[0].points.len(), 1);
    }

    #[test]
    fn unresolvable_wire_is_skipped() {
        let board = GameboardState {
            id: "b".into(),
            chips: Default::default(),
            paths: vec![Wire::new("w", PortRef::output("x", 0), PortRef::input("y", 0))],
        };
        let mut surface = RecordingSurface::new();
        let bounds = render_wires(&mut surface, &board, &layout(), &WireStyle::default(), None, &RenderOptions::default());
        assert!(surface.strokes.is_empty());
        assert!(bounds.is_none());
        assert_eq!(surface.max_depth(), 0);
    }
}
