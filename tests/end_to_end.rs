use std::collections::HashMap;

use wireflow_lib::connection_point::ConnectionPoint;
use wireflow_lib::geometry::BoardLayout;
use wireflow_lib::models::{ChipState, CycleResults, GameboardState, GridCell, PortRef, Wire};
use wireflow_lib::render::{
    blip_progress, render_blips, render_frame, FrameInput, RecordingSurface, RenderOptions,
    BLIP_SUB_SEGMENTS,
};
use wireflow_lib::style::WireStyle;
use wireflow_lib::timing::WireAnimationCache;

fn chip(id: &str, col: i32) -> ChipState {
    ChipState {
        id: id.into(),
        chip_type: "gain".into(),
        position: GridCell::new(col, 4),
        params: Default::default(),
        socket_count: 1,
        plug_count: 1,
    }
}

/// CP_in -> A -> B -> CP_out with A at depth 1 and B at depth 2.
fn scenario() -> (GameboardState, CycleResults) {
    let mut chips = HashMap::new();
    chips.insert("A".to_string(), chip("A", 6));
    chips.insert("B".to_string(), chip("B", 12));
    let board = GameboardState {
        id: "scenario".into(),
        chips,
        paths: vec![
            Wire::new("in", PortRef::output(ConnectionPoint::input(0), 0), PortRef::input("A", 0)),
            Wire::new("ab", PortRef::output("A", 0), PortRef::input("B", 0)),
            Wire::new("out", PortRef::output("B", 0), PortRef::input(ConnectionPoint::output(0), 0)),
        ],
    };

    let mut cycle = CycleResults {
        processing_order: vec!["A".into(), "B".into()],
        max_depth: 3,
        ..CycleResults::default()
    };
    cycle.node_depths.insert("A".into(), 1);
    cycle.node_depths.insert("B".into(), 2);
    cycle.wire_values.insert("ab".into(), vec![90.0]);
    cycle.live_node_ids.extend(["A".to_string(), "B".to_string()]);
    (board, cycle)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn chain_timings_step_by_thirds() {
    let (board, cycle) = scenario();
    let cache = WireAnimationCache::build(&cycle, &board.paths, 0);

    let expected = [("in", 0.0, 1.0 / 3.0), ("ab", 1.0 / 3.0, 2.0 / 3.0), ("out", 2.0 / 3.0, 1.0)];
    for (id, depart, arrive) in expected {
        let t = cache.get(id).unwrap();
        assert!(close(t.depart_phase, depart), "{id}: {t:?}");
        assert!(close(t.arrive_phase, arrive), "{id}: {t:?}");
    }
    assert_eq!(cache.get("ab").unwrap().signal_value, 90.0);
}

#[test]
fn only_middle_wire_is_in_flight_at_half() {
    let (board, cycle) = scenario();
    let cache = WireAnimationCache::build(&cycle, &board.paths, 0);

    let in_flight: Vec<&str> = ["in", "ab", "out"]
        .into_iter()
        .filter(|id| blip_progress(cache.get(id).unwrap(), 0.5).is_some())
        .collect();
    assert_eq!(in_flight, vec!["ab"]);

    let layout = BoardLayout::default();
    let mut surface = RecordingSurface::new();
    render_blips(
        &mut surface,
        &board,
        &layout,
        &WireStyle::default(),
        &cache,
        0.5,
        Some(&cycle),
        &RenderOptions::default(),
    );
    assert_eq!(surface.strokes.len(), BLIP_SUB_SEGMENTS);

    // A's output port sits at col 8, B's input port at col 12, both on row 5.
    let (from_x, to_x) = (8.0 * layout.cell_size, 12.0 * layout.cell_size);
    for stroke in &surface.strokes {
        for p in &stroke.points {
            assert!(p.x >= from_x - 1e-9 && p.x <= to_x + 1e-9, "{p:?}");
            assert!(close(p.y, 5.0 * layout.cell_size));
        }
    }
    // Glow on the head-most sub-segments of a hot signal.
    assert!(surface.strokes[4].state.shadow_blur > 0.0);
    assert_eq!(surface.strokes[0].state.shadow_blur, 0.0);
}

#[test]
fn paused_frame_is_balanced_and_captured() {
    let (board, cycle) = scenario();
    let cache = WireAnimationCache::build(&cycle, &board.paths, 0);
    let layout = BoardLayout::default();
    let style = WireStyle::default();
    let options = RenderOptions::default();
    let frame = FrameInput {
        board: &board,
        layout: &layout,
        style: &style,
        cycle: Some(&cycle),
        animation: Some(&cache),
        global_progress: Some(0.5),
        options: &options,
    };

    let mut captured = None;
    let mut capture = |b: &wireflow_lib::geometry::Bounds| captured = Some(*b);
    let mut surface = RecordingSurface::new();
    let bounds = render_frame(&mut surface, &frame, Some(&mut capture));

    assert_eq!(captured, bounds);
    assert!(bounds.is_some());
    assert_eq!(surface.depth(), 0);
    assert_eq!(surface.unmatched_restores(), 0);
}
