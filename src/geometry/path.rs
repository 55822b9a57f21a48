use std::collections::HashMap;

use super::{resolve_port_position, BoardLayout, Point};
use crate::models::{ChipState, Wire};

/// Adjacent points closer than this collapse into one.
pub const MERGE_DISTANCE: f64 = 0.5;

/// Pixel polyline of a wire: source port, routed cells, target port.
///
/// Ports are only included when they resolve; without a chip map only CP
/// endpoints can resolve. An empty result means the wire is not drawn.
pub fn build_pixel_path(
    wire: &Wire,
    chips: Option<&HashMap<String, ChipState>>,
    layout: &BoardLayout,
) -> Vec<Point> {
    let empty = HashMap::new();
    let chips = chips.unwrap_or(&empty);

    let source = resolve_port_position(&wire.source, chips, layout);
    let target = resolve_port_position(&wire.target, chips, layout);
    let cells = wire.route.iter().map(|cell| layout.cell_point(*cell));

    let mut points: Vec<Point> = Vec::with_capacity(wire.route.len() + 2);
    for point in source.into_iter().chain(cells).chain(target) {
        match points.last() {
            Some(last) if last.distance(&point) < MERGE_DISTANCE => {}
            _ => points.push(point),
        }
    }
    points
}
