use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::{debug, warn};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::migrate::migrate_legacy_connection_points;
use crate::connection_point::{is_bidirectional_cp, ConnectionPoint, CpCategory, CpSide};
use crate::geometry::{cp_anchor_cell, BoardLayout, CHIP_WIDTH_CELLS};
use crate::models::{BakeMetadata, BakedChipConfig, ChipState, GameboardState, GridCell, PortRef, Wire};

/// Columns kept clear next to each CP edge.
pub const EDGE_MARGIN_CELLS: i32 = 3;
/// First chip row.
pub const FIRST_CHIP_ROW: i32 = 2;
/// Narrowest column step between chip origins in a row.
pub const MIN_CHIP_SPACING: i32 = CHIP_WIDTH_CELLS + 2;
/// Widest column step; sparse boards do not stretch past this.
pub const MAX_CHIP_SPACING: i32 = 8;
/// Empty rows between wrapped chip rows.
const ROW_GAP_CELLS: i32 = 2;

/// Builds a viewer board from bake metadata and upgrades legacy CPs.
pub fn reconstruct_board(meta: &BakeMetadata, board_id: &str, layout: &BoardLayout) -> GameboardState {
    let mut board = build_board(meta, board_id, layout);
    migrate_legacy_connection_points(&mut board, layout);
    board
}

pub fn reconstruct_board_from_json(
    json: &str,
    board_id: &str,
    layout: &BoardLayout,
) -> Result<GameboardState, String> {
    let meta = BakeMetadata::from_json(json)?;
    Ok(reconstruct_board(&meta, board_id, layout))
}

/// Lays out bake metadata as a board, without migration.
///
/// CP chips come first: either the standard input/output pairs sized by the
/// socket and plug counts, or, when any edge uses a legacy bidirectional
/// identity, one chip per referenced bidirectional CP. Other chips are placed
/// left to right in evaluation order. Every edge becomes one unrouted wire.
pub fn build_board(meta: &BakeMetadata, board_id: &str, layout: &BoardLayout) -> GameboardState {
    let mut chips: HashMap<String, ChipState> = HashMap::new();

    let legacy = legacy_cps(meta);
    if legacy.is_empty() {
        for index in 0..meta.socket_count {
            let cp = ConnectionPoint::input(index);
            chips.insert(cp.encode(), cp_chip(&cp, CpSide::Source, layout, 0, 1));
        }
        for index in 0..meta.plug_count {
            let cp = ConnectionPoint::output(index);
            chips.insert(cp.encode(), cp_chip(&cp, CpSide::Sink, layout, 1, 0));
        }
    } else {
        for (cp, side) in &legacy {
            chips.insert(cp.encode(), cp_chip(cp, *side, layout, 1, 1));
        }
    }

    let configs: HashMap<&str, &BakedChipConfig> = meta
        .chip_configs
        .iter()
        .map(|config| (config.id.as_str(), config))
        .collect();
    let order = chip_order(meta);
    let positions = place_chips(&order, &configs, layout);
    for (id, position) in order.iter().zip(positions) {
        if let Some(config) = configs.get(id.as_str()) {
            chips.insert(
                id.clone(),
                ChipState {
                    id: config.id.clone(),
                    chip_type: config.chip_type.clone(),
                    position,
                    params: config.params.clone(),
                    socket_count: config.socket_count,
                    plug_count: config.plug_count,
                },
            );
        }
    }

    let mut unknown = 0usize;
    let paths: Vec<Wire> = meta
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            for end in [&edge.from_chip_id, &edge.to_chip_id] {
                if ConnectionPoint::decode(end).is_none() && !configs.contains_key(end.as_str()) {
                    unknown += 1;
                    warn!("[board_reconstruct] edge {} references unknown chip '{}'", i, end);
                }
            }
            Wire::new(
                format!("baked-{}", i),
                PortRef::output(edge.from_chip_id.as_str(), edge.from_port),
                PortRef::input(edge.to_chip_id.as_str(), edge.to_port),
            )
        })
        .collect();

    debug!(
        "[board_reconstruct] board={} chips={} wires={} legacy_cps={} unknown_refs={}",
        board_id,
        chips.len(),
        paths.len(),
        legacy.len(),
        unknown
    );

    GameboardState {
        id: board_id.to_string(),
        chips,
        paths,
    }
}

fn cp_chip(cp: &ConnectionPoint, side: CpSide, layout: &BoardLayout, sockets: u32, plugs: u32) -> ChipState {
    ChipState {
        id: cp.encode(),
        chip_type: cp.category.chip_type().to_string(),
        position: cp_anchor_cell(cp, side, layout),
        params: BTreeMap::new(),
        socket_count: sockets,
        plug_count: plugs,
    }
}

/// Bidirectional CPs referenced by edges, with the edge they are drawn on.
fn legacy_cps(meta: &BakeMetadata) -> BTreeMap<ConnectionPoint, CpSide> {
    let mut found = BTreeMap::new();
    for edge in &meta.edges {
        let ends = [(&edge.from_chip_id, CpSide::Source), (&edge.to_chip_id, CpSide::Sink)];
        for (id, side) in ends {
            if let Some(cp) = ConnectionPoint::decode(id) {
                if cp.category == CpCategory::Bidirectional {
                    found.entry(cp).or_insert(side);
                }
            }
        }
    }
    found
}

/// Non-CP chip ids in evaluation order.
///
/// Uses `topo_order` when present, otherwise a topological sort of the edges
/// between configured chips (config order if they form a cycle). Configured
/// chips the order does not mention are appended in config order.
pub fn chip_order(meta: &BakeMetadata) -> Vec<String> {
    let known: HashSet<&str> = meta.chip_configs.iter().map(|c| c.id.as_str()).collect();
    let primary: Vec<String> = if meta.topo_order.is_empty() {
        sort_configs(meta)
    } else {
        meta.topo_order.clone()
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut order: Vec<String> = Vec::with_capacity(meta.chip_configs.len());
    let listed = primary.into_iter().filter(|id| known.contains(id.as_str()));
    let rest = meta.chip_configs.iter().map(|c| c.id.clone());
    for id in listed.chain(rest) {
        if seen.insert(id.clone()) {
            order.push(id);
        }
    }
    order
}

fn sort_configs(meta: &BakeMetadata) -> Vec<String> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    for config in &meta.chip_configs {
        if indices.contains_key(config.id.as_str()) {
            continue;
        }
        let idx = graph.add_node(config.id.as_str());
        indices.insert(config.id.as_str(), idx);
    }
    for edge in &meta.edges {
        let (Some(&from), Some(&to)) = (
            indices.get(edge.from_chip_id.as_str()),
            indices.get(edge.to_chip_id.as_str()),
        ) else {
            continue;
        };
        graph.add_edge(from, to, ());
    }

    match toposort(&graph, None) {
        Ok(sorted) => sorted.into_iter().map(|idx| graph[idx].to_string()).collect(),
        Err(_) => {
            debug!("[board_reconstruct] chip graph has a cycle; using config order");
            meta.chip_configs.iter().map(|c| c.id.clone()).collect()
        }
    }
}

/// Grid origins for `order`, left to right, wrapping onto new rows.
///
/// Spacing spreads the chips over the playable width, clamped to
/// [`MIN_CHIP_SPACING`]..=[`MAX_CHIP_SPACING`]. Rows are as tall as the
/// tallest chip plus a gap, so no two footprints overlap.
pub fn place_chips(
    order: &[String],
    configs: &HashMap<&str, &BakedChipConfig>,
    layout: &BoardLayout,
) -> Vec<GridCell> {
    let count = i32::try_from(order.len()).unwrap_or(i32::MAX);
    if count == 0 {
        return Vec::new();
    }

    let usable = layout
        .cols
        .saturating_sub(2 * EDGE_MARGIN_CELLS + CHIP_WIDTH_CELLS)
        .max(0);
    let spacing = if count <= 1 {
        MAX_CHIP_SPACING
    } else {
        (usable / (count - 1)).clamp(MIN_CHIP_SPACING, MAX_CHIP_SPACING)
    };
    let per_row = (usable / spacing + 1).max(1);

    let tallest = order
        .iter()
        .filter_map(|id| configs.get(id.as_str()))
        .map(|c| i32::try_from(c.socket_count.max(c.plug_count)).unwrap_or(i32::MAX))
        .max()
        .unwrap_or(0);
    // One header row, one row per port.
    let row_stride = tallest.saturating_add(1 + ROW_GAP_CELLS);

    (0..count)
        .map(|i| {
            GridCell::new(
                EDGE_MARGIN_CELLS.saturating_add((i % per_row).saturating_mul(spacing)),
                FIRST_CHIP_ROW.saturating_add((i / per_row).saturating_mul(row_stride)),
            )
        })
        .collect()
}

/// Legacy CPs still on a board, for callers that want to report them.
pub fn legacy_cp_ids(board: &GameboardState) -> BTreeSet<String> {
    board
        .chips
        .keys()
        .filter(|id| is_bidirectional_cp(id))
        .cloned()
        .collect()
}
