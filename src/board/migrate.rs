//! Rewrites legacy bidirectional CPs into utility slots.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, warn};

use crate::connection_point::{slot_side, ConnectionPoint, CpCategory, CpSide, SLOTS_PER_SIDE, SLOT_COUNT};
use crate::geometry::{cp_anchor_cell, BoardLayout};
use crate::models::{ChipState, GameboardState, NodeRef};

/// Direction a legacy CP takes once migrated, and whether wiring decided it.
fn infer_side(board: &GameboardState, legacy: &ConnectionPoint) -> (CpSide, bool) {
    let owner = NodeRef::Cp(*legacy);
    if board.paths.iter().any(|w| w.source.owner == owner) {
        return (CpSide::Source, true);
    }
    if board.paths.iter().any(|w| w.target.owner == owner) {
        return (CpSide::Sink, true);
    }
    (slot_side(legacy.index), false)
}

/// Picks a utility slot for a legacy CP of `index` headed to `side`.
///
/// Keeps the index when it is free and already on that side, else the first
/// free slot on that side, else a slot past the fixed six. Never hands out a
/// fixed slot on the opposite edge.
pub fn allocate_slot(index: u32, side: CpSide, occupied: &HashSet<u32>) -> u32 {
    if index < SLOT_COUNT && slot_side(index) == side && !occupied.contains(&index) {
        return index;
    }
    let side_range = match side {
        CpSide::Source => 0..SLOTS_PER_SIDE,
        CpSide::Sink => SLOTS_PER_SIDE..SLOT_COUNT,
    };
    if let Some(slot) = side_range.clone().find(|s| !occupied.contains(s)) {
        return slot;
    }
    occupied
        .iter()
        .copied()
        .max()
        .map_or(SLOT_COUNT, |m| m.max(SLOT_COUNT - 1).saturating_add(1))
}

fn cps_in(board: &GameboardState, category: CpCategory) -> BTreeSet<ConnectionPoint> {
    let from_wires = board
        .paths
        .iter()
        .flat_map(|w| [&w.source.owner, &w.target.owner])
        .filter_map(NodeRef::as_cp);
    let from_chips = board.chips.keys().filter_map(|id| ConnectionPoint::decode(id));
    from_wires
        .chain(from_chips)
        .filter(|cp| cp.category == category)
        .collect()
}

/// Replaces every bidirectional CP on `board` with a utility slot CP.
///
/// Direction comes from the wiring: a CP that drives a wire feeds the board,
/// one that only receives is an output. Unwired CPs fall back to their index
/// (below 3 means input). A CP chip is anchored on its inferred edge, and
/// wire ends follow the chip, even for slots past the fixed six. Returns the
/// number of CPs rewritten; running it again on the result is a no-op.
pub fn migrate_legacy_connection_points(board: &mut GameboardState, layout: &BoardLayout) -> usize {
    let legacy = cps_in(board, CpCategory::Bidirectional);
    if legacy.is_empty() {
        return 0;
    }

    let mut occupied: HashSet<u32> = cps_in(board, CpCategory::Utility)
        .into_iter()
        .map(|cp| cp.index)
        .collect();

    let mut mapping: HashMap<ConnectionPoint, (ConnectionPoint, CpSide)> = HashMap::new();
    for cp in &legacy {
        let (side, from_wiring) = infer_side(board, cp);
        if !from_wiring {
            warn!(
                "[board_migrate] {} has no wires; assuming {} from its index",
                cp,
                match side {
                    CpSide::Source => "input",
                    CpSide::Sink => "output",
                }
            );
        }
        let slot = allocate_slot(cp.index, side, &occupied);
        occupied.insert(slot);
        mapping.insert(*cp, (ConnectionPoint::utility(slot), side));
    }

    for wire in &mut board.paths {
        for port in [&mut wire.source, &mut wire.target] {
            if let Some((utility, _)) = port.owner.as_cp().and_then(|cp| mapping.get(&cp)) {
                port.owner = NodeRef::Cp(*utility);
            }
        }
    }

    for (legacy_cp, (utility, side)) in &mapping {
        let position = cp_anchor_cell(utility, *side, layout);
        match board.chips.remove(&legacy_cp.encode()) {
            Some(mut chip) => {
                chip.id = utility.encode();
                chip.chip_type = CpCategory::Utility.chip_type().to_string();
                chip.position = position;
                board.chips.insert(chip.id.clone(), chip);
            }
            None if utility.index >= SLOT_COUNT => {
                // Off-edge slot with no chip: add one so wire ends follow it.
                board.chips.insert(
                    utility.encode(),
                    ChipState {
                        id: utility.encode(),
                        chip_type: CpCategory::Utility.chip_type().to_string(),
                        position,
                        params: Default::default(),
                        socket_count: 1,
                        plug_count: 1,
                    },
                );
            }
            None => {}
        }
    }

    debug!(
        "[board_migrate] board={} migrated={} legacy CPs",
        board.id,
        mapping.len()
    );
    mapping.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_pixel_path;
    use crate::models::{GridCell, PortRef, Wire};

    fn board(wires: Vec<Wire>) -> GameboardState {
        GameboardState {
            id: "legacy".into(),
            chips: HashMap::new(),
            paths: wires,
        }
    }

    fn owners(board: &GameboardState, wire: &str) -> (String, String) {
        let w = board.wire(wire).unwrap();
        (w.source.owner.id(), w.target.owner.id())
    }

    #[test]
    fn direction_follows_wiring() {
        // Index 4 drives a chip, so it becomes an input despite its index.
        let mut b = board(vec![
            Wire::new("a", PortRef::output(ConnectionPoint::bidirectional(4), 0), PortRef::input("x", 0)),
            Wire::new("b", PortRef::output("x", 0), PortRef::input(ConnectionPoint::bidirectional(1), 0)),
        ]);
        assert_eq!(migrate_legacy_connection_points(&mut b, &BoardLayout::default()), 2);
        assert_eq!(owners(&b, "a").0, "__cp_utility_0__");
        assert_eq!(owners(&b, "b").1, "__cp_utility_3__");
    }

    #[test]
    fn matching_side_keeps_its_index() {
        let mut b = board(vec![
            Wire::new("a", PortRef::output(ConnectionPoint::bidirectional(2), 0), PortRef::input("x", 0)),
            Wire::new("b", PortRef::output("x", 0), PortRef::input(ConnectionPoint::bidirectional(5), 0)),
        ]);
        migrate_legacy_connection_points(&mut b, &BoardLayout::default());
        assert_eq!(owners(&b, "a").0, "__cp_utility_2__");
        assert_eq!(owners(&b, "b").1, "__cp_utility_5__");
    }

    #[test]
    fn unwired_cp_uses_index_heuristic() {
        let layout = BoardLayout::default();
        let mut b = board(Vec::new());
        for index in [1, 4] {
            let cp = ConnectionPoint::bidirectional(index);
            b.chips.insert(
                cp.encode(),
                ChipState {
                    id: cp.encode(),
                    chip_type: CpCategory::Bidirectional.chip_type().into(),
                    position: GridCell::new(0, 0),
                    params: Default::default(),
                    socket_count: 1,
                    plug_count: 1,
                },
            );
        }
        assert_eq!(migrate_legacy_connection_points(&mut b, &layout), 2);

        let input = b.chip("__cp_utility_1__").unwrap();
        assert_eq!(input.chip_type, "cp_utility");
        assert_eq!(input.position, GridCell::new(0, 9));
        let output = b.chip("__cp_utility_4__").unwrap();
        assert_eq!(output.position, GridCell::new(layout.cols, 9));
        assert!(b.chip("__cp_bidir_1__").is_none());
    }

    #[test]
    fn migration_is_idempotent() {
        let mut b = board(vec![Wire::new(
            "a",
            PortRef::output(ConnectionPoint::bidirectional(0), 0),
            PortRef::input("x", 0),
        )]);
        let layout = BoardLayout::default();
        assert_eq!(migrate_legacy_connection_points(&mut b, &layout), 1);
        let once = b.clone();
        assert_eq!(migrate_legacy_connection_points(&mut b, &layout), 0);
        assert_eq!(b, once);
    }

    #[test]
    fn board_without_legacy_cps_is_untouched() {
        let mut b = board(vec![Wire::new(
            "a",
            PortRef::output(ConnectionPoint::input(0), 0),
            PortRef::input("x", 0),
        )]);
        let before = b.clone();
        assert_eq!(migrate_legacy_connection_points(&mut b, &BoardLayout::default()), 0);
        assert_eq!(b, before);
    }

    #[test]
    fn existing_utility_slots_are_not_reused() {
        let mut b = board(vec![
            Wire::new("u", PortRef::output(ConnectionPoint::utility(0), 0), PortRef::input("x", 0)),
            Wire::new("a", PortRef::output(ConnectionPoint::bidirectional(0), 0), PortRef::input("x", 1)),
        ]);
        migrate_legacy_connection_points(&mut b, &BoardLayout::default());
        assert_eq!(owners(&b, "u").0, "__cp_utility_0__");
        assert_eq!(owners(&b, "a").0, "__cp_utility_1__");
    }

    #[test]
    fn allocation_spills_past_fixed_slots_on_same_side() {
        let full_inputs: HashSet<u32> = [0, 1, 2].into();
        assert_eq!(allocate_slot(0, CpSide::Source, &full_inputs), 6);
        let all: HashSet<u32> = (0..6).collect();
        assert_eq!(allocate_slot(2, CpSide::Source, &all), 6);
        let beyond: HashSet<u32> = (0..8).collect();
        assert_eq!(allocate_slot(9, CpSide::Sink, &beyond), 8);
        assert_eq!(allocate_slot(7, CpSide::Sink, &HashSet::new()), 3);
    }

    #[test]
    fn four_inputs_keep_chip_and_wire_on_input_edge() {
        let layout = BoardLayout::default();
        let mut b = board(Vec::new());
        for index in 0..4 {
            let cp = ConnectionPoint::bidirectional(index);
            b.chips.insert(
                cp.encode(),
                ChipState {
                    id: cp.encode(),
                    chip_type: CpCategory::Bidirectional.chip_type().into(),
                    position: GridCell::new(0, 0),
                    params: Default::default(),
                    socket_count: 1,
                    plug_count: 1,
                },
            );
            b.paths.push(Wire::new(
                format!("w{index}"),
                PortRef::output(cp, 0),
                PortRef::input("x", index),
            ));
        }
        assert_eq!(migrate_legacy_connection_points(&mut b, &layout), 4);
        assert_eq!(owners(&b, "w3").0, "__cp_utility_6__");

        for wire in &b.paths {
            let chip = b.chip(&wire.source.owner.id()).unwrap();
            assert_eq!(chip.position.col, 0, "{}", chip.id);
            let start = build_pixel_path(wire, Some(&b.chips), &layout)[0];
            assert_eq!(start, layout.cell_point(chip.position), "{}", wire.id);
        }
        let rows: HashSet<i32> = b.chips.values().map(|c| c.position.row).collect();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn spilled_cp_without_chip_gets_one() {
        let layout = BoardLayout::default();
        let mut b = board(
            (0..4)
                .map(|i| {
                    Wire::new(
                        format!("w{i}"),
                        PortRef::output("x", i),
                        PortRef::input(ConnectionPoint::bidirectional(i + 3), 0),
                    )
                })
                .collect(),
        );
        migrate_legacy_connection_points(&mut b, &layout);
        // bidir 3..5 keep their sink slots, bidir 6 spills to slot 6.
        let spilled = b.chip("__cp_utility_6__").unwrap();
        assert_eq!(spilled.position.col, layout.cols);
        let end = *build_pixel_path(b.wire("w3").unwrap(), Some(&b.chips), &layout).last().unwrap();
        assert_eq!(end.x, f64::from(layout.cols) * layout.cell_size);
    }
}
