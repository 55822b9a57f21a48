use std::collections::HashMap;

use super::{BoardLayout, Point, CHIP_WIDTH_CELLS, CP_FIRST_ROW, CP_ROW_STRIDE};
use crate::connection_point::{ConnectionPoint, CpCategory, CpSide, SLOTS_PER_SIDE};
use crate::models::{ChipState, GridCell, NodeRef, PortRef, PortSide};

/// Pixel position of `port`, or `None` when its chip is not on the board.
///
/// A CP with a chip on the board is pinned to that chip's position; otherwise
/// it is placed by [`cp_anchor_cell`].
pub fn resolve_port_position(
    port: &PortRef,
    chips: &HashMap<String, ChipState>,
    layout: &BoardLayout,
) -> Option<Point> {
    match &port.owner {
        NodeRef::Cp(cp) => {
            if let Some(chip) = chips.get(&cp.encode()) {
                return Some(layout.cell_point(chip.position));
            }
            let side = cp_physical_side(cp, port.side);
            Some(layout.cell_point(cp_anchor_cell(cp, side, layout)))
        }
        NodeRef::Chip(id) => {
            let chip = chips.get(id)?;
            Some(layout.cell_point(chip_port_cell(chip, port.side, port.port_index)))
        }
    }
}

/// Board edge a CP is drawn on.
///
/// Categories with a known logical side use it. Bidirectional CPs fall back to
/// the port they are referenced through: a CP driving a wire feeds the board
/// and sits on the input edge.
pub fn cp_physical_side(cp: &ConnectionPoint, port_side: PortSide) -> CpSide {
    cp.logical_side().unwrap_or(match port_side {
        PortSide::Output => CpSide::Source,
        PortSide::Input => CpSide::Sink,
    })
}

/// Grid intersection a CP is anchored to on the given edge.
pub fn cp_anchor_cell(cp: &ConnectionPoint, side: CpSide, layout: &BoardLayout) -> GridCell {
    let slot = match cp.category {
        CpCategory::Creative | CpCategory::Utility if cp.index >= SLOTS_PER_SIDE => {
            cp.index - SLOTS_PER_SIDE
        }
        _ => cp.index,
    };
    let col = match side {
        CpSide::Source => 0,
        CpSide::Sink => layout.cols,
    };
    let slot = i32::try_from(slot).unwrap_or(i32::MAX);
    GridCell::new(col, CP_FIRST_ROW.saturating_add(slot.saturating_mul(CP_ROW_STRIDE)))
}

fn chip_port_cell(chip: &ChipState, side: PortSide, port_index: u32) -> GridCell {
    let port_index = i32::try_from(port_index).unwrap_or(i32::MAX);
    let row = chip.position.row.saturating_add(1).saturating_add(port_index);
    let col = match side {
        PortSide::Input => chip.position.col,
        PortSide::Output => chip.position.col.saturating_add(CHIP_WIDTH_CELLS),
    };
    GridCell::new(col, row)
}
