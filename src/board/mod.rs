//! Read-only viewer boards rebuilt from bake metadata.

mod migrate;
mod reconstruct;

pub use migrate::{allocate_slot, migrate_legacy_connection_points};
pub use reconstruct::{
    build_board, chip_order, legacy_cp_ids, place_chips, reconstruct_board,
    reconstruct_board_from_json, EDGE_MARGIN_CELLS, FIRST_CHIP_ROW, MAX_CHIP_SPACING,
    MIN_CHIP_SPACING,
};
