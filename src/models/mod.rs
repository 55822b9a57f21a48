pub mod bake;
pub mod board;
pub mod cycle;
pub mod timing;

pub use bake::{BakeMetadata, BakedChipConfig, BakedEdge};
pub use board::{
    ChipState, GameboardState, GridCell, NodeRef, PortRef, PortSide, Wire, SAMPLE_HISTORY_LEN,
};
pub use cycle::CycleResults;
pub use timing::WireBlipTiming;
