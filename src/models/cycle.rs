use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use super::board::{NodeRef, Wire};

/// Result of one evaluation cycle, produced by the evaluation engine.
///
/// Read-only here: the visualizer never changes it, only derives timing and
/// colors from it.
#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/cycle.ts")]
#[ts(rename_all = "camelCase")]
pub struct CycleResults {
    /// Chip ids in topological evaluation order.
    #[serde(default)]
    pub processing_order: Vec<String>,
    #[serde(default)]
    #[ts(type = "Record<string, number>")]
    pub node_depths: HashMap<String, u32>,
    #[serde(default)]
    pub max_depth: u32,
    /// Per-wire samples, one per evaluation sub-step.
    #[serde(default)]
    pub wire_values: HashMap<String, Vec<f64>>,
    #[serde(default)]
    pub live_node_ids: HashSet<String>,
}

impl CycleResults {
    /// Depth of a chip; unknown chips sit at depth 0.
    pub fn depth_of(&self, chip_id: &str) -> u32 {
        self.node_depths.get(chip_id).copied().unwrap_or(0)
    }

    /// Sample of `wire_id` at `playpoint`, 0 when absent.
    pub fn wire_value(&self, wire_id: &str, playpoint: usize) -> f64 {
        self.wire_values
            .get(wire_id)
            .and_then(|samples| samples.get(playpoint))
            .copied()
            .unwrap_or(0.0)
    }

    /// A wire is live when every chip endpoint was live this cycle.
    /// Connection points are always live.
    pub fn is_wire_live(&self, wire: &Wire) -> bool {
        self.is_node_live(&wire.source.owner) && self.is_node_live(&wire.target.owner)
    }

    fn is_node_live(&self, node: &NodeRef) -> bool {
        match node {
            NodeRef::Cp(_) => true,
            NodeRef::Chip(id) => self.live_node_ids.contains(id),
        }
    }
}
