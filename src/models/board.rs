use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::connection_point::ConnectionPoint;

/// Ring-buffer length shared by every wire's sample history.
pub const SAMPLE_HISTORY_LEN: usize = 16;

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Port side on a chip. Older boards call inputs "socket" and outputs "plug".
#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub enum PortSide {
    #[serde(alias = "socket")]
    Input,
    #[serde(alias = "plug")]
    Output,
}

/// Owner of a port: a real chip or a virtual connection point.
///
/// Serialized as the plain owner id string; CP identities are parsed once here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum NodeRef {
    Chip(String),
    Cp(ConnectionPoint),
}

impl NodeRef {
    pub fn as_cp(&self) -> Option<ConnectionPoint> {
        match self {
            NodeRef::Cp(cp) => Some(*cp),
            NodeRef::Chip(_) => None,
        }
    }

    pub fn is_cp(&self) -> bool {
        matches!(self, NodeRef::Cp(_))
    }

    /// The serialized owner id.
    pub fn id(&self) -> String {
        match self {
            NodeRef::Chip(id) => id.clone(),
            NodeRef::Cp(cp) => cp.encode(),
        }
    }
}

impl From<String> for NodeRef {
    fn from(id: String) -> Self {
        match ConnectionPoint::decode(&id) {
            Some(cp) => NodeRef::Cp(cp),
            None => NodeRef::Chip(id),
        }
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        NodeRef::from(id.to_string())
    }
}

impl From<ConnectionPoint> for NodeRef {
    fn from(cp: ConnectionPoint) -> Self {
        NodeRef::Cp(cp)
    }
}

impl From<NodeRef> for String {
    fn from(node: NodeRef) -> Self {
        match node {
            NodeRef::Chip(id) => id,
            NodeRef::Cp(cp) => cp.encode(),
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub struct PortRef {
    #[serde(rename = "ownerId")]
    #[ts(type = "string")]
    pub owner: NodeRef,
    pub side: PortSide,
    pub port_index: u32,
}

impl PortRef {
    pub fn new(owner: impl Into<NodeRef>, side: PortSide, port_index: u32) -> Self {
        Self {
            owner: owner.into(),
            side,
            port_index,
        }
    }

    pub fn output(owner: impl Into<NodeRef>, port_index: u32) -> Self {
        Self::new(owner, PortSide::Output, port_index)
    }

    pub fn input(owner: impl Into<NodeRef>, port_index: u32) -> Self {
        Self::new(owner, PortSide::Input, port_index)
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub struct ChipState {
    pub id: String,
    #[serde(rename = "type")]
    pub chip_type: String,
    pub position: GridCell,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub params: BTreeMap<String, serde_json::Value>,
    pub socket_count: u32,
    pub plug_count: u32,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub source: PortRef,
    pub target: PortRef,
    /// Routed grid cells, ordered from the source end to the target end.
    #[serde(default)]
    pub route: Vec<GridCell>,
    #[serde(default)]
    #[ts(type = "number[]")]
    pub sample_history: [f64; SAMPLE_HISTORY_LEN],
    #[serde(default)]
    #[ts(type = "number")]
    pub write_head: usize,
}

impl Wire {
    pub fn new(id: impl Into<String>, source: PortRef, target: PortRef) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            route: Vec::new(),
            sample_history: [0.0; SAMPLE_HISTORY_LEN],
            write_head: 0,
        }
    }

    pub fn with_route(mut self, route: Vec<GridCell>) -> Self {
        self.route = route;
        self
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub struct GameboardState {
    pub id: String,
    pub chips: HashMap<String, ChipState>,
    pub paths: Vec<Wire>,
}

impl GameboardState {
    pub fn chip(&self, id: &str) -> Option<&ChipState> {
        self.chips.get(id)
    }

    pub fn wire(&self, id: &str) -> Option<&Wire> {
        self.paths.iter().find(|w| w.id == id)
    }
}
