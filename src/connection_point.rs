//! Connection point (CP) addressing.
//!
//! CPs are virtual boundary nodes of a board. They are never rendered as chips
//! but show up as wire endpoints, addressed by a string identity of the form
//! `__cp_<category>_<index>__`. The string form only exists at the
//! serialization boundary; inside the crate a CP is a [`ConnectionPoint`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const CP_PREFIX: &str = "__cp_";
const CP_SUFFIX: &str = "__";

/// Number of flat slots used by creative-mode and utility CPs.
pub const SLOT_COUNT: u32 = 6;
/// Slots below this index sit on the input edge, the rest on the output edge.
pub const SLOTS_PER_SIDE: u32 = 3;

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/board.ts")]
#[ts(rename_all = "camelCase")]
pub enum CpCategory {
    Input,
    Output,
    Creative,
    /// Legacy bidirectional CP, superseded by [`CpCategory::Utility`].
    Bidirectional,
    Utility,
}

/// Which way a CP moves signal relative to the board's internal graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CpSide {
    /// Feeds signal into the board (drawn on the left edge).
    Source,
    /// Receives signal from the board (drawn on the right edge).
    Sink,
}

impl CpCategory {
    pub const ALL: [CpCategory; 5] = [
        CpCategory::Input,
        CpCategory::Output,
        CpCategory::Creative,
        CpCategory::Bidirectional,
        CpCategory::Utility,
    ];

    fn tag(self) -> &'static str {
        match self {
            CpCategory::Input => "input",
            CpCategory::Output => "output",
            CpCategory::Creative => "creative",
            CpCategory::Bidirectional => "bidir",
            CpCategory::Utility => "utility",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Chip type used when a CP is materialized as a board chip.
    pub fn chip_type(self) -> &'static str {
        match self {
            CpCategory::Input => "cp_input",
            CpCategory::Output => "cp_output",
            CpCategory::Creative => "cp_creative",
            CpCategory::Bidirectional => "cp_bidir",
            CpCategory::Utility => "cp_utility",
        }
    }

    /// Logical side for a CP of this category at `index`.
    ///
    /// Returns `None` for bidirectional CPs: their direction is only known from
    /// the wiring that touches them.
    pub fn logical_side(self, index: u32) -> Option<CpSide> {
        match self {
            CpCategory::Input => Some(CpSide::Source),
            CpCategory::Output => Some(CpSide::Sink),
            CpCategory::Creative | CpCategory::Utility => Some(slot_side(index)),
            CpCategory::Bidirectional => None,
        }
    }
}

/// Physical side of a flat slot index.
pub fn slot_side(index: u32) -> CpSide {
    if index < SLOTS_PER_SIDE {
        CpSide::Source
    } else {
        CpSide::Sink
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionPoint {
    pub category: CpCategory,
    pub index: u32,
}

impl ConnectionPoint {
    pub fn new(category: CpCategory, index: u32) -> Self {
        Self { category, index }
    }

    pub fn input(index: u32) -> Self {
        Self::new(CpCategory::Input, index)
    }

    pub fn output(index: u32) -> Self {
        Self::new(CpCategory::Output, index)
    }

    pub fn utility(index: u32) -> Self {
        Self::new(CpCategory::Utility, index)
    }

    pub fn bidirectional(index: u32) -> Self {
        Self::new(CpCategory::Bidirectional, index)
    }

    /// Decodes an identity string; `None` when it is not a CP.
    ///
    /// Both the prefix and the suffix must match and the index must be a plain
    /// run of ASCII digits, so strings that merely start like a CP are rejected.
    pub fn decode(identity: &str) -> Option<Self> {
        let body = identity
            .strip_prefix(CP_PREFIX)?
            .strip_suffix(CP_SUFFIX)?;
        let (tag, digits) = body.rsplit_once('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let category = CpCategory::from_tag(tag)?;
        let index = digits.parse::<u32>().ok()?;
        Some(Self { category, index })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn logical_side(&self) -> Option<CpSide> {
        self.category.logical_side(self.index)
    }
}

impl fmt::Display for ConnectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CP_PREFIX}{}_{}{CP_SUFFIX}",
            self.category.tag(),
            self.index
        )
    }
}

impl FromStr for ConnectionPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s).ok_or_else(|| format!("'{s}' is not a connection point identity"))
    }
}

pub fn encode(category: CpCategory, index: u32) -> String {
    ConnectionPoint::new(category, index).encode()
}

pub fn decode(identity: &str) -> Option<(CpCategory, u32)> {
    ConnectionPoint::decode(identity).map(|cp| (cp.category, cp.index))
}

pub fn is_cp(identity: &str) -> bool {
    ConnectionPoint::decode(identity).is_some()
}

/// True when `identity` is a CP of exactly `category`.
pub fn is_category(identity: &str, category: CpCategory) -> bool {
    decode(identity).is_some_and(|(c, _)| c == category)
}

pub fn is_input_cp(identity: &str) -> bool {
    is_category(identity, CpCategory::Input)
}

pub fn is_output_cp(identity: &str) -> bool {
    is_category(identity, CpCategory::Output)
}

pub fn is_creative_slot(identity: &str) -> bool {
    is_category(identity, CpCategory::Creative)
}

pub fn is_bidirectional_cp(identity: &str) -> bool {
    is_category(identity, CpCategory::Bidirectional)
}

pub fn is_utility_slot(identity: &str) -> bool {
    is_category(identity, CpCategory::Utility)
}

/// Index of `identity` within `category`, or `-1` when it does not match.
pub fn get_index(identity: &str, category: CpCategory) -> i64 {
    match decode(identity) {
        Some((c, index)) if c == category => i64::from(index),
        _ => -1,
    }
}
