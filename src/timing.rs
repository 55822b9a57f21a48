//! Wavefront timing: when a signal visually leaves and reaches each wire's
//! ends within one normalized animation loop.
//!
//! A chip fires at `depth / max(maxDepth, 1)`, so every chip at the same depth
//! fires together. Wires depart at their source's phase and arrive at their
//! target's phase. CPs pin the loop ends: boundary inputs fire at 0 and
//! boundary outputs receive at 1.

use std::collections::HashMap;

use log::debug;

use crate::models::{CycleResults, NodeRef, Wire, WireBlipTiming};

const PHASE_EPSILON: f64 = 1e-9;

/// Timings for every wire of one board at one playpoint.
///
/// Built in one go and never mutated; a new cycle result or playpoint means a
/// new cache.
#[derive(Clone, Debug, Default)]
pub struct WireAnimationCache {
    timings: HashMap<String, WireBlipTiming>,
    max_depth: u32,
}

impl WireAnimationCache {
    pub fn build(cycle: &CycleResults, wires: &[Wire], playpoint: usize) -> Self {
        let span = phase_denominator(cycle.max_depth);
        let min_gap = 1.0 / span;
        let mut feedback_edges = 0usize;

        let timings: HashMap<String, WireBlipTiming> = wires
            .iter()
            .map(|wire| {
                let mut depart = endpoint_phase(cycle, &wire.source.owner, 0.0);
                let mut arrive = endpoint_phase(cycle, &wire.target.owner, 1.0);

                if arrive <= depart {
                    feedback_edges += 1;
                    arrive = 1.0;
                }
                if arrive - depart + PHASE_EPSILON < min_gap {
                    arrive = (depart + min_gap).min(1.0);
                }
                if arrive - depart + PHASE_EPSILON < min_gap {
                    // Source already sits on the last wavefront; start earlier instead.
                    depart = (arrive - min_gap).max(0.0);
                }

                let timing = WireBlipTiming {
                    wire_id: wire.id.clone(),
                    depart_phase: depart,
                    arrive_phase: arrive,
                    signal_value: cycle.wire_value(&wire.id, playpoint),
                };
                (wire.id.clone(), timing)
            })
            .collect();

        debug!(
            "[wire_timing] built wires={} max_depth={} feedback={} playpoint={}",
            timings.len(),
            cycle.max_depth,
            feedback_edges,
            playpoint
        );

        Self {
            timings,
            max_depth: cycle.max_depth,
        }
    }

    pub fn get(&self, wire_id: &str) -> Option<&WireBlipTiming> {
        self.timings.get(wire_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WireBlipTiming> {
        self.timings.values()
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// Wavefront phase of a chip: `depth / max(maxDepth, 1)`, capped at 1.
pub fn chip_phase(cycle: &CycleResults, chip_id: &str) -> f64 {
    let span = phase_denominator(cycle.max_depth);
    (f64::from(cycle.depth_of(chip_id)) / span).min(1.0)
}

fn phase_denominator(max_depth: u32) -> f64 {
    f64::from(max_depth.max(1))
}

fn endpoint_phase(cycle: &CycleResults, node: &NodeRef, cp_phase: f64) -> f64 {
    match node {
        NodeRef::Cp(_) => cp_phase,
        NodeRef::Chip(id) => chip_phase(cycle, id),
    }
}
