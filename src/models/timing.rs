use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Animation window of one wire inside a single normalized loop.
///
/// `depart_phase < arrive_phase` always holds for values built by
/// [`crate::timing::WireAnimationCache`].
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/cycle.ts")]
#[ts(rename_all = "camelCase")]
pub struct WireBlipTiming {
    pub wire_id: String,
    pub depart_phase: f64,
    pub arrive_phase: f64,
    pub signal_value: f64,
}

impl WireBlipTiming {
    pub fn duration(&self) -> f64 {
        self.arrive_phase - self.depart_phase
    }
}
