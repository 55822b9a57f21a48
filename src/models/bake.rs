use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use ts_rs::TS;

/// Flattened description of a baked sub-circuit, used to rebuild a read-only
/// viewer board.
#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/bake.ts")]
#[ts(rename_all = "camelCase")]
pub struct BakeMetadata {
    #[serde(default)]
    pub topo_order: Vec<String>,
    #[serde(default)]
    pub chip_configs: Vec<BakedChipConfig>,
    #[serde(default)]
    pub edges: Vec<BakedEdge>,
    #[serde(default)]
    pub socket_count: u32,
    #[serde(default)]
    pub plug_count: u32,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/bake.ts")]
#[ts(rename_all = "camelCase")]
pub struct BakedChipConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub chip_type: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub params: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub socket_count: u32,
    #[serde(default)]
    pub plug_count: u32,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../bindings/bake.ts")]
#[ts(rename_all = "camelCase")]
pub struct BakedEdge {
    pub from_chip_id: String,
    pub from_port: u32,
    pub to_chip_id: String,
    pub to_port: u32,
}

impl BakeMetadata {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid bake metadata: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize bake metadata: {}", e))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read bake metadata {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_metadata() {
        let meta = BakeMetadata::from_json(
            r#"{
                "topoOrder": ["and-1"],
                "chipConfigs": [{ "id": "and-1", "type": "and", "socketCount": 2, "plugCount": 1 }],
                "edges": [
                    { "fromChipId": "__cp_input_0__", "fromPort": 0, "toChipId": "and-1", "toPort": 0 }
                ],
                "socketCount": 2,
                "plugCount": 1
            }"#,
        )
        .expect("valid metadata");
        assert_eq!(meta.chip_configs[0].chip_type, "and");
        assert!(meta.chip_configs[0].params.is_empty());
        assert_eq!(meta.edges[0].to_chip_id, "and-1");
    }

    #[test]
    fn reports_malformed_json() {
        let err = BakeMetadata::from_json("{ \"edges\": 3 }").unwrap_err();
        assert!(err.starts_with("Invalid bake metadata"), "{err}");
    }
}
