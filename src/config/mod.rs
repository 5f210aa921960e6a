//! JSON configuration for the `detect_diagram` tool.
//!
//! ```json
//! {
//!   "input": "diagram.png",
//!   "statistics": "data/statistics.json",
//!   "canny": { "sigma": 1.5, "contrast_normalized": true },
//!   "parser": { "tracer": "moore", "classifier": { "noise_area_threshold": 10 } },
//!   "output": { "edge_image": "out/edges.png", "report_json": "out/report.json" }
//! }
//! ```
//! Omitted `canny` and `parser` sections fall back to their defaults.
use crate::edges::CannyParams;
use crate::parser::ParserParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DetectorToolConfig {
    pub input: PathBuf,
    pub statistics: PathBuf,
    #[serde(default)]
    pub canny: CannyParams,
    #[serde(default)]
    pub parser: ParserParams,
    pub output: DetectorOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectorOutputConfig {
    #[serde(rename = "edge_image")]
    pub edge_image: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<DetectorToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<DetectorToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}
