use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Header names of the required peak table columns. Instrument exports differ,
/// so any entry can be overridden from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub sample_file_name: String,
    pub size: String,
    pub height: String,
    pub area: String,
    pub data_point: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            sample_file_name: "Sample File Name".to_string(),
            size: "Size".to_string(),
            height: "Height".to_string(),
            area: "Area".to_string(),
            data_point: "Data Point".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read column map {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid column map {}", path.display()))
    }

    /// Required columns in canonical order.
    pub fn required(&self) -> [&str; 5] {
        [
            self.sample_file_name.as_str(),
            self.size.as_str(),
            self.height.as_str(),
            self.area.as_str(),
            self.data_point.as_str(),
        ]
    }
}

pub fn header_matches(header: &str, wanted: &str) -> bool {
    header.trim().eq_ignore_ascii_case(wanted.trim())
}
