use serde::{Deserialize, Serialize};

use crate::instability::{AnnotatedPeak, Weighting};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionErrorReport {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: String,
    pub source: String,
    pub modal_height: f64,
    pub modal_size: f64,
    pub status: String,
    pub n_peaks: Option<u64>,
    pub n_expansion_peaks: Option<u64>,
    pub total_signal_mass: Option<f64>,
    pub instability_index: Option<f64>,
    pub height_ties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub peaks: Option<Vec<AnnotatedPeak>>,
    pub error: Option<RegionErrorReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReport {
    pub sample: String,
    pub key: String,
    pub regions: Vec<RegionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstabilityV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub weighting: Weighting,
    pub samples: Vec<SampleReport>,
    #[serde(default)]
    pub key_failures: Vec<String>,
    pub warnings: Vec<String>,
}

impl InstabilityV1 {
    pub fn empty(tool_version: &str, weighting: Weighting) -> Self {
        Self {
            tool: "kira-instability".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            weighting,
            samples: Vec::new(),
            key_failures: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
