use serde::{Deserialize, Serialize};

pub mod index;
pub mod select;

pub use index::compute_index;
pub use select::{LOWER_HEIGHT_FRACTION, is_expansion_peak, select_expansion_peaks};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    pub sample_name: String,
    pub size: f64,
    pub height: f64,
    pub area: f64,
    pub data_point: f64,
    /// Zero-based data row in the source peak table.
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPeak {
    #[serde(flatten)]
    pub peak: PeakRecord,
    pub normalized_height: f64,
    pub change_from_main: i64,
    pub normalized_peak: f64,
}

/// Expansion candidates of one region, still in source row order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSubset {
    pub peaks: Vec<PeakRecord>,
    pub modal_height: f64,
    pub n_peaks: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionIndex {
    pub peaks: Vec<AnnotatedPeak>,
    pub total_signal_mass: f64,
    pub instability_index: f64,
    pub n_peaks: usize,
    pub height_ties: usize,
}

/// How a peak's own row is located when computing `change_from_main`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// First subset row with an equal height. Reproduces published values.
    #[default]
    HeightMatch,
    /// The peak's own source row.
    Row,
}

impl Weighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weighting::HeightMatch => "height_match",
            Weighting::Row => "row",
        }
    }
}
