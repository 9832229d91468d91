use std::path::{Path, PathBuf};

use crate::error::RegionError;
use crate::instability::{ExpansionSubset, PeakRecord, RegionIndex, Weighting};
use crate::io::columns::ColumnMap;
use crate::io::sample_key::{RegionDescriptor, SampleSet};
use crate::schema::v1::InstabilityV1;

/// Progress of one region through the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RegionState {
    #[default]
    Pending,
    Extracted(Vec<PeakRecord>),
    Selected(ExpansionSubset),
    Scored(RegionIndex),
    Failed(RegionError),
}

impl RegionState {
    pub fn status(&self) -> &'static str {
        match self {
            RegionState::Pending => "pending",
            RegionState::Extracted(_) => "extracted",
            RegionState::Selected(_) => "selected",
            RegionState::Scored(_) => "ok",
            RegionState::Failed(_) => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionRun {
    pub sample: String,
    pub descriptor: RegionDescriptor,
    pub state: RegionState,
}

impl RegionRun {
    pub fn new(sample: &str, descriptor: RegionDescriptor) -> Self {
        Self {
            sample: sample.to_string(),
            descriptor,
            state: RegionState::Pending,
        }
    }

    pub fn index(&self) -> Option<&RegionIndex> {
        match &self.state {
            RegionState::Scored(index) => Some(index),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RegionError> {
        match &self.state {
            RegionState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub tsv_path: PathBuf,
    pub json_path: PathBuf,
    pub heatmap_input_path: PathBuf,
    pub heatmap_matrix_path: PathBuf,
    pub peaks_dir: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            tsv_path: out_dir.join("instability.tsv"),
            json_path: out_dir.join("instability.json"),
            heatmap_input_path: out_dir.join("heatmap_input.tsv"),
            heatmap_matrix_path: out_dir.join("heatmap_matrix.tsv"),
            peaks_dir: out_dir.join("peaks"),
        }
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub keys: Vec<PathBuf>,
    pub sample_override: Option<String>,
    pub columns: ColumnMap,
    pub weighting: Weighting,
    pub threads: usize,
    pub write_json: bool,
    pub write_peaks: bool,
    pub sample_sets: Vec<SampleSet>,
    pub regions: Vec<RegionRun>,
    /// Sample keys that could not be read; their sample sets are skipped.
    pub key_failures: Vec<String>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: InstabilityV1,
}

impl Ctx {
    pub fn new(
        keys: Vec<PathBuf>,
        out_dir: PathBuf,
        weighting: Weighting,
        tool_version: &str,
    ) -> Self {
        Self {
            keys,
            sample_override: None,
            columns: ColumnMap::default(),
            weighting,
            threads: 0,
            write_json: false,
            write_peaks: false,
            sample_sets: Vec::new(),
            regions: Vec::new(),
            key_failures: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths::new(&out_dir),
            report: InstabilityV1::empty(tool_version, weighting),
        }
    }

    pub fn scored(&self) -> impl Iterator<Item = (&RegionRun, &RegionIndex)> {
        self.regions
            .iter()
            .filter_map(|r| r.index().map(|index| (r, index)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&RegionRun, &RegionError)> {
        self.regions
            .iter()
            .filter_map(|r| r.error().map(|err| (r, err)))
    }
}
