use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::{Ctx, RegionRun, RegionState};
use crate::schema::v1::{InstabilityV1, RegionErrorReport, RegionReport, SampleReport};

pub fn build_report(ctx: &Ctx, include_peaks: bool) -> InstabilityV1 {
    let samples = ctx
        .sample_sets
        .iter()
        .map(|set| SampleReport {
            sample: set.sample.clone(),
            key: set.key_path.display().to_string(),
            regions: ctx
                .regions
                .iter()
                .filter(|r| r.sample == set.sample)
                .map(|r| region_report(r, include_peaks))
                .collect(),
        })
        .collect();

    let mut report = InstabilityV1::empty(&ctx.report.version, ctx.weighting);
    report.samples = samples;
    report.key_failures = ctx.key_failures.clone();
    report.warnings = ctx.warnings.clone();
    report
}

fn region_report(region: &RegionRun, include_peaks: bool) -> RegionReport {
    let d = &region.descriptor;
    let mut out = RegionReport {
        region: d.region_name.clone(),
        source: d.source_path.display().to_string(),
        modal_height: d.modal_height,
        modal_size: d.modal_size,
        status: region.state.status().to_string(),
        n_peaks: None,
        n_expansion_peaks: None,
        total_signal_mass: None,
        instability_index: None,
        height_ties: None,
        peaks: None,
        error: None,
    };
    match &region.state {
        RegionState::Scored(index) => {
            out.n_peaks = Some(index.n_peaks as u64);
            out.n_expansion_peaks = Some(index.peaks.len() as u64);
            out.total_signal_mass = Some(index.total_signal_mass);
            out.instability_index = Some(index.instability_index);
            out.height_ties = Some(index.height_ties as u64);
            if include_peaks {
                out.peaks = Some(index.peaks.clone());
            }
        }
        RegionState::Failed(err) => {
            out.error = Some(RegionErrorReport {
                kind: err.kind().to_string(),
                message: err.to_string(),
            });
        }
        _ => {}
    }
    out
}

pub fn write_json(path: &Path, report: &InstabilityV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
