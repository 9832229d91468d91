use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ctx::{Ctx, RegionState};
use crate::heatmap::HeatmapMatrix;
use crate::instability::AnnotatedPeak;

const NA: &str = "NA";

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let mut w = create(path)?;
    writeln!(
        w,
        "sample\tregion\tsource\tmodal_height\tmodal_size\tn_peaks\tn_expansion_peaks\ttotal_signal_mass\tinstability_index\tstatus\terror"
    )?;
    for region in &ctx.regions {
        let d = &region.descriptor;
        write!(
            w,
            "{}\t{}\t{}\t{}\t{}\t",
            region.sample,
            d.region_name,
            d.source_path.display(),
            finite_or_na(d.modal_height),
            finite_or_na(d.modal_size)
        )?;
        match &region.state {
            RegionState::Scored(index) => writeln!(
                w,
                "{}\t{}\t{}\t{:.3}\tok\t",
                index.n_peaks,
                index.peaks.len(),
                index.total_signal_mass,
                index.instability_index
            )?,
            RegionState::Failed(err) => writeln!(
                w,
                "{NA}\t{NA}\t{NA}\t{NA}\terror:{}\t{}",
                err.kind(),
                sanitize_field(&err.to_string())
            )?,
            other => writeln!(w, "{NA}\t{NA}\t{NA}\t{NA}\t{}\t", other.status())?,
        }
    }
    w.flush()?;
    Ok(())
}

/// Successful regions as `sample<TAB>region<TAB>index`, the heatmap input format.
pub fn write_heatmap_input(path: &Path, ctx: &Ctx) -> Result<()> {
    let mut w = create(path)?;
    for (region, index) in ctx.scored() {
        writeln!(
            w,
            "{}\t{}\t{:.3}",
            region.sample, region.descriptor.region_name, index.instability_index
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_heatmap_matrix(path: &Path, matrix: &HeatmapMatrix) -> Result<()> {
    let mut w = create(path)?;
    write!(w, "sample")?;
    for region in &matrix.regions {
        write!(w, "\t{}", region)?;
    }
    writeln!(w, "\tmean")?;
    for row in &matrix.rows {
        write!(w, "{}", row.sample)?;
        for value in &row.values {
            match value {
                Some(v) => write!(w, "\t{:.3}", v)?,
                None => write!(w, "\t{NA}")?,
            }
        }
        writeln!(w, "\t{:.3}", row.mean)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_annotated_peaks(path: &Path, peaks: &[AnnotatedPeak]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(
        w,
        "sample_name\trow\tsize\theight\tarea\tdata_point\tnormalized_height\tchange_from_main\tnormalized_peak"
    )?;
    for a in peaks {
        let p = &a.peak;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.3}\t{}\t{:.3}",
            p.sample_name,
            p.row,
            p.size,
            p.height,
            p.area,
            p.data_point,
            a.normalized_height,
            a.change_from_main,
            a.normalized_peak
        )?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct PeakFiles {
    pub written: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Writes `<peaks_dir>/<sample>/<region>.tsv` for every scored region.
/// Names that sanitize to an already used file get a `_<n>` suffix.
pub fn write_all_annotated_peaks(peaks_dir: &Path, ctx: &Ctx) -> Result<PeakFiles> {
    let mut files = PeakFiles::default();
    let mut taken = HashSet::new();
    for (region, index) in ctx.scored() {
        let dir = peaks_dir.join(file_component(&region.sample));
        let stem = file_component(&region.descriptor.region_name);
        let mut path = dir.join(format!("{}.tsv", stem));
        let mut n = 1;
        while !taken.insert(path.to_string_lossy().to_lowercase()) {
            n += 1;
            path = dir.join(format!("{}_{}.tsv", stem, n));
        }
        if n > 1 {
            files.warnings.push(format!(
                "{}/{}: peak file name already used, written to {}",
                region.sample,
                region.descriptor.region_name,
                path.display()
            ));
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        write_annotated_peaks(&path, &index.peaks)?;
        files.written.push(path);
    }
    Ok(files)
}

/// Maps a label to a single safe path component; never `.` or `..`.
pub fn file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

fn finite_or_na(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        NA.to_string()
    }
}

fn sanitize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
