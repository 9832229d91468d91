use crate::error::RegionError;
use crate::instability::{AnnotatedPeak, ExpansionSubset, RegionIndex, Weighting};
use crate::math::round::round3;

pub fn compute_index(
    subset: &ExpansionSubset,
    weighting: Weighting,
) -> Result<RegionIndex, RegionError> {
    let peaks = &subset.peaks;
    let total_signal_mass = peaks.iter().map(|p| p.height).sum::<f64>() + subset.modal_height;
    if total_signal_mass == 0.0 || !total_signal_mass.is_finite() {
        return Err(RegionError::DegenerateInput {
            modal_height: subset.modal_height,
            n_peaks: peaks.len(),
        });
    }

    let Some(max_row) = max_height_row(subset) else {
        return Ok(RegionIndex {
            peaks: Vec::new(),
            total_signal_mass,
            instability_index: 0.0,
            n_peaks: subset.n_peaks,
            height_ties: 0,
        });
    };

    let mut annotated = Vec::with_capacity(peaks.len());
    let mut height_ties = 0usize;
    let mut sum = 0.0f64;
    for (i, peak) in peaks.iter().enumerate() {
        let first_match = peaks
            .iter()
            .position(|p| p.height == peak.height)
            .unwrap_or(i);
        if first_match != i {
            height_ties += 1;
        }
        let current_row = match weighting {
            Weighting::HeightMatch => peaks[first_match].row,
            Weighting::Row => peak.row,
        };
        let change_from_main = current_row as i64 - max_row as i64 + 1;
        let normalized_height = round3(peak.height / total_signal_mass);
        let normalized_peak = round3(normalized_height * change_from_main as f64);
        sum += normalized_peak;
        annotated.push(AnnotatedPeak {
            peak: peak.clone(),
            normalized_height,
            change_from_main,
            normalized_peak,
        });
    }

    Ok(RegionIndex {
        peaks: annotated,
        total_signal_mass,
        instability_index: round3(sum),
        n_peaks: subset.n_peaks,
        height_ties,
    })
}

/// Source row of the tallest subset peak; the earliest row wins on ties.
fn max_height_row(subset: &ExpansionSubset) -> Option<usize> {
    let mut best: Option<(f64, usize)> = None;
    for peak in &subset.peaks {
        match best {
            Some((height, _)) if peak.height <= height => {}
            _ => best = Some((peak.height, peak.row)),
        }
    }
    best.map(|(_, row)| row)
}
