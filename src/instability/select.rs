use crate::instability::{ExpansionSubset, PeakRecord};

/// Peaks below this fraction of the modal height are treated as noise.
pub const LOWER_HEIGHT_FRACTION: f64 = 0.01;

pub fn is_expansion_peak(peak: &PeakRecord, modal_height: f64, modal_size: f64) -> bool {
    peak.height >= LOWER_HEIGHT_FRACTION * modal_height
        && peak.height <= modal_height
        && peak.size > modal_size
}

pub fn select_expansion_peaks(
    peaks: &[PeakRecord],
    modal_height: f64,
    modal_size: f64,
) -> ExpansionSubset {
    let selected = peaks
        .iter()
        .filter(|p| is_expansion_peak(p, modal_height, modal_size))
        .cloned()
        .collect::<Vec<_>>();
    ExpansionSubset {
        peaks: selected,
        modal_height,
        n_peaks: peaks.len(),
    }
}
