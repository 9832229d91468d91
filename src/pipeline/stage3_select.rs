use anyhow::Result;
use tracing::{debug, info};

use crate::ctx::{Ctx, RegionState};
use crate::instability::select_expansion_peaks;
use crate::pipeline::Stage;

pub struct Stage3Select;

impl Stage3Select {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Select {
    fn name(&self) -> &'static str {
        "stage3_select"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for region in ctx.regions.iter_mut() {
            let RegionState::Extracted(peaks) = &region.state else {
                continue;
            };
            let d = &region.descriptor;
            let subset = select_expansion_peaks(peaks, d.modal_height, d.modal_size);
            debug!(
                sample = %region.sample,
                region = %d.region_name,
                peaks = peaks.len(),
                expansion_peaks = subset.peaks.len(),
                "expansion_peaks_selected"
            );
            region.state = RegionState::Selected(subset);
        }
        info!("expansion_peaks_ready");
        Ok(())
    }
}
