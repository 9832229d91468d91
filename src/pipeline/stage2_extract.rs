use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::{Ctx, RegionState};
use crate::io::peak_table::read_peak_table;
use crate::pipeline::Stage;

pub struct Stage2Extract;

impl Stage2Extract {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Extract {
    fn name(&self) -> &'static str {
        "stage2_extract"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut failed = 0usize;
        for region in ctx.regions.iter_mut() {
            if !matches!(region.state, RegionState::Pending) {
                continue;
            }
            let path = &region.descriptor.source_path;
            region.state = match read_peak_table(path, &region.sample, &ctx.columns) {
                Ok(peaks) => RegionState::Extracted(peaks),
                Err(err) => {
                    warn!(
                        sample = %region.sample,
                        region = %region.descriptor.region_name,
                        error = %err,
                        "peak_table_failed"
                    );
                    failed += 1;
                    RegionState::Failed(err)
                }
            };
        }
        info!(regions = ctx.regions.len(), failed, "peaks_extracted");
        Ok(())
    }
}
