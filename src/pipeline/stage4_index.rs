use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::{Ctx, RegionRun, RegionState};
use crate::error::RegionError;
use crate::instability::{RegionIndex, Weighting, compute_index};
use crate::pipeline::Stage;

#[cfg(feature = "mt")]
use rayon::prelude::*;

type Scored = Option<Result<RegionIndex, RegionError>>;

pub struct Stage4Index;

impl Stage4Index {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Index {
    fn name(&self) -> &'static str {
        "stage4_index"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let results = score_regions(&ctx.regions, ctx.weighting, ctx.threads)?;

        let mut scored = 0usize;
        let mut failed = 0usize;
        for (region, result) in ctx.regions.iter_mut().zip(results) {
            let Some(result) = result else {
                continue;
            };
            region.state = match result {
                Ok(index) => {
                    if index.height_ties > 0 && ctx.weighting == Weighting::HeightMatch {
                        warn!(
                            sample = %region.sample,
                            region = %region.descriptor.region_name,
                            ties = index.height_ties,
                            "equal expansion peak heights; change_from_main uses first matching row"
                        );
                        ctx.warnings.push(format!(
                            "{}/{}: {} expansion peak(s) share a height with an earlier peak; change_from_main resolved to the first matching row",
                            region.sample, region.descriptor.region_name, index.height_ties
                        ));
                    }
                    scored += 1;
                    RegionState::Scored(index)
                }
                Err(err) => {
                    warn!(
                        sample = %region.sample,
                        region = %region.descriptor.region_name,
                        error = %err,
                        "instability_index_failed"
                    );
                    failed += 1;
                    RegionState::Failed(err)
                }
            };
        }
        info!(scored, failed, "instability_index_ready");
        Ok(())
    }
}

fn score_one(region: &RegionRun, weighting: Weighting) -> Scored {
    match &region.state {
        RegionState::Selected(subset) => Some(compute_index(subset, weighting)),
        _ => None,
    }
}

#[cfg(feature = "mt")]
fn score_regions(
    regions: &[RegionRun],
    weighting: Weighting,
    threads: usize,
) -> Result<Vec<Scored>> {
    if threads == 1 {
        return Ok(regions.iter().map(|r| score_one(r, weighting)).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
    Ok(pool.install(|| {
        regions
            .par_iter()
            .map(|r| score_one(r, weighting))
            .collect()
    }))
}

#[cfg(not(feature = "mt"))]
fn score_regions(
    regions: &[RegionRun],
    weighting: Weighting,
    _threads: usize,
) -> Result<Vec<Scored>> {
    Ok(regions.iter().map(|r| score_one(r, weighting)).collect())
}
