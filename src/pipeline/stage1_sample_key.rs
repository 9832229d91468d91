use std::collections::HashSet;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::{Ctx, RegionRun, RegionState};
use crate::io::sample_key::load_sample_set;
use crate::pipeline::Stage;

pub struct Stage1SampleKey;

impl Stage1SampleKey {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1SampleKey {
    fn name(&self) -> &'static str {
        "stage1_sample_key"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.keys.is_empty() {
            bail!("at least one sample key is required");
        }
        if ctx.sample_override.is_some() && ctx.keys.len() != 1 {
            bail!("--sample can only be used with a single --key");
        }

        let mut seen = HashSet::new();
        for key in &ctx.keys {
            let set = match load_sample_set(key, ctx.sample_override.as_deref()) {
                Ok(set) => set,
                Err(err) => {
                    let message = format!("{:#}", err);
                    warn!(key = %key.display(), error = %message, "sample_key_failed");
                    ctx.key_failures.push(message);
                    continue;
                }
            };
            if !seen.insert(set.sample.clone()) {
                bail!(
                    "duplicate sample label '{}' (from {})",
                    set.sample,
                    key.display()
                );
            }
            if set.rows.is_empty() {
                ctx.warnings
                    .push(format!("sample key {} lists no regions", key.display()));
            }
            let mut invalid = 0usize;
            for row in &set.rows {
                let mut run = RegionRun::new(&set.sample, row.descriptor.clone());
                if let Some(err) = &row.error {
                    warn!(
                        sample = %set.sample,
                        region = %row.descriptor.region_name,
                        error = %err,
                        "sample_key_row_invalid"
                    );
                    invalid += 1;
                    run.state = RegionState::Failed(err.clone());
                }
                ctx.regions.push(run);
            }
            info!(
                sample = %set.sample,
                key = %key.display(),
                regions = set.rows.len(),
                invalid,
                "sample_key_loaded"
            );
            ctx.sample_sets.push(set);
        }

        if ctx.sample_sets.is_empty() {
            bail!("no sample key could be loaded: {}", ctx.key_failures.join("; "));
        }
        Ok(())
    }
}
