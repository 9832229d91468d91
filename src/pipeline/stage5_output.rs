use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::heatmap::build_matrix;
use crate::io::heatmap_input::HeatmapEntry;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage5Output;

impl Stage5Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Output {
    fn name(&self) -> &'static str {
        "stage5_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let entries: Vec<HeatmapEntry> = ctx
            .scored()
            .map(|(region, index)| HeatmapEntry {
                sample: region.sample.clone(),
                region: region.descriptor.region_name.clone(),
                value: index.instability_index,
            })
            .collect();
        let matrix = build_matrix(&entries);
        ctx.warnings.extend(matrix.warnings.iter().cloned());

        if ctx.write_peaks {
            let files = tsv_writer::write_all_annotated_peaks(&ctx.output.peaks_dir, ctx)?;
            info!(files = files.written.len(), "annotated_peaks_written");
            ctx.warnings.extend(files.warnings);
        }

        let report = json_writer::build_report(ctx, ctx.write_peaks);
        ctx.report = report;

        tsv_writer::write_tsv(&ctx.output.tsv_path, ctx)?;
        tsv_writer::write_heatmap_input(&ctx.output.heatmap_input_path, ctx)?;
        tsv_writer::write_heatmap_matrix(&ctx.output.heatmap_matrix_path, &matrix)?;
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &ctx.report)?;
        }
        info!(out_dir = %ctx.output.out_dir.display(), "stage5_output_ready");
        Ok(())
    }
}
