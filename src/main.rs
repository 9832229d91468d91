use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_instability::cli::{Cli, Commands, HeatmapArgs, RunArgs, ValidateArgs};
use kira_instability::ctx::{Ctx, RegionState};
use kira_instability::heatmap::build_matrix;
use kira_instability::instability::Weighting;
use kira_instability::io::columns::ColumnMap;
use kira_instability::io::heatmap_input::load_heatmap_input;
use kira_instability::io::{summary, tsv_writer};
use kira_instability::pipeline::Pipeline;
use kira_instability::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_instability::pipeline::stage1_sample_key::Stage1SampleKey;
use kira_instability::pipeline::stage2_extract::Stage2Extract;
use kira_instability::pipeline::stage3_select::Stage3Select;
use kira_instability::pipeline::stage4_index::Stage4Index;
use kira_instability::pipeline::stage5_output::Stage5Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args),
        Commands::Validate(args) => handle_validate(args),
        Commands::Heatmap(args) => handle_heatmap(args),
    }
}

fn load_columns(path: Option<&PathBuf>) -> Result<ColumnMap> {
    match path {
        Some(p) => ColumnMap::load(p),
        None => Ok(ColumnMap::default()),
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.key,
        args.out,
        args.weighting.into(),
        env!("CARGO_PKG_VERSION"),
    );
    ctx.sample_override = args.sample;
    ctx.columns = load_columns(args.columns.as_ref())?;
    ctx.threads = args.threads;
    ctx.write_json = args.json;
    ctx.write_peaks = args.peaks;

    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1SampleKey::new()),
        Box::new(Stage2Extract::new()),
        Box::new(Stage3Select::new()),
        Box::new(Stage4Index::new()),
        Box::new(Stage5Output::new()),
    ]);
    pipeline.run(&mut ctx)?;

    print!("{}", summary::format_summary(&ctx));
    print_warnings(&ctx.warnings);
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.key,
        PathBuf::from("."),
        Weighting::default(),
        env!("CARGO_PKG_VERSION"),
    );
    ctx.columns = load_columns(args.columns.as_ref())?;

    let pipeline = Pipeline::new(vec![
        Box::new(Stage1SampleKey::new()),
        Box::new(Stage2Extract::new()),
        Box::new(Stage3Select::new()),
    ]);
    pipeline.run(&mut ctx)?;

    let failed = print_validate_summary(&ctx);
    if failed > 0 {
        anyhow::bail!("{} failure(s) in validation", failed);
    }
    Ok(())
}

fn handle_heatmap(args: HeatmapArgs) -> Result<()> {
    let entries = load_heatmap_input(&args.input)?;
    let matrix = build_matrix(&entries);
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let path = args.out.join("heatmap_matrix.tsv");
    tsv_writer::write_heatmap_matrix(&path, &matrix)?;

    println!(
        "heatmap: {} samples x {} regions -> {}",
        matrix.rows.len(),
        matrix.regions.len(),
        path.display()
    );
    print_warnings(&matrix.warnings);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> usize {
    println!("kira-instability validate");
    println!("samples: {}", ctx.sample_sets.len());
    println!("regions: {}", ctx.regions.len());
    let mut failed = 0usize;
    for message in &ctx.key_failures {
        failed += 1;
        println!("key error: {}", message);
    }
    for region in &ctx.regions {
        let name = &region.descriptor.region_name;
        match &region.state {
            RegionState::Selected(subset) => println!(
                "{}\t{}\t{} peaks\t{} expansion peaks",
                region.sample,
                name,
                subset.n_peaks,
                subset.peaks.len()
            ),
            RegionState::Failed(err) => {
                failed += 1;
                println!("{}\t{}\terror: {}", region.sample, name, err);
            }
            other => println!("{}\t{}\t{}", region.sample, name, other.status()),
        }
    }
    if failed == 0 {
        println!("validate ok");
    } else {
        println!("validate found {} failure(s)", failed);
    }
    print_warnings(&ctx.warnings);
    failed
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}
