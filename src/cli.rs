use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::instability::Weighting;

#[derive(Debug, Parser)]
#[command(
    name = "kira-instability",
    version,
    about = "Somatic instability index from fragment-size peak tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
    Heatmap(HeatmapArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, num_args = 1.., required = true, help = "Sample key TSV (repeatable)")]
    pub key: Vec<PathBuf>,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Sample label (single key only; defaults to the key file stem)")]
    pub sample: Option<String>,

    #[arg(long, help = "JSON file overriding peak table column names")]
    pub columns: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = WeightingArg::HeightMatch)]
    pub weighting: WeightingArg,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false, help = "Write annotated expansion peaks per region")]
    pub peaks: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, num_args = 1.., required = true, help = "Sample key TSV (repeatable)")]
    pub key: Vec<PathBuf>,

    #[arg(long, help = "JSON file overriding peak table column names")]
    pub columns: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct HeatmapArgs {
    #[arg(long, help = "Heatmap input TSV (sample, region, value)")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightingArg {
    HeightMatch,
    Row,
}

impl From<WeightingArg> for Weighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::HeightMatch => Weighting::HeightMatch,
            WeightingArg::Row => Weighting::Row,
        }
    }
}
