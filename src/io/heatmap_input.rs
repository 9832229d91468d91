use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::open_maybe_gz;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapEntry {
    pub sample: String,
    pub region: String,
    pub value: f64,
}

pub fn load_heatmap_input(path: &Path) -> Result<Vec<HeatmapEntry>> {
    let mut content = String::new();
    open_maybe_gz(path)
        .and_then(|mut r| r.read_to_string(&mut content))
        .with_context(|| format!("failed to read heatmap input {}", path.display()))?;
    parse_heatmap_input(&content, &path.display().to_string())
}

pub fn parse_heatmap_input(content: &str, source: &str) -> Result<Vec<HeatmapEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if parts.len() != 3 {
            bail!("{}:{} malformed TSV (expected 3 columns)", source, line_no);
        }
        if parts[0].is_empty() || parts[1].is_empty() {
            bail!("{}:{} empty field in TSV", source, line_no);
        }
        let value: f64 = parts[2]
            .parse()
            .with_context(|| format!("{}:{} invalid value '{}'", source, line_no, parts[2]))?;
        if !value.is_finite() {
            bail!("{}:{} value must be finite", source, line_no);
        }
        entries.push(HeatmapEntry {
            sample: parts[0].to_string(),
            region: parts[1].to_string(),
            value,
        });
    }
    Ok(entries)
}
