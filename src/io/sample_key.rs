use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::RegionError;
use crate::io::open_maybe_gz;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionDescriptor {
    pub source_path: PathBuf,
    pub region_name: String,
    pub modal_height: f64,
    pub modal_size: f64,
}

/// One non-comment row of a sample key. A row that cannot describe a region
/// still gets a descriptor (unparsed modal values are NaN) so it can be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRow {
    pub descriptor: RegionDescriptor,
    pub error: Option<RegionError>,
}

/// One patient's regions, in sample key order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub sample: String,
    pub key_path: PathBuf,
    pub rows: Vec<KeyRow>,
}

pub fn load_sample_set(path: &Path, sample: Option<&str>) -> Result<SampleSet> {
    let mut content = String::new();
    open_maybe_gz(path)
        .with_context(|| format!("failed to open sample key {}", path.display()))?
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read sample key {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let rows = parse_sample_key(&content, path, base_dir);
    let sample = match sample {
        Some(s) => s.to_string(),
        None => label_from_path(path),
    };
    Ok(SampleSet {
        sample,
        key_path: path.to_path_buf(),
        rows,
    })
}

pub fn parse_sample_key(content: &str, key_path: &Path, base_dir: &Path) -> Vec<KeyRow> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        let field = |i: usize| parts.get(i).copied().unwrap_or("");

        let raw_path = PathBuf::from(field(0));
        let source_path = if raw_path.as_os_str().is_empty() || raw_path.is_absolute() {
            raw_path
        } else {
            base_dir.join(raw_path)
        };
        let region_name = match field(1) {
            "" => format!("line{}", line_no),
            name => name.to_string(),
        };

        let mut problems = Vec::new();
        let short = parts.len() < 4;
        if short {
            problems.push(format!("expected 4 columns, got {}", parts.len()));
        } else if field(0).is_empty() || field(1).is_empty() {
            problems.push("empty path or region name".to_string());
        }
        let modal_height = parse_modal(field(2), "modal height", short, &mut problems);
        let modal_size = parse_modal(field(3), "modal size", short, &mut problems);

        let error = (!problems.is_empty()).then(|| RegionError::InvalidDescriptor {
            path: key_path.to_path_buf(),
            line: line_no,
            message: problems.join("; "),
        });
        rows.push(KeyRow {
            descriptor: RegionDescriptor {
                source_path,
                region_name,
                modal_height,
                modal_size,
            },
            error,
        });
    }
    rows
}

fn parse_modal(field: &str, what: &str, short: bool, problems: &mut Vec<String>) -> f64 {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        Ok(_) => {
            problems.push(format!("{} must be finite", what));
            f64::NAN
        }
        Err(_) if field.is_empty() && short => f64::NAN,
        Err(_) => {
            problems.push(format!("invalid {} '{}'", what, field));
            f64::NAN
        }
    }
}

pub fn label_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("sample");
    let name = name.strip_suffix(".gz").unwrap_or(name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
