use std::io::Read;
use std::path::Path;

use crate::error::RegionError;
use crate::instability::PeakRecord;
use crate::io::columns::{ColumnMap, header_matches};
use crate::io::open_maybe_gz;

pub fn read_peak_table(
    path: &Path,
    sample: &str,
    columns: &ColumnMap,
) -> Result<Vec<PeakRecord>, RegionError> {
    let mut content = String::new();
    open_maybe_gz(path)
        .and_then(|mut r| r.read_to_string(&mut content))
        .map_err(|e| RegionError::unreadable(e, path))?;
    parse_peak_table(&content, path, sample, columns)
}

pub fn parse_peak_table(
    content: &str,
    path: &Path,
    sample: &str,
    columns: &ColumnMap,
) -> Result<Vec<PeakRecord>, RegionError> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(RegionError::MissingColumn {
            column: columns.sample_file_name.clone(),
            path: path.to_path_buf(),
        });
    };
    let header_line = header_line.strip_prefix('\u{feff}').unwrap_or(header_line);
    let headers: Vec<&str> = header_line.split('\t').collect();
    let mut positions = [0usize; 5];
    for (slot, wanted) in positions.iter_mut().zip(columns.required()) {
        *slot = headers
            .iter()
            .position(|h| header_matches(h, wanted))
            .ok_or_else(|| RegionError::MissingColumn {
                column: wanted.to_string(),
                path: path.to_path_buf(),
            })?;
    }
    let [_, size_col, height_col, area_col, data_point_col] = positions;
    let width = positions.iter().copied().max().unwrap_or(0) + 1;

    let mut peaks = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < width {
            return Err(RegionError::Malformed {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("expected at least {} fields, got {}", width, fields.len()),
            });
        }
        let field = |col: usize, name: &str| parse_field(fields[col], name, path, line_no);
        peaks.push(PeakRecord {
            sample_name: sample.to_string(),
            size: field(size_col, &columns.size)?,
            height: field(height_col, &columns.height)?,
            area: field(area_col, &columns.area)?,
            data_point: field(data_point_col, &columns.data_point)?,
            row: peaks.len(),
        });
    }
    Ok(peaks)
}

fn parse_field(raw: &str, name: &str, path: &Path, line_no: usize) -> Result<f64, RegionError> {
    let malformed = |message: String| RegionError::Malformed {
        path: path.to_path_buf(),
        line: line_no,
        message,
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid {} '{}'", name, raw.trim())))?;
    if !value.is_finite() {
        return Err(malformed(format!("{} must be finite", name)));
    }
    Ok(value)
}
