//! Sample x region matrix behind the ranked heatmap.
//!
//! Regions keep first-seen order; samples are ranked by their mean index,
//! highest first, with the sample name as tie-break.

use std::collections::HashMap;

use crate::io::heatmap_input::HeatmapEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub sample: String,
    pub values: Vec<Option<f64>>,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMatrix {
    pub regions: Vec<String>,
    pub rows: Vec<HeatmapRow>,
    pub warnings: Vec<String>,
}

pub fn build_matrix(entries: &[HeatmapEntry]) -> HeatmapMatrix {
    let mut region_index: HashMap<&str, usize> = HashMap::new();
    let mut regions: Vec<String> = Vec::new();
    for e in entries {
        if !region_index.contains_key(e.region.as_str()) {
            region_index.insert(&e.region, regions.len());
            regions.push(e.region.clone());
        }
    }

    let mut sample_index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<HeatmapRow> = Vec::new();
    let mut warnings = Vec::new();
    for e in entries {
        let row_id = *sample_index.entry(e.sample.as_str()).or_insert_with(|| {
            rows.push(HeatmapRow {
                sample: e.sample.clone(),
                values: vec![None; regions.len()],
                mean: 0.0,
            });
            rows.len() - 1
        });
        let col = region_index[e.region.as_str()];
        let slot = &mut rows[row_id].values[col];
        if slot.is_some() {
            warnings.push(format!(
                "duplicate heatmap entry for sample '{}' region '{}' (kept last)",
                e.sample, e.region
            ));
        }
        *slot = Some(e.value);
    }

    for row in rows.iter_mut() {
        row.mean = mean_present(&row.values);
    }
    rows.sort_by(|a, b| {
        b.mean
            .total_cmp(&a.mean)
            .then_with(|| a.sample.cmp(&b.sample))
    });

    HeatmapMatrix {
        regions,
        rows,
        warnings,
    }
}

fn mean_present(values: &[Option<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.iter().flatten() {
        sum += *v;
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}
