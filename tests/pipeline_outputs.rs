use std::fs;
use std::path::Path;

use kira_instability::ctx::{Ctx, RegionState};
use kira_instability::instability::Weighting;
use kira_instability::io::tsv_writer::file_component;
use kira_instability::pipeline::Pipeline;
use kira_instability::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_instability::pipeline::stage1_sample_key::Stage1SampleKey;
use kira_instability::pipeline::stage2_extract::Stage2Extract;
use kira_instability::pipeline::stage3_select::Stage3Select;
use kira_instability::pipeline::stage4_index::Stage4Index;
use kira_instability::pipeline::stage5_output::Stage5Output;
use serde_json::Value;
use tempfile::TempDir;

const HEADER: &str = "Dye/Sample Peak\tSample File Name\tSize\tHeight\tArea\tData Point\n";

fn write_inputs(dir: &Path) {
    let good = format!(
        "{HEADER}B,1\traw.fsa\t175\t300\t2900\t3011\n\
B,2\traw.fsa\t180\t1000\t9800\t3102\n\
B,3\traw.fsa\t185\t50\t480\t3190\n\
B,4\traw.fsa\t190\t20\t190\t3260\n\
B,5\traw.fsa\t195\t5\t40\t3330\n"
    );
    fs::write(dir.join("htt.txt"), good).unwrap();
    fs::write(
        dir.join("atxn1.txt"),
        "Sample File Name\tSize\tArea\tData Point\nraw.fsa\t200\t10\t3000\n",
    )
    .unwrap();
    fs::write(
        dir.join("dmpk.txt"),
        format!("{HEADER}B,1\traw.fsa\t190\t40\t400\t3000\n"),
    )
    .unwrap();
    fs::write(
        dir.join("quiet.txt"),
        format!("{HEADER}B,1\traw.fsa\t150\t800\t4000\t2800\n"),
    )
    .unwrap();
    fs::write(
        dir.join("patient_1.tsv"),
        "htt.txt\tHTT\t1000\t180\n\
fxn.txt\tFXN\t900\t240\n\
atxn1.txt\tATXN1\t500\t200\n\
dmpk.txt\tDMPK\t0\t180\n\
quiet.txt\tC9\t800\t150\n",
    )
    .unwrap();
}

fn run(input: &Path, out: &Path, json: bool, peaks: bool) -> Ctx {
    let mut ctx = Ctx::new(
        vec![input.join("patient_1.tsv")],
        out.to_path_buf(),
        Weighting::HeightMatch,
        "0.0.0-test",
    );
    ctx.write_json = json;
    ctx.write_peaks = peaks;
    ctx.threads = 2;
    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1SampleKey::new()),
        Box::new(Stage2Extract::new()),
        Box::new(Stage3Select::new()),
        Box::new(Stage4Index::new()),
        Box::new(Stage5Output::new()),
    ]);
    pipeline.run(&mut ctx).unwrap();
    ctx
}

#[test]
fn region_failures_do_not_stop_other_regions() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    let ctx = run(input.path(), out.path(), false, false);

    let status: Vec<(&str, &str)> = ctx
        .regions
        .iter()
        .map(|r| (r.descriptor.region_name.as_str(), r.state.status()))
        .collect();
    assert_eq!(
        status,
        vec![
            ("HTT", "ok"),
            ("FXN", "error"),
            ("ATXN1", "error"),
            ("DMPK", "error"),
            ("C9", "ok"),
        ]
    );
    let kinds: Vec<&str> = ctx.failed().map(|(_, e)| e.kind()).collect();
    assert_eq!(kinds, vec!["unreadable", "missing_column", "degenerate_input"]);

    let htt = ctx.regions[0].index().unwrap();
    assert_eq!(htt.n_peaks, 5);
    assert_eq!(htt.peaks.len(), 2);
    assert!((htt.total_signal_mass - 1070.0).abs() < 1e-9);
    assert!((htt.instability_index - 0.085).abs() < 1e-9);
    assert!(htt.peaks.iter().all(|p| p.peak.sample_name == "patient_1"));

    match &ctx.regions[4].state {
        RegionState::Scored(index) => {
            assert!(index.peaks.is_empty());
            assert_eq!(index.instability_index, 0.0);
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn instability_tsv_has_one_row_per_region() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    run(input.path(), out.path(), false, false);

    let content = fs::read_to_string(out.path().join("instability.tsv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "sample\tregion\tsource\tmodal_height\tmodal_size\tn_peaks\tn_expansion_peaks\ttotal_signal_mass\tinstability_index\tstatus\terror"
    );
    assert_eq!(lines.len(), 6);
    let htt: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(htt[0], "patient_1");
    assert_eq!(htt[1], "HTT");
    assert_eq!(htt[5], "5");
    assert_eq!(htt[6], "2");
    assert_eq!(htt[7], "1070");
    assert_eq!(htt[8], "0.085");
    assert_eq!(htt[9], "ok");
    let fxn: Vec<&str> = lines[2].split('\t').collect();
    assert_eq!(fxn[8], "NA");
    assert_eq!(fxn[9], "error:unreadable");
    assert!(fxn[10].contains("fxn.txt"));

    let heat = fs::read_to_string(out.path().join("heatmap_input.tsv")).unwrap();
    assert_eq!(heat, "patient_1\tHTT\t0.085\npatient_1\tC9\t0.000\n");

    let matrix = fs::read_to_string(out.path().join("heatmap_matrix.tsv")).unwrap();
    assert!(matrix.starts_with("sample\tHTT\tC9\tmean\n"));
    assert!(!out.path().join("instability.json").exists());
}

#[test]
fn json_report_and_annotated_peaks() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    run(input.path(), out.path(), true, true);

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("instability.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "kira-instability");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["weighting"], "height_match");
    assert_eq!(v["version"], "0.0.0-test");
    let regions = v["samples"][0]["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 5);
    assert_eq!(regions[0]["status"], "ok");
    assert_eq!(regions[0]["instability_index"].as_f64().unwrap(), 0.085);
    assert_eq!(regions[0]["peaks"][1]["change_from_main"], 2);
    assert_eq!(regions[0]["peaks"][1]["row"], 3);
    assert_eq!(regions[2]["error"]["kind"], "missing_column");
    assert!(regions[2]["instability_index"].is_null());

    let peaks = fs::read_to_string(out.path().join("peaks").join("patient_1").join("HTT.tsv"))
        .unwrap();
    let lines: Vec<&str> = peaks.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("sample_name\trow\tsize\theight"));
    assert!(lines[1].ends_with("\t0.047\t1\t0.047"));
}

#[test]
fn sample_override_requires_single_key() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    let key = input.path().join("patient_1.tsv");
    let mut ctx = Ctx::new(
        vec![key.clone(), key],
        out.path().to_path_buf(),
        Weighting::HeightMatch,
        "0.0.0-test",
    );
    ctx.sample_override = Some("P1".to_string());
    let pipeline = Pipeline::new(vec![Box::new(Stage1SampleKey::new())]);
    assert!(pipeline.run(&mut ctx).is_err());
}

#[test]
fn bad_key_rows_and_unreadable_keys_stay_local() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    fs::write(
        input.path().join("patient_2.tsv"),
        "htt.txt\tHTT\tNA\t180\nquiet.txt\tC9\t800\t150\n",
    )
    .unwrap();

    let mut ctx = Ctx::new(
        vec![
            input.path().join("patient_1.tsv"),
            input.path().join("patient_2.tsv"),
            input.path().join("absent_key.tsv"),
        ],
        out.path().to_path_buf(),
        Weighting::HeightMatch,
        "0.0.0-test",
    );
    ctx.write_json = true;
    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1SampleKey::new()),
        Box::new(Stage2Extract::new()),
        Box::new(Stage3Select::new()),
        Box::new(Stage4Index::new()),
        Box::new(Stage5Output::new()),
    ]);
    pipeline.run(&mut ctx).unwrap();

    assert_eq!(ctx.sample_sets.len(), 2);
    assert_eq!(ctx.key_failures.len(), 1);
    assert!(ctx.key_failures[0].contains("absent_key.tsv"));
    assert_eq!(ctx.scored().count(), 3);

    let p2: Vec<(&str, &str)> = ctx
        .regions
        .iter()
        .filter(|r| r.sample == "patient_2")
        .map(|r| (r.descriptor.region_name.as_str(), r.state.status()))
        .collect();
    assert_eq!(p2, vec![("HTT", "error"), ("C9", "ok")]);
    let err = ctx.regions[5].error().unwrap();
    assert_eq!(err.kind(), "invalid_descriptor");
    assert!(err.to_string().contains("patient_2.tsv:1"));

    let content = fs::read_to_string(out.path().join("instability.tsv")).unwrap();
    let bad: Vec<&str> = content.lines().nth(6).unwrap().split('\t').collect();
    assert_eq!(bad[0], "patient_2");
    assert_eq!(bad[3], "NA");
    assert_eq!(bad[9], "error:invalid_descriptor");

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("instability.json")).unwrap()).unwrap();
    assert_eq!(v["samples"].as_array().unwrap().len(), 2);
    assert!(v["key_failures"][0].as_str().unwrap().contains("absent_key.tsv"));
}

#[test]
fn run_stops_when_no_key_loads() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut ctx = Ctx::new(
        vec![input.path().join("missing.tsv")],
        out.path().to_path_buf(),
        Weighting::HeightMatch,
        "0.0.0-test",
    );
    let pipeline = Pipeline::new(vec![Box::new(Stage1SampleKey::new())]);
    let err = pipeline.run(&mut ctx).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.tsv"));
}

#[test]
fn colliding_peak_file_names_are_kept_apart() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    fs::write(
        input.path().join("reps.tsv"),
        "htt.txt\tHTT rep1\t1000\t180\nhtt.txt\tHTT_rep1\t1000\t185\n",
    )
    .unwrap();

    let mut ctx = Ctx::new(
        vec![input.path().join("reps.tsv")],
        out.path().to_path_buf(),
        Weighting::HeightMatch,
        "0.0.0-test",
    );
    ctx.sample_override = Some("..".to_string());
    ctx.write_peaks = true;
    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage1SampleKey::new()),
        Box::new(Stage2Extract::new()),
        Box::new(Stage3Select::new()),
        Box::new(Stage4Index::new()),
        Box::new(Stage5Output::new()),
    ]);
    pipeline.run(&mut ctx).unwrap();
    assert_eq!(ctx.scored().count(), 2);

    let dir = out.path().join("peaks").join("_..");
    let first = fs::read_to_string(dir.join("HTT_rep1.tsv")).unwrap();
    let second = fs::read_to_string(dir.join("HTT_rep1_2.tsv")).unwrap();
    assert_eq!(first.lines().count(), 3);
    assert_eq!(second.lines().count(), 2);
    assert!(!out.path().join("HTT_rep1.tsv").exists());
    assert!(
        ctx.warnings
            .iter()
            .any(|w| w.contains("HTT_rep1: peak file name already used"))
    );
}

#[test]
fn file_component_never_yields_dot_segments() {
    assert_eq!(file_component(".."), "_..");
    assert_eq!(file_component("."), "_.");
    assert_eq!(file_component(""), "_");
    assert_eq!(file_component("../x"), ".._x");
    assert_eq!(file_component("HTT rep1"), "HTT_rep1");
}
