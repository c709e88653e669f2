use bench_aggregator::commands::{execute_aggregate, validate_args, AggregateArgs};
use bench_aggregator::output::{read_report, read_summary};
use std::path::PathBuf;

const WIDE: &str = "input_num,block_num,verify_2_8_wall_avg,verify_2_4_wall_avg,vote_exec_wall_avg,vote_getstate_wall_avg,vote_commit_wall_avg\n\
                    2,8,1.5,0.5,0.25,9.0,0.75\n";

fn write_input(dir: &std::path::Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, WIDE).unwrap();
    path
}

#[test]
fn test_validate_args_valid() {
    let args = AggregateArgs {
        inputs: vec![PathBuf::from("results.csv")],
        families: vec!["verify_kv".to_string()],
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_missing_family() {
    let args = AggregateArgs {
        inputs: vec![PathBuf::from("results.csv")],
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_execute_single_output_with_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_input(temp_dir.path(), "run.csv");
    let output = temp_dir.path().join("verify.csv");
    let report = temp_dir.path().join("verify.json");

    let args = AggregateArgs {
        inputs: vec![input],
        families: vec!["verify_kv".to_string()],
        output: Some(output.clone()),
        report: Some(report.clone()),
        ..Default::default()
    };
    validate_args(&args).unwrap();
    execute_aggregate(args).unwrap();

    let summary = read_summary(&output, 2).unwrap();
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].values, vec![1.5]);

    let loaded = read_report(&report).unwrap();
    assert_eq!(loaded.matched_columns, 1);
    assert_eq!(loaded.summary, summary);
}

#[test]
fn test_execute_batch_out_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let first = write_input(temp_dir.path(), "first.csv");
    let second = write_input(temp_dir.path(), "second.csv");
    let out_dir = temp_dir.path().join("out");

    let args = AggregateArgs {
        inputs: vec![first, second],
        families: vec!["verify_kv".to_string(), "phase_total".to_string()],
        txn: Some("vote".to_string()),
        out_dir: Some(out_dir.clone()),
        ..Default::default()
    };
    validate_args(&args).unwrap();
    execute_aggregate(args).unwrap();

    for stem in ["first", "second"] {
        assert!(out_dir.join(format!("{}_verify_kv.csv", stem)).exists());
        let totals = read_summary(out_dir.join(format!("{}_phase_total.csv", stem)), 2).unwrap();
        assert_eq!(totals.rows.len(), 1);
        assert!((totals.rows[0].values[0] - 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_execute_unknown_family_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_input(temp_dir.path(), "run.csv");

    let args = AggregateArgs {
        inputs: vec![input],
        families: vec!["does_not_exist".to_string()],
        output: Some(temp_dir.path().join("x.csv")),
        ..Default::default()
    };

    assert!(execute_aggregate(args).is_err());
}

#[test]
fn test_execute_with_json_family_table() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_input(temp_dir.path(), "run.csv");
    let config = temp_dir.path().join("families.json");
    std::fs::write(
        &config,
        r#"{"families": [{"name": "all_verify", "pattern": "^verify_(\\d+)_(\\d+)_wall_avg$", "reduction": {"kind": "pick"}}]}"#,
    )
    .unwrap();
    let output = temp_dir.path().join("all.csv");

    let args = AggregateArgs {
        inputs: vec![input],
        families: vec!["all_verify".to_string()],
        config: Some(config),
        output: Some(output.clone()),
        ..Default::default()
    };
    execute_aggregate(args).unwrap();

    let summary = read_summary(&output, 2).unwrap();
    assert_eq!(summary.key_columns, vec!["key1", "key2"]);
    assert_eq!(summary.rows.len(), 2);
}
