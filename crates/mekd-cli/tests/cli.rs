use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn mekd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mekd"))
}

fn generate(out: &Path, channel: &str, count: usize) {
    let status = mekd()
        .args(["generate", "--channel", channel, "--seed", "7", "--count"])
        .arg(count.to_string())
        .arg("--out")
        .arg(out)
        .status()
        .expect("run generate");
    assert!(status.success());
}

#[test]
fn generate_then_eval_writes_all_artefacts() {
    let dir = tempdir().expect("tempdir");
    let events = dir.path().join("events.json");
    generate(&events, "four-lepton", 5);

    let generated: Value = serde_json::from_slice(&fs::read(&events).expect("events")).expect("json");
    assert_eq!(generated.as_array().map(Vec::len), Some(5));

    let out = dir.path().join("out");
    let status = mekd()
        .args(["eval", "--threads", "2", "--events"])
        .arg(&events)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("run eval");
    assert!(status.success());

    let features: Value =
        serde_json::from_slice(&fs::read(out.join("features.json")).expect("features")).expect("json");
    let outcomes = features.as_array().expect("array");
    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes[0]["status"], "evaluated");
    assert!(outcomes[0]["me"]["scalar_gg_zz"].as_f64().is_some());

    let report: Value =
        serde_json::from_slice(&fs::read(out.join("report.json")).expect("report")).expect("json");
    assert_eq!(report["summary"]["total"], 5);
    assert_eq!(report["summary"]["finite"], 5);
    assert_eq!(report["config_hash"].as_str().map(str::len), Some(64));

    let csv = fs::read_to_string(out.join("features.csv")).expect("csv");
    let mut lines = csv.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("id,channel,status,discriminant,"));
    assert!(header.contains("me_spin0_qq"));
    assert_eq!(lines.count(), 5);
}

#[test]
fn eval_is_deterministic_across_thread_counts() {
    let dir = tempdir().expect("tempdir");
    let events = dir.path().join("events.json");
    generate(&events, "two-lepton", 8);

    let mut outputs = Vec::new();
    for threads in ["1", "3"] {
        let out = dir.path().join(format!("out-{threads}"));
        let status = mekd()
            .args(["eval", "--threads", threads, "--events"])
            .arg(&events)
            .arg("--out")
            .arg(&out)
            .status()
            .expect("run eval");
        assert!(status.success());
        outputs.push(fs::read(out.join("features.json")).expect("features"));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn config_prints_yaml_and_checks_files() {
    let output = mekd().arg("config").output().expect("run config");
    assert!(output.status.success());
    let yaml = String::from_utf8(output.stdout).expect("utf8");
    assert!(yaml.contains("qqbar_spin0_two_lepton"));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mekd.yaml");
    fs::write(&path, &yaml).expect("write");
    let checked = mekd()
        .args(["config", "--check"])
        .arg(&path)
        .output()
        .expect("run check");
    assert!(checked.status.success());
    assert_eq!(String::from_utf8_lossy(&checked.stdout).trim().len(), 64);

    fs::write(&path, "hypotheses: []\n").expect("write");
    let rejected = mekd()
        .args(["config", "--check"])
        .arg(&path)
        .status()
        .expect("run check");
    assert!(!rejected.success());
}
