use std::process::Command;

fn lane_defence() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lane-defence"))
}

#[test]
fn json_output_is_a_world_snapshot() {
    let output = lane_defence()
        .args(["--ticks", "30", "--seed", "7", "--json"])
        .output()
        .expect("failed to run lane-defence");
    assert!(output.status.success());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds JSON");
    assert_eq!(snapshot["lanes"].as_array().map(Vec::len), Some(6));
    assert!(snapshot["life"].as_u64().is_some());
    assert_eq!(snapshot["wave"]["number"].as_u64(), Some(1));
}

#[test]
fn summary_mentions_the_wave_and_economy() {
    let output = lane_defence()
        .args(["--ticks", "20", "--strategy", "astar"])
        .output()
        .expect("failed to run lane-defence");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wave: 1"));
    assert!(stdout.contains("gold: "));
}

#[test]
fn missing_config_file_is_reported() {
    let output = lane_defence()
        .args(["--config", "does-not-exist.toml"])
        .output()
        .expect("failed to run lane-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn config_file_overrides_tuning() {
    let path = std::env::temp_dir().join(format!("lane-defence-{}.toml", std::process::id()));
    std::fs::write(&path, "lanes = 2\ngrid_size = 9\n\n[prices]\nworker = 50\n")
        .expect("temp file is writable");

    let output = lane_defence()
        .args(["--ticks", "5", "--json", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run lane-defence");
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds JSON");
    let lanes = snapshot["lanes"].as_array().expect("lanes array");
    assert_eq!(lanes.len(), 2);
    assert_eq!(lanes[0]["grid"]["columns"].as_u64(), Some(9));
}
