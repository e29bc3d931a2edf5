use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

use snake_arena_core::{GridSize, Snapshot};

fn snake_arena(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snake-arena"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch snake-arena")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("snake-arena-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn snapshot_line(sequence: u64) -> String {
    let mut snapshot = Snapshot::empty(GridSize::new(6, 6));
    snapshot.sequence = sequence;
    serde_json::to_string(&snapshot).expect("serialize snapshot")
}

#[test]
fn demo_runs_headless_without_writing_commands() {
    let output = snake_arena(&["--demo", "--headless", "10", "--offline", "--seed", "3"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty(), "no input means no commands");
}

#[test]
fn replay_runs_until_the_file_is_exhausted() {
    let dir = scratch_dir("replay");
    let replay = dir.join("match.jsonl");
    let config = dir.join("client.toml");
    fs::write(
        &replay,
        format!("{}\nnot a snapshot\n{}\n", snapshot_line(1), snapshot_line(2)),
    )
    .expect("write replay");
    fs::write(&config, "replay_interval_ms = 1\nplayer_id = \"tester\"\n").expect("write config");

    let output = snake_arena(&[
        "--config",
        config.to_str().expect("utf-8 path"),
        "--replay",
        replay.to_str().expect("utf-8 path"),
        "--headless",
        "1000",
        "--log-level",
        "info",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let logs = String::from_utf8_lossy(&output.stderr);
    assert!(logs.contains("malformed snapshot"));
    assert!(logs.contains("snapshot feed closed"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unreadable_config_is_reported() {
    let output = snake_arena(&["--config", "/nonexistent/client.toml", "--headless", "1"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read client config"));
}

#[test]
fn missing_replay_is_reported() {
    let output = snake_arena(&["--replay", "/nonexistent/match.jsonl", "--headless", "1"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to open replay"));
}
