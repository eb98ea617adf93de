//! End-to-end tests for the `botanic` subcommands, driven through `run`.

use std::fs;

use botanic_engine::logger::HarvestRecord;
use serial_test::serial;

const ENV_KEYS: &[&str] = &[
    "BOTANIC_CONFIG",
    "BOTANIC_SEED",
    "BOTANIC_SOILS",
    "BOTANIC_HAND_SIZE",
    "BOTANIC_SCORE_GOAL",
    "BOTANIC_ANIMATE",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn run(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = botanic_cli::run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
#[serial]
fn cfg_prints_defaults_as_json() {
    clear_env();
    let (code, out, err) = run(&["botanic", "cfg"]);
    assert_eq!(code, 0, "stderr: {}", err);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["soils"]["value"], 5);
    assert_eq!(json["hand_size"]["value"], 5);
    assert_eq!(json["score_goal"]["value"], 10);
    assert_eq!(json["starting_seed"]["value"], "Basic Seed");
    assert_eq!(json["seed"]["value"], serde_json::Value::Null);
}

#[test]
#[serial]
fn env_overrides_config_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("botanic.toml");
    fs::write(&path, "seed = 7\nsoils = 4\nscore_goal = 80\n").unwrap();
    unsafe {
        std::env::set_var("BOTANIC_CONFIG", &path);
        std::env::set_var("BOTANIC_SEED", "11");
    }

    let (code, out, _err) = run(&["botanic", "cfg"]);
    clear_env();

    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["seed"]["value"], 11);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["soils"]["value"], 4);
    assert_eq!(json["soils"]["source"], "file");
    assert_eq!(json["score_goal"]["value"], 80);
    assert_eq!(json["hand_size"]["source"], "default");
}

#[test]
#[serial]
fn invalid_env_value_exits_two() {
    clear_env();
    unsafe {
        std::env::set_var("BOTANIC_SOILS", "lots");
    }
    let (code, out, err) = run(&["botanic", "cfg"]);
    clear_env();

    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("Error: "), "stderr: {}", err);
    assert!(err.contains("Invalid soils"));
}

#[test]
#[serial]
fn unreadable_config_file_exits_two() {
    clear_env();
    unsafe {
        std::env::set_var("BOTANIC_CONFIG", "does/not/exist.toml");
    }
    let (code, _out, err) = run(&["botanic", "cfg"]);
    clear_env();

    assert_eq!(code, 2);
    assert!(err.contains("cannot read config file"));
}

#[test]
fn catalog_lists_builtin_archetypes() {
    let (code, out, err) = run(&["botanic", "catalog"]);
    assert_eq!(code, 0);
    assert!(out.contains("Seeds:"));
    assert!(out.contains("Upgrades:"));
    assert!(out.contains("Echo Bean"));
    assert!(err.is_empty());
}

#[test]
fn catalog_from_missing_file_exits_two() {
    let (code, out, err) = run(&["botanic", "catalog", "--catalog", "missing.json"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("Error: Catalog error"));
}

#[test]
fn catalog_from_custom_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
  "seeds": [
    { "name": "Radish", "base_value": 12.0, "seed_type": "root" }
  ],
  "upgrades": []
}"#,
    )
    .unwrap();
    let (code, out, _err) = run(&["botanic", "catalog", "--catalog", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(out.contains("Radish"));
    assert!(!out.contains("Echo Bean"));
}

#[test]
#[serial]
fn sim_writes_one_record_per_hand() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.jsonl");
    let (code, out, err) = run(&[
        "botanic",
        "sim",
        "--rounds",
        "1",
        "--seed",
        "42",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.contains("Round 1 won"), "stdout: {}", out);
    assert!(out.contains("with seed 42: 1/1 round(s) won"));
    assert!(out.trim_end().ends_with("result: won"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains('\r'));
    let records: Vec<HarvestRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid record"))
        .collect();
    assert!(!records.is_empty());
    for (i, r) in records.iter().enumerate() {
        assert_eq!(r.seed, Some(42));
        assert_eq!(r.round, 1);
        assert!(r.hand_id.ends_with(&format!("{:06}", i + 1)), "{}", r.hand_id);
        assert!(r.ts.is_some());
    }
    let last = records.last().unwrap();
    assert!(last.score_after >= last.score_goal as f64);
}

#[test]
#[serial]
fn sim_warns_about_an_oversized_starting_kit() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("botanic.toml");
    fs::write(&path, "starting_seeds = 30\n").unwrap();
    unsafe {
        std::env::set_var("BOTANIC_CONFIG", &path);
    }

    let (code, _out, err) = run(&["botanic", "sim", "--rounds", "1", "--seed", "3"]);
    clear_env();

    assert_eq!(code, 0, "stderr: {}", err);
    assert!(
        err.contains("WARNING: starting_seeds 30 exceeds backpack capacity, starting with 20"),
        "stderr: {}",
        err
    );
}

#[test]
#[serial]
fn sim_is_deterministic_for_a_seed() {
    clear_env();
    let (c1, out1, _) = run(&["botanic", "sim", "--rounds", "3", "--seed", "5"]);
    let (c2, out2, _) = run(&["botanic", "sim", "--rounds", "3", "--seed", "5"]);
    assert_eq!(c1, 0);
    assert_eq!(c2, 0);
    assert_eq!(out1, out2);
}

#[test]
fn sim_rejects_zero_rounds() {
    let (code, out, err) = run(&["botanic", "sim", "--rounds", "0"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Usage: botanic <command>"));
}

#[test]
fn version_goes_to_stdout() {
    let (code, out, err) = run(&["botanic", "--version"]);
    assert_eq!(code, 0);
    assert!(out.contains("botanic"));
    assert!(err.is_empty());
}
