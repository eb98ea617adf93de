use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use botanic_engine::catalog::{Seed, SeedTemplate};
use botanic_engine::game::HandResult;
use botanic_engine::logger::{format_hand_id, HarvestLogger, HarvestRecord, SoilHarvest};
use botanic_engine::player::Player;
use botanic_engine::rng::ScriptedSource;
use botanic_engine::round::{DropItem, RoundManager};
use botanic_engine::rules::RulesConfig;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn sample() -> HarvestRecord {
    let mut rec = HarvestRecord::new("20250102-000001".to_string(), 1, 0.0, 10);
    rec.seed = Some(7);
    rec.harvests.push(SoilHarvest {
        soil: 0,
        seed: "Basic Seed".into(),
        retriggers: 1,
        value: 10.0,
        synergy: 0.0,
        withered: false,
        coins: 0,
        duplicates: 0,
    });
    rec.score_after = 10.0;
    rec.result = Some(HandResult::Won);
    rec
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("harvestlog");
    let mut logger = HarvestLogger::create(&path).expect("create logger");
    logger.write(&sample()).expect("write");
    logger.write(&sample()).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 2);
}

#[test]
fn sequential_ids_increment() {
    let mut logger = HarvestLogger::new(Vec::new(), "20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
    assert_eq!(format_hand_id("20260101", 42), "20260101-000042");
}

#[test]
fn logs_into_any_writer() {
    let mut logger = HarvestLogger::new(Vec::new(), "20251231");
    let mut rec = sample();
    rec.hand_id = logger.next_id();
    logger.write(&rec).expect("write");
    let text = String::from_utf8(logger.into_inner()).unwrap();
    assert_eq!(text.lines().count(), 1);
    let back: HarvestRecord = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(back.hand_id, "20251231-000001");
    assert_eq!(back.harvests, rec.harvests);
    assert!(back.ts.is_some());
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("harvestlog_ts");
    let mut logger = HarvestLogger::create(&path).expect("create logger");
    logger.write(&sample()).expect("write");
    let line = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(line.contains("\"ts\":"), "ts should be injected");

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec = HarvestRecord {
        ts: Some(preset.clone()),
        ..sample()
    };
    logger.write(&rec).expect("write2");
    let content = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(content.contains(&preset), "preset ts must be kept");
}

#[test]
fn record_round_trips_through_json() {
    let rec = sample();
    let json = serde_json::to_string(&rec).unwrap();
    assert!(json.contains("\"result\":\"won\""));
    let back: HarvestRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rec);
    assert_eq!(back.gained(), 10.0);
}

#[test]
fn older_lines_without_optional_fields_still_parse() {
    let line = concat!(
        r#"{"hand_id":"x","round":2,"harvests":[{"soil":1,"seed":"Basic Seed","#,
        r#""retriggers":1,"value":10.0,"synergy":0.0}],"#,
        r#""score_before":0.0,"score_after":10.0,"score_goal":60}"#
    );
    let rec: HarvestRecord = serde_json::from_str(line).unwrap();
    assert_eq!(rec.seed, None);
    assert_eq!(rec.result, None);
    assert!(!rec.harvests[0].withered);
}

#[test]
fn played_hand_produces_a_record() {
    let basic: Seed = SeedTemplate::new("Basic Seed", 10.0, "basic").into();
    let player = Player::with_starting_kit(&basic, 5, vec![], 0);
    let rules = RulesConfig {
        animate: false,
        ..RulesConfig::default()
    };
    let mut rm = RoundManager::new(rules, player, ScriptedSource::constant(0.9));
    rm.handle_item_drop(DropItem::Seed(0), Some(1)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(3)).unwrap();
    rm.play_hand(Duration::ZERO).unwrap();

    let rec = rm.last_record().expect("record").clone();
    assert_eq!(rec.hand_id, "round1-1");
    assert_eq!(rec.round, 1);
    assert_eq!(rec.score_goal, 10);
    assert_eq!(rec.score_before, 0.0);
    assert_eq!(rec.gained(), 20.0);
    let soils: Vec<_> = rec.harvests.iter().map(|h| h.soil).collect();
    assert_eq!(soils, vec![1, 3]);

    let path = tmp_path("harvestlog_play");
    let mut logger = HarvestLogger::create(&path).expect("create logger");
    logger.write(&rec).expect("write");
    let content = fs::read_to_string(&path).unwrap();
    let parsed: HarvestRecord = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(parsed.harvests.len(), 2);
    assert!(parsed.ts.is_some());
}
