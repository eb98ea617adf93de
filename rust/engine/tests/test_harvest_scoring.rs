use std::time::Duration;

use botanic_engine::catalog::{
    HarvestEffect, Seed, SeedTemplate, SynergyEffect, Upgrade, UpgradeEffect, UpgradeTemplate,
};
use botanic_engine::events::{GameEvent, Screen};
use botanic_engine::player::{Backpack, Player};
use botanic_engine::rng::ScriptedSource;
use botanic_engine::round::{DropItem, RoundManager};
use botanic_engine::rules::RulesConfig;
use botanic_engine::scheduler::SchedulerState;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn echo_bean() -> Seed {
    SeedTemplate::new("Echo Bean", 10.0, "bean")
        .with_harvest_effect(HarvestEffect::Retrigger { value: 3 })
        .into()
}

fn basic() -> Seed {
    SeedTemplate::new("Basic Seed", 10.0, "basic").into()
}

fn sunflower() -> Seed {
    SeedTemplate::new("Sunflower", 15.0, "flower")
        .with_synergy(SynergyEffect::AdjacentSameTypeValueBoost { value: 5.0 })
        .into()
}

fn bee_balm() -> Seed {
    SeedTemplate::new("Bee Balm", 9.0, "herb")
        .with_synergy(SynergyEffect::AdjacentTypeValueBoost {
            target_seed_type: "flower".into(),
            bonus_per_match: 4.0,
        })
        .into()
}

fn player_with(seeds: Vec<Seed>, upgrades: Vec<Upgrade>) -> Player {
    let mut player = Player::default();
    for seed in seeds {
        player.add_seed(seed).unwrap();
    }
    for upgrade in upgrades {
        player.add_upgrade(upgrade).unwrap();
    }
    player
}

fn still(rules: RulesConfig) -> RulesConfig {
    RulesConfig {
        animate: false,
        ..rules
    }
}

fn drive(rm: &mut RoundManager<Player, ScriptedSource>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut now = Duration::ZERO;
    while now < ms(20_000) {
        now += ms(50);
        rm.update(now);
        events.extend(rm.drain_events());
        if rm.scheduler_state() == SchedulerState::Idle {
            break;
        }
    }
    events
}

#[test]
fn retriggered_seed_on_boosted_soil_scores_sixty() {
    let can: Upgrade =
        UpgradeTemplate::new("Watering Can", UpgradeEffect::MultiplierBoost, 2.0).into();
    let player = player_with(vec![echo_bean()], vec![can]);
    let mut rm = RoundManager::new(RulesConfig::default(), player, ScriptedSource::constant(0.9));
    rm.handle_item_drop(DropItem::Upgrade(0), Some(0)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    // preview shows a single iteration
    assert_eq!(rm.state().predicted_score, 20.0);

    rm.drain_events();
    rm.play_hand(Duration::ZERO).unwrap();
    let events = drive(&mut rm);

    let beats: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::HarvestBeat { soil, retrigger, of } => Some((*soil, *retrigger, *of)),
            _ => None,
        })
        .collect();
    assert_eq!(beats, vec![(0, 0, 3), (0, 1, 3), (0, 2, 3)]);

    let harvested = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Harvested { .. }))
        .count();
    assert_eq!(harvested, 1);

    let record = rm.last_record().unwrap();
    assert_eq!(record.score_after, 60.0);
    assert_eq!(record.harvests[0].retriggers, 3);
    assert_eq!(record.harvests[0].value, 60.0);
}

#[test]
fn beats_respect_the_step_delay() {
    let player = player_with(vec![basic(), basic()], vec![]);
    let mut rm = RoundManager::new(RulesConfig::default(), player, ScriptedSource::constant(0.9));
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(1)).unwrap();
    rm.play_hand(Duration::ZERO).unwrap();
    rm.drain_events();

    rm.update(ms(300));
    assert!(rm.drain_events().is_empty());
    rm.update(ms(301));
    assert_eq!(
        rm.drain_events()[0],
        GameEvent::HarvestBeat {
            soil: 0,
            retrigger: 0,
            of: 1
        }
    );
    assert_eq!(rm.state().current_score, 10.0);

    rm.update(ms(500));
    assert!(rm.drain_events().is_empty());
    rm.update(ms(700));
    assert_eq!(rm.state().current_score, 20.0);
    assert!(rm.is_resolving());

    // plan exhausted: finishes on the next poll without waiting
    rm.update(ms(701));
    assert!(!rm.is_resolving());
}

#[test]
fn evil_soil_can_wither() {
    let compost = || -> Upgrade {
        UpgradeTemplate::new("Cursed Compost", UpgradeEffect::EvilSoil, 3.0).into()
    };

    let player = player_with(vec![basic()], vec![compost()]);
    let mut rm = RoundManager::new(
        still(RulesConfig::default()),
        player,
        ScriptedSource::constant(0.1),
    );
    rm.handle_item_drop(DropItem::Upgrade(0), Some(0)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    assert_eq!(rm.state().predicted_score, 30.0);
    rm.play_hand(Duration::ZERO).unwrap();

    let record = rm.last_record().unwrap();
    assert_eq!(record.score_after, 0.0);
    assert!(record.harvests[0].withered);
    assert_eq!(rm.board().soil(0).unwrap().multiplier, 0.0);
    assert!(rm.events().contains(&GameEvent::EvilWithered { soil: 0 }));

    let player = player_with(vec![basic()], vec![compost()]);
    let mut rm = RoundManager::new(
        still(RulesConfig::default()),
        player,
        ScriptedSource::constant(0.5),
    );
    rm.handle_item_drop(DropItem::Upgrade(0), Some(0)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    rm.play_hand(Duration::ZERO).unwrap();
    assert_eq!(rm.last_record().unwrap().score_after, 30.0);
    assert_eq!(rm.board().soil(0).unwrap().multiplier, 3.0);
}

#[test]
fn prediction_never_rolls_or_mutates() {
    let melon: Seed = SeedTemplate::new("Mirror Melon", 12.0, "melon")
        .with_harvest_effect(HarvestEffect::SelfDuplicateChance { value: 0.25 })
        .into();
    let player = player_with(vec![melon.clone(), melon], vec![]);
    let mut rm = RoundManager::new(RulesConfig::default(), player, ScriptedSource::constant(0.1));
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    let before = rm.board().clone();
    let seeds = rm.player().seed_count();

    for _ in 0..10 {
        assert_eq!(rm.calculate_predicted_score(), 12.0);
    }
    assert_eq!(rm.rng_mut().draws(), 0);
    assert_eq!(rm.board(), &before);
    assert_eq!(rm.player().seed_count(), seeds);
}

#[test]
fn duplicate_roll_adds_a_copy_to_the_backpack() {
    let melon: Seed = SeedTemplate::new("Mirror Melon", 12.0, "melon")
        .with_harvest_effect(HarvestEffect::SelfDuplicateChance { value: 0.25 })
        .into();
    let player = player_with(vec![melon], vec![]);
    let mut rm = RoundManager::new(
        still(RulesConfig::default()),
        player,
        ScriptedSource::constant(0.1),
    );
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    rm.play_hand(Duration::ZERO).unwrap();

    assert_eq!(rm.player().seed_count(), 1);
    assert_eq!(rm.player().seeds()[0].name(), "Mirror Melon");
    assert!(rm.events().contains(&GameEvent::SeedDuplicated {
        seed: "Mirror Melon".into(),
        dropped: false
    }));
    assert_eq!(rm.last_record().unwrap().harvests[0].duplicates, 1);
}

#[test]
fn coin_seed_pays_on_harvest() {
    let pod: Seed = SeedTemplate::new("Gold Pod", 6.0, "pod")
        .with_harvest_effect(HarvestEffect::AddCoins { value: 2 })
        .into();
    let player = player_with(vec![pod, basic()], vec![]);
    let rules = still(RulesConfig {
        starting_goal: 100,
        ..RulesConfig::default()
    });
    let mut rm = RoundManager::new(rules, player, ScriptedSource::constant(0.9));
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    rm.play_hand(Duration::ZERO).unwrap();
    assert_eq!(rm.player().coins(), 2);
    assert_eq!(rm.last_record().unwrap().harvests[0].coins, 2);
}

#[test]
fn same_type_synergy_looks_right() {
    let player = player_with(vec![sunflower(), sunflower()], vec![]);
    let mut rm = RoundManager::new(
        still(RulesConfig::default()),
        player,
        ScriptedSource::constant(0.9),
    );
    rm.handle_item_drop(DropItem::Seed(0), Some(2)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(3)).unwrap();
    assert_eq!(rm.state().predicted_score, 35.0);

    rm.play_hand(Duration::ZERO).unwrap();
    let record = rm.last_record().unwrap();
    assert_eq!(record.score_after, 35.0);
    assert_eq!(record.harvests[0].synergy, 5.0);
    assert_eq!(record.harvests[1].synergy, 0.0);
}

#[test]
fn typed_synergy_counts_both_sides() {
    let player = player_with(vec![sunflower(), bee_balm(), sunflower()], vec![]);
    let mut rm = RoundManager::new(
        still(RulesConfig::default()),
        player,
        ScriptedSource::constant(0.9),
    );
    for soil in 0..3 {
        rm.handle_item_drop(DropItem::Seed(0), Some(soil)).unwrap();
    }
    // 15 + 9 + 4 * 2 + 15
    assert_eq!(rm.state().predicted_score, 47.0);
}

#[test]
fn harvest_order_follows_the_board() {
    let player = player_with(vec![basic(), basic(), basic()], vec![]);
    let mut rm = RoundManager::new(RulesConfig::default(), player, ScriptedSource::constant(0.9));
    rm.handle_item_drop(DropItem::Seed(0), Some(4)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
    rm.handle_item_drop(DropItem::Seed(0), Some(2)).unwrap();
    let plan: Vec<_> = rm.resolution_plan().iter().map(|p| p.soil).collect();
    assert_eq!(plan, vec![0, 2, 4]);

    rm.play_hand(Duration::ZERO).unwrap();
    let events = drive(&mut rm);
    let order: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Harvested { soil, .. } => Some(*soil),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec![0, 2, 4]);
    assert!(events.contains(&GameEvent::TransitionRequested {
        screen: Screen::RoundWon
    }));
}
