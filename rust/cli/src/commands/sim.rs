//! Simulation command: plays rounds headlessly with a greedy policy.
//!
//! The policy stands in for a player at the board:
//!
//! - every upgrade in the upgrade hand (except soil removers) goes onto the
//!   first soil without one
//! - seeds are planted best-first onto the soils with the highest multiplier
//! - after a won round the shop is rolled once and every affordable product
//!   is bought
//!
//! Hands resolve through the engine's scheduler on a simulated clock, so a
//! run is fully determined by its seed and configuration.
//!
//! # Examples
//!
//! ```no_run
//! use botanic_cli::commands::sim::handle_sim_command;
//! use std::io;
//!
//! let mut out = io::stdout();
//! let mut err = io::stderr();
//! let output = Some("data/sim.jsonl".to_string());
//! handle_sim_command(3, Some(42), output, None, &mut out, &mut err).unwrap();
//! ```

use std::io::Write;
use std::time::Duration;

use botanic_engine::catalog::{Catalog, UpgradeEffect};
use botanic_engine::events::Screen;
use botanic_engine::logger::HarvestLogger;
use botanic_engine::player::{Backpack, Player, MAX_BACKPACK_SEEDS};
use botanic_engine::rng::ChaChaSource;
use botanic_engine::round::{DropItem, DropOutcome, RoundManager};
use botanic_engine::rules::RulesConfig;
use botanic_engine::scheduler::SchedulerState;
use botanic_engine::shop::Shop;
use tracing::{debug, info};

use super::load_catalog;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;

/// Simulated frame length
const TICK: Duration = Duration::from_millis(16);
/// Hands after which a run is abandoned
const MAX_HANDS: u32 = 10_000;
/// Polls after which a single hand is treated as stuck
const MAX_TICKS_PER_HAND: u32 = 100_000;

type Manager = RoundManager<Player, ChaChaSource>;

/// Outcome of a simulated run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub seed: u64,
    pub rounds_won: u32,
    pub hands: u32,
    pub coins: u32,
    pub lost: bool,
    /// Names of shop purchases in order
    pub purchases: Vec<String>,
}

impl SimSummary {
    fn new(seed: u64) -> Self {
        Self {
            seed,
            rounds_won: 0,
            hands: 0,
            coins: 0,
            lost: false,
            purchases: Vec::new(),
        }
    }
}

/// Handle the sim command.
///
/// `seed` falls back to the configured seed, then to a random one. With
/// `output` set, one JSONL harvest record is written per played hand.
pub fn handle_sim_command(
    rounds: u32,
    seed: Option<u64>,
    output: Option<String>,
    catalog: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }

    let cfg = config::load_with_sources()?.config;
    if cfg.starting_seeds > MAX_BACKPACK_SEEDS {
        ui::display_warning(
            err,
            &format!(
                "starting_seeds {} exceeds backpack capacity, starting with {}",
                cfg.starting_seeds, MAX_BACKPACK_SEEDS
            ),
        )?;
    }
    let catalog = load_catalog(catalog.as_deref())?;
    let player = starting_player(&cfg, &catalog)?;

    let mut logger = match output {
        Some(path) => Some(HarvestLogger::create(&path).map_err(|e| {
            CliError::InvalidInput(format!("cannot open output file {}: {}", path, e))
        })?),
        None => None,
    };

    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let summary = simulate(
        rounds,
        base_seed,
        cfg.rules(),
        player,
        catalog,
        logger.as_mut(),
        out,
    )?;

    let result = if summary.lost {
        "lost"
    } else if summary.rounds_won >= rounds {
        "won"
    } else {
        ui::display_warning(err, "run stopped before reaching the requested rounds")?;
        "incomplete"
    };
    writeln!(
        out,
        "Simulated {} hand(s) with seed {}: {}/{} round(s) won, {} coins, result: {}",
        summary.hands, summary.seed, summary.rounds_won, rounds, summary.coins, result
    )?;
    Ok(())
}

/// Builds the starting backpack named by the configuration.
pub fn starting_player(cfg: &Config, catalog: &Catalog) -> Result<Player, CliError> {
    let seed = catalog.mint_seed(&cfg.starting_seed).ok_or_else(|| {
        CliError::InvalidInput(format!("unknown starting seed `{}`", cfg.starting_seed))
    })?;
    let upgrades = cfg
        .starting_upgrades
        .iter()
        .map(|name| {
            catalog.mint_upgrade(name).ok_or_else(|| {
                CliError::InvalidInput(format!("unknown starting upgrade `{}`", name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Player::with_starting_kit(
        &seed,
        cfg.starting_seeds,
        upgrades,
        cfg.starting_coins,
    ))
}

/// Plays until `rounds` rounds are won, the player runs out of seeds, or the
/// hand limit is hit.
pub fn simulate(
    rounds: u32,
    seed: u64,
    rules: RulesConfig,
    player: Player,
    catalog: Catalog,
    mut logger: Option<&mut HarvestLogger>,
    out: &mut dyn Write,
) -> Result<SimSummary, CliError> {
    rules
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let mut rm = RoundManager::new(rules, player, ChaChaSource::new_with_seed(seed));
    let mut shop = Shop::new(catalog);
    let mut now = Duration::ZERO;
    let mut summary = SimSummary::new(seed);
    let mut round_hands = 0u32;

    while summary.rounds_won < rounds && summary.hands < MAX_HANDS {
        plant_greedy(&mut rm);
        if !rm.play_hand(now)? {
            let round = rm.state().round_number;
            if rm.hand().is_empty() {
                summary.lost = true;
                writeln!(out, "Round {} lost: out of seeds", round)?;
            } else {
                writeln!(out, "Round {} stuck: no soil accepted the hand", round)?;
            }
            break;
        }
        summary.hands += 1;
        round_hands += 1;

        let screen = drive(&mut rm, &mut now);
        if let (Some(logger), Some(record)) = (logger.as_deref_mut(), rm.last_record()) {
            let mut record = record.clone();
            record.hand_id = logger.next_id();
            record.seed = Some(seed);
            logger.write(&record)?;
        }

        match screen {
            Some(Screen::RoundWon) => {
                let state = rm.state();
                writeln!(
                    out,
                    "Round {} won: {} / {} in {} hand(s)",
                    state.round_number,
                    ui::format_score(state.current_score),
                    state.score_goal,
                    round_hands
                )?;
                summary.rounds_won += 1;
                round_hands = 0;
                if summary.rounds_won < rounds {
                    visit_shop(&mut shop, &mut rm, &mut summary.purchases);
                    rm.next_round()?;
                }
            }
            Some(Screen::Lose) => {
                summary.lost = true;
                writeln!(
                    out,
                    "Round {} lost: out of seeds",
                    rm.state().round_number
                )?;
                break;
            }
            _ => {}
        }
    }

    summary.coins = rm.player().coins();
    info!(
        rounds_won = summary.rounds_won,
        hands = summary.hands,
        lost = summary.lost,
        "simulation finished"
    );
    Ok(summary)
}

/// Polls the round manager on the simulated clock until it requests a screen
/// or goes idle.
fn drive(rm: &mut Manager, now: &mut Duration) -> Option<Screen> {
    for _ in 0..MAX_TICKS_PER_HAND {
        *now += TICK;
        let screen = rm.update(*now);
        for event in rm.drain_events() {
            debug!(?event, "cue");
        }
        if screen.is_some() {
            return screen;
        }
        if rm.scheduler_state() == SchedulerState::Idle {
            return None;
        }
    }
    None
}

fn plant_greedy(rm: &mut Manager) {
    let mut slot = 0;
    while slot < rm.upgrade_hand().len() {
        let effect = rm.upgrade_hand()[slot].effect();
        let target = rm.board().soils().iter().position(|s| !s.is_upgraded);
        match (effect, target) {
            (UpgradeEffect::RemoveUpgrade, _) | (_, None) => slot += 1,
            (_, Some(index)) => {
                if let Err(e) = rm.handle_item_drop(DropItem::Upgrade(slot), Some(index)) {
                    debug!(%e, "upgrade refused");
                    slot += 1;
                }
            }
        }
    }

    let soils = rm.board().soils();
    let mut order: Vec<usize> = (0..soils.len()).collect();
    order.sort_by(|a, b| soils[*b].multiplier.total_cmp(&soils[*a].multiplier));

    for index in order {
        if rm.hand().is_empty() {
            break;
        }
        if rm.board().soil(index).is_some_and(|s| s.is_planted()) {
            continue;
        }
        let best = rm
            .hand()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.base_value().total_cmp(&b.1.base_value()))
            .map(|(i, _)| i)
            .unwrap_or(0);
        match rm.handle_item_drop(DropItem::Seed(best), Some(index)) {
            Ok(DropOutcome::Planted { .. }) => {}
            Ok(outcome) => debug!(?outcome, "seed bounced"),
            Err(e) => debug!(%e, "seed refused"),
        }
    }
}

fn visit_shop(shop: &mut Shop, rm: &mut Manager, purchases: &mut Vec<String>) {
    shop.roll(rm.rng_mut());
    for slot in 0..shop.products().len() {
        let Some(price) = shop.products()[slot].as_ref().map(|p| p.price) else {
            continue;
        };
        if price > rm.player().coins() {
            continue;
        }
        match shop.buy(slot, rm.player_mut()) {
            Ok(item) => {
                info!(item = item.name(), price, "bought");
                purchases.push(item.name().to_string());
            }
            Err(e) => debug!(%e, "purchase refused"),
        }
    }
}
