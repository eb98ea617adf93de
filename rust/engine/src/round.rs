use std::mem;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::{Seed, Upgrade, UpgradeEffect};
use crate::effects::{
    apply_upgrade, calculate_synergy_bonus, harvest_seed, predict_harvest_value, retrigger_count,
};
use crate::errors::GameError;
use crate::events::{GameEvent, Screen};
use crate::game::{HandResult, RoundState};
use crate::logger::{HarvestRecord, SoilHarvest};
use crate::player::Backpack;
use crate::rng::RandomSource;
use crate::rules::RulesConfig;
use crate::scheduler::{HarvestScheduler, PlannedHarvest, SchedulerState, SchedulerStep};
use crate::soil::Board;

/// Something the player dragged onto the board, identified by its slot in
/// the seed hand or the upgrade hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropItem {
    Seed(usize),
    Upgrade(usize),
}

/// Accepted drops. Refused drops come back as [`GameError`] with the item
/// still in its hand slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Seed left the hand and is growing on `soil`
    Planted { soil: usize },
    /// Clover soil rejected the seed; it is back in the hand
    CloverReturned { soil: usize },
    /// Clover soil rejected the seed and paid `coins`
    CloverBonus { soil: usize, coins: u32 },
    UpgradeApplied { soil: usize },
    UpgradeRemoved { soil: usize },
}

/// Drives planting, hand resolution and round transitions.
///
/// Owns the board and the scheduler; the backpack and the random source are
/// injected. Collaborators call the action methods, poll [`RoundManager::update`]
/// once per tick, and drain cues with [`RoundManager::drain_events`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use botanic_engine::catalog::{Seed, SeedTemplate};
/// use botanic_engine::player::Player;
/// use botanic_engine::rng::ScriptedSource;
/// use botanic_engine::round::{DropItem, RoundManager};
/// use botanic_engine::rules::RulesConfig;
///
/// let basic: Seed = SeedTemplate::new("Basic Seed", 10.0, "basic").into();
/// let player = Player::with_starting_kit(&basic, 5, vec![], 0);
/// let rules = RulesConfig { animate: false, ..RulesConfig::default() };
/// let mut rm = RoundManager::new(rules, player, ScriptedSource::constant(0.9));
///
/// rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
/// assert_eq!(rm.state().predicted_score, 10.0);
/// assert!(rm.play_hand(Duration::ZERO).unwrap());
/// ```
#[derive(Debug)]
pub struct RoundManager<P: Backpack, R: RandomSource> {
    rules: RulesConfig,
    board: Board,
    player: P,
    rng: R,
    scheduler: HarvestScheduler,
    state: RoundState,
    /// Seeds available to plant this round
    hand: Vec<Seed>,
    /// Backpack upgrades available to apply; consumed from the backpack on use
    upgrade_hand: Vec<Upgrade>,
    events: Vec<GameEvent>,
    requested: Option<Screen>,
    record: Option<HarvestRecord>,
    last_record: Option<HarvestRecord>,
    hands_played: u32,
}

impl<P: Backpack, R: RandomSource> RoundManager<P, R> {
    /// Builds the board and deals the first round.
    pub fn new(rules: RulesConfig, player: P, rng: R) -> Self {
        let mut rm = Self {
            board: Board::new(rules.soil_count),
            scheduler: HarvestScheduler::new(rules.step_delay()),
            state: RoundState::new(rules.starting_goal),
            rules,
            player,
            rng,
            hand: Vec::new(),
            upgrade_hand: Vec::new(),
            events: Vec::new(),
            requested: None,
            record: None,
            last_record: None,
            hands_played: 0,
        };
        rm.deal_round();
        rm
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn player(&self) -> &P {
        &self.player
    }
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
    pub fn state(&self) -> &RoundState {
        &self.state
    }
    pub fn hand(&self) -> &[Seed] {
        &self.hand
    }
    pub fn upgrade_hand(&self) -> &[Upgrade] {
        &self.upgrade_hand
    }
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }
    /// True while a hand is being animated.
    pub fn is_resolving(&self) -> bool {
        self.scheduler.is_animating()
    }
    /// Record of the most recently finished hand.
    pub fn last_record(&self) -> Option<&HarvestRecord> {
        self.last_record.as_ref()
    }
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Recomputes and caches the preview score. Side-effect free otherwise.
    pub fn calculate_predicted_score(&mut self) -> f64 {
        let soils = self.board.soils();
        let predicted: f64 = soils
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_planted())
            .map(|(i, s)| predict_harvest_value(s) + calculate_synergy_bonus(soils, i))
            .sum();
        self.state.predicted_score = predicted;
        predicted
    }

    /// Routes a dropped item onto soil `target` (`None` when it missed every
    /// soil).
    ///
    /// # Errors
    ///
    /// Any error means the drop was refused and the item is still in its hand
    /// slot:
    /// - [`GameError::Resolving`] while a hand is animating or its screen
    ///   request is still pending
    /// - [`GameError::NoTarget`] / [`GameError::SoilOutOfRange`] for a miss
    /// - [`GameError::HandIndexOutOfRange`] for an empty hand slot
    /// - [`GameError::SoilOccupied`] when planting onto a planted soil
    /// - [`GameError::SoilAlreadyUpgraded`] when stacking upgrades
    pub fn handle_item_drop(
        &mut self,
        item: DropItem,
        target: Option<usize>,
    ) -> Result<DropOutcome, GameError> {
        self.ensure_idle()?;
        let Some(index) = target else {
            return Err(GameError::NoTarget);
        };
        if index >= self.board.len() {
            return Err(GameError::SoilOutOfRange {
                index,
                len: self.board.len(),
            });
        }
        let outcome = match item {
            DropItem::Seed(slot) => self.drop_seed(slot, index),
            DropItem::Upgrade(slot) => self.drop_upgrade(slot, index),
        }?;
        self.calculate_predicted_score();
        Ok(outcome)
    }

    fn drop_seed(&mut self, slot: usize, index: usize) -> Result<DropOutcome, GameError> {
        let Some(seed) = self.hand.get(slot).cloned() else {
            return Err(GameError::HandIndexOutOfRange { index: slot });
        };
        let name = seed.name().to_string();
        if self.board.try_plant(index, seed).is_err() {
            debug!(index, "soil already planted");
            return Err(GameError::SoilOccupied { index });
        }

        let clover = self.board.soil(index).is_some_and(|s| s.is_clover);
        if clover {
            let roll = self.rng.next_f64();
            if roll < self.rules.clover_return_below {
                self.board.take_seed(index);
                debug!(index, roll, "clover returned seed");
                self.events.push(GameEvent::CloverReturned { soil: index });
                return Ok(DropOutcome::CloverReturned { soil: index });
            }
            if roll < self.rules.clover_bonus_below {
                self.board.take_seed(index);
                let coins = self.rules.clover_bonus_coins;
                self.player.add_coins(coins);
                debug!(index, roll, coins, "clover returned seed with bonus");
                self.events.push(GameEvent::CloverBonus { soil: index, coins });
                return Ok(DropOutcome::CloverBonus { soil: index, coins });
            }
        }

        self.hand.remove(slot);
        debug!(index, seed = name.as_str(), "seed planted");
        self.events.push(GameEvent::Planted {
            soil: index,
            seed: name,
        });
        Ok(DropOutcome::Planted { soil: index })
    }

    fn drop_upgrade(&mut self, slot: usize, index: usize) -> Result<DropOutcome, GameError> {
        let Some(upgrade) = self.upgrade_hand.get(slot).cloned() else {
            return Err(GameError::HandIndexOutOfRange { index: slot });
        };
        let effect = upgrade.effect();
        let upgraded = self.board.soil(index).is_some_and(|s| s.is_upgraded);
        if upgraded && effect != UpgradeEffect::RemoveUpgrade {
            debug!(index, upgrade = upgrade.name(), "soil already upgraded");
            return Err(GameError::SoilAlreadyUpgraded { index });
        }

        apply_upgrade(upgrade.template(), self.board.soils_mut(), index);
        if !self.player.remove_upgrade(&upgrade) {
            warn!(upgrade = upgrade.name(), "applied upgrade was not in the backpack");
        }
        self.upgrade_hand.remove(slot);

        if effect == UpgradeEffect::RemoveUpgrade {
            self.events.push(GameEvent::UpgradeRemoved { soil: index });
            Ok(DropOutcome::UpgradeRemoved { soil: index })
        } else {
            self.events.push(GameEvent::UpgradeApplied {
                soil: index,
                upgrade: upgrade.name().to_string(),
            });
            Ok(DropOutcome::UpgradeApplied { soil: index })
        }
    }

    /// Resolution order: planted soils in board order with their beat counts.
    pub fn resolution_plan(&self) -> Vec<PlannedHarvest> {
        self.board
            .soils()
            .iter()
            .enumerate()
            .filter_map(|(soil, s)| {
                s.planted_seed().map(|seed| PlannedHarvest {
                    soil,
                    retriggers: retrigger_count(seed),
                })
            })
            .collect()
    }

    /// Starts scoring the board.
    ///
    /// Returns `Ok(false)` for an empty board: nothing is scored and no
    /// transition happens. With `animate` set the hand is handed to the
    /// scheduler and resolves over the following [`RoundManager::update`]
    /// calls; otherwise it resolves before this returns.
    pub fn play_hand(&mut self, now: Duration) -> Result<bool, GameError> {
        self.ensure_idle()?;
        let plan = self.resolution_plan();
        if plan.is_empty() {
            debug!("play_hand on an empty board");
            return Ok(false);
        }

        self.hands_played += 1;
        self.record = Some(HarvestRecord::new(
            format!("round{}-{}", self.state.round_number, self.hands_played),
            self.state.round_number,
            self.state.current_score,
            self.state.score_goal,
        ));
        info!(
            round = self.state.round_number,
            soils = plan.len(),
            "playing hand"
        );

        if self.rules.animate {
            self.scheduler.start(plan, now);
        } else {
            for entry in &plan {
                self.resolve_soil(entry.soil);
            }
            self.finish_hand_play(now);
        }
        Ok(true)
    }

    /// Per-tick poll. Advances the animation by at most one beat and returns
    /// a screen request when one is due.
    pub fn update(&mut self, now: Duration) -> Option<Screen> {
        match self.scheduler.poll(now) {
            SchedulerStep::Beat {
                soil,
                retrigger,
                of,
                resolve,
            } => {
                self.events.push(GameEvent::HarvestBeat {
                    soil,
                    retrigger,
                    of,
                });
                if resolve {
                    self.resolve_soil(soil);
                }
            }
            SchedulerStep::Finished => {
                self.finish_hand_play(now);
            }
            SchedulerStep::Transition(screen) => self.request(screen),
            SchedulerStep::Idle | SchedulerStep::Waiting => {}
        }
        self.requested.take()
    }

    /// Scores one soil. This is the only place the score grows: evil roll,
    /// then the harvest with retriggers folded in, then the synergy bonus.
    pub fn resolve_soil(&mut self, index: usize) -> f64 {
        let Some(soil) = self.board.soil_mut(index) else {
            return 0.0;
        };
        if !soil.is_planted() {
            return 0.0;
        }

        let mut withered = false;
        if soil.is_evil && self.rng.next_f64() < self.rules.evil_wither_chance {
            soil.multiplier = 0.0;
            withered = true;
            debug!(index, "evil soil withered");
            self.events.push(GameEvent::EvilWithered { soil: index });
        }

        let soils = self.board.soils();
        let Some(seed) = soils[index].planted_seed() else {
            return 0.0;
        };
        let name = seed.name().to_string();
        let harvest = harvest_seed(&soils[index], &mut self.player, &mut self.rng);
        let synergy = calculate_synergy_bonus(soils, index);
        let gained = harvest.total + synergy;
        self.state.current_score += gained;

        for _ in 0..harvest.duplicates_added {
            self.events.push(GameEvent::SeedDuplicated {
                seed: name.clone(),
                dropped: false,
            });
        }
        for _ in 0..harvest.duplicates_dropped {
            self.events.push(GameEvent::SeedDuplicated {
                seed: name.clone(),
                dropped: true,
            });
        }
        self.events.push(GameEvent::Harvested {
            soil: index,
            seed: name.clone(),
            value: harvest.total,
            synergy,
        });
        if let Some(record) = self.record.as_mut() {
            record.harvests.push(SoilHarvest {
                soil: index,
                seed: name,
                retriggers: harvest.iterations,
                value: harvest.total,
                synergy,
                withered,
                coins: harvest.coins_granted,
                duplicates: harvest.duplicates_added,
            });
        }
        gained
    }

    /// Wraps up a resolved hand: clears the board, returns the unplanted hand
    /// to the backpack, then decides between round won, a fresh round, and
    /// game over.
    pub fn finish_hand_play(&mut self, now: Duration) -> HandResult {
        self.board.reset_all_planting();
        let leftovers = mem::take(&mut self.hand);
        let dropped = self.player.return_seeds(leftovers);
        if dropped > 0 {
            warn!(dropped, "backpack full, hand seeds dropped");
        }

        let final_score = self.state.current_score;
        let round = self.state.round_number;
        let won = self.state.goal_reached();
        let mut result = if won {
            let coins = self.rules.coins_per_round;
            self.player.add_coins(coins);
            info!(round, score = final_score, goal = self.state.score_goal, "round won");
            self.events.push(GameEvent::RoundWon {
                round,
                score: final_score,
                coins,
            });
            self.scheduler
                .schedule_transition(Screen::RoundWon, now + self.rules.round_won_delay());
            HandResult::Won
        } else {
            info!(round, score = final_score, goal = self.state.score_goal, "round failed");
            self.events.push(GameEvent::RoundFailed {
                round,
                score: final_score,
            });
            self.deal_round();
            HandResult::Continue
        };

        if !won && self.player.backpack_is_empty() && self.hand.is_empty() {
            info!(round, "no seeds left, game lost");
            self.request(Screen::Lose);
            result = HandResult::Lost;
        }

        if let Some(mut record) = self.record.take() {
            record.score_after = final_score;
            record.result = Some(result);
            self.last_record = Some(record);
        }
        result
    }

    /// Raises the goal and deals the next round.
    pub fn next_round(&mut self) -> Result<(), GameError> {
        self.ensure_idle()?;
        self.state.advance(self.rules.goal_step);
        self.deal_round();
        Ok(())
    }

    /// Returns the hand to the backpack and deals a fresh one.
    pub fn start_new_round(&mut self) -> Result<(), GameError> {
        self.ensure_idle()?;
        self.deal_round();
        Ok(())
    }

    fn deal_round(&mut self) {
        let mut returning = mem::take(&mut self.hand);
        for index in 0..self.board.len() {
            if let Some(seed) = self.board.take_seed(index) {
                returning.push(seed);
            }
        }
        let dropped = self.player.return_seeds(returning);
        if dropped > 0 {
            warn!(dropped, "backpack full, seeds dropped at round start");
        }

        self.hand = self.player.draw_seeds(self.rules.hand_size);
        self.upgrade_hand = self.player.backpack_upgrades();
        self.state.current_score = 0.0;
        self.calculate_predicted_score();
        self.events.push(GameEvent::RoundStarted {
            round: self.state.round_number,
            hand_size: self.hand.len(),
        });
    }

    /// Round-level actions wait until the hand has resolved and any pending
    /// screen request has fired.
    fn ensure_idle(&self) -> Result<(), GameError> {
        if self.scheduler.is_idle() {
            Ok(())
        } else {
            Err(GameError::Resolving)
        }
    }

    fn request(&mut self, screen: Screen) {
        debug!(?screen, "transition requested");
        self.events.push(GameEvent::TransitionRequested { screen });
        self.requested = Some(screen);
    }
}
