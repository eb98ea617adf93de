use tracing::{debug, warn};

use crate::catalog::{Seed, Upgrade};
use crate::errors::GameError;

/// Default seed capacity of the backpack
pub const MAX_BACKPACK_SEEDS: usize = 20;
/// Default number of upgrades the backpack can hold
pub const MAX_BACKPACK_UPGRADES: usize = 5;

/// Inventory and purse the rules engine draws from and pays into.
///
/// The engine never bypasses capacity: anything the backpack refuses is
/// reported back, never forced in.
pub trait Backpack {
    /// Takes up to `n` seeds from the front of the backpack.
    fn draw_seeds(&mut self, n: usize) -> Vec<Seed>;
    /// Puts seeds back; returns how many were dropped for lack of room.
    fn return_seeds(&mut self, seeds: Vec<Seed>) -> usize;
    fn add_seed(&mut self, seed: Seed) -> Result<(), GameError>;
    fn add_upgrade(&mut self, upgrade: Upgrade) -> Result<(), GameError>;
    /// Removes one upgrade of the same archetype; `false` if none is held.
    fn remove_upgrade(&mut self, upgrade: &Upgrade) -> bool;
    fn add_coins(&mut self, amount: u32);
    /// Spends coins. Refused without mutation when the purse is short.
    fn remove_coins(&mut self, amount: u32) -> Result<(), GameError>;
    fn coins(&self) -> u32;
    fn backpack_is_empty(&self) -> bool;
    fn backpack_upgrades(&self) -> Vec<Upgrade>;
    fn seed_count(&self) -> usize;
}

/// The default backpack: bounded seed and upgrade lists plus a coin purse.
#[derive(Debug, Clone)]
pub struct Player {
    seeds: Vec<Seed>,
    upgrades: Vec<Upgrade>,
    coins: u32,
    max_seeds: usize,
    max_upgrades: usize,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(MAX_BACKPACK_SEEDS, MAX_BACKPACK_UPGRADES)
    }
}

impl Player {
    pub fn new(max_seeds: usize, max_upgrades: usize) -> Self {
        Self {
            seeds: Vec::new(),
            upgrades: Vec::new(),
            coins: 0,
            max_seeds,
            max_upgrades,
        }
    }

    /// Starting inventory: `count` copies of `seed`, `upgrades`, `coins`.
    pub fn with_starting_kit(
        seed: &Seed,
        count: usize,
        upgrades: Vec<Upgrade>,
        coins: u32,
    ) -> Self {
        if count > MAX_BACKPACK_SEEDS {
            warn!(
                requested = count,
                capacity = MAX_BACKPACK_SEEDS,
                "starting seeds clamped to backpack capacity"
            );
        }
        if upgrades.len() > MAX_BACKPACK_UPGRADES {
            warn!(
                requested = upgrades.len(),
                capacity = MAX_BACKPACK_UPGRADES,
                "starting upgrades clamped to backpack capacity"
            );
        }
        Self {
            seeds: (0..count.min(MAX_BACKPACK_SEEDS))
                .map(|_| seed.duplicate())
                .collect(),
            upgrades: upgrades.into_iter().take(MAX_BACKPACK_UPGRADES).collect(),
            coins,
            max_seeds: MAX_BACKPACK_SEEDS,
            max_upgrades: MAX_BACKPACK_UPGRADES,
        }
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    pub fn max_seeds(&self) -> usize {
        self.max_seeds
    }
}

impl Backpack for Player {
    fn draw_seeds(&mut self, n: usize) -> Vec<Seed> {
        let take = n.min(self.seeds.len());
        self.seeds.drain(..take).collect()
    }

    fn return_seeds(&mut self, seeds: Vec<Seed>) -> usize {
        let mut dropped = 0;
        for seed in seeds {
            if self.add_seed(seed).is_err() {
                dropped += 1;
            }
        }
        dropped
    }

    fn add_seed(&mut self, seed: Seed) -> Result<(), GameError> {
        if self.seeds.len() >= self.max_seeds {
            warn!(seed = seed.name(), "backpack full, seed dropped");
            return Err(GameError::BackpackFull {
                capacity: self.max_seeds,
            });
        }
        debug!(seed = seed.name(), "seed added to backpack");
        self.seeds.push(seed);
        Ok(())
    }

    fn add_upgrade(&mut self, upgrade: Upgrade) -> Result<(), GameError> {
        if self.upgrades.len() >= self.max_upgrades {
            warn!(upgrade = upgrade.name(), "upgrade capacity reached");
            return Err(GameError::UpgradeCapacity {
                capacity: self.max_upgrades,
            });
        }
        self.upgrades.push(upgrade);
        Ok(())
    }

    fn remove_upgrade(&mut self, upgrade: &Upgrade) -> bool {
        match self.upgrades.iter().position(|u| u == upgrade) {
            Some(i) => {
                self.upgrades.remove(i);
                true
            }
            None => false,
        }
    }

    fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn remove_coins(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.coins {
            return Err(GameError::InsufficientCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    fn coins(&self) -> u32 {
        self.coins
    }

    fn backpack_is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    fn backpack_upgrades(&self) -> Vec<Upgrade> {
        self.upgrades.clone()
    }

    fn seed_count(&self) -> usize {
        self.seeds.len()
    }
}
