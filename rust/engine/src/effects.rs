//! Effect resolution: harvest value, synergy bonus, and upgrade application.
//!
//! Everything here is a plain function over the soils it is given. Randomness
//! and the backpack are passed in by the caller, so the same inputs always
//! produce the same result.

use tracing::debug;

use crate::catalog::{HarvestEffect, Seed, SynergyEffect, UpgradeEffect, UpgradeTemplate};
use crate::player::Backpack;
use crate::rng::RandomSource;
use crate::soil::Soil;

/// What one harvest produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestYield {
    /// Score gained, summed over every iteration
    pub total: f64,
    /// Number of iterations run (the retrigger count)
    pub iterations: u32,
    pub coins_granted: u32,
    pub duplicates_added: u32,
    /// Duplicates the backpack refused for lack of room
    pub duplicates_dropped: u32,
}

/// Number of times a seed's harvest applies.
pub fn retrigger_count(seed: &Seed) -> u32 {
    match seed.on_harvest_effect() {
        Some(HarvestEffect::Retrigger { value }) => (*value).max(1),
        _ => 1,
    }
}

/// Value of a single harvest iteration: `base * flat_bonus * multiplier`.
fn single_value(soil: &Soil, seed: &Seed) -> f64 {
    seed.base_value() * soil.flat_bonus * soil.multiplier
}

/// Read-only preview of one iteration's harvest value; 0 when unplanted.
///
/// Never rolls, never grants, never touches the soil.
pub fn predict_harvest_value(soil: &Soil) -> f64 {
    soil.planted_seed()
        .map(|seed| single_value(soil, seed))
        .unwrap_or(0.0)
}

/// Harvests the seed on `soil`, applying its on-harvest effect once per
/// retrigger iteration.
///
/// Coins and duplicates go to `backpack`. The soil itself is left planted;
/// clearing it is the caller's job.
pub fn harvest_seed<B, R>(soil: &Soil, backpack: &mut B, rng: &mut R) -> HarvestYield
where
    B: Backpack + ?Sized,
    R: RandomSource + ?Sized,
{
    let Some(seed) = soil.planted_seed() else {
        return HarvestYield::default();
    };

    let value = single_value(soil, seed);
    let effect = seed.on_harvest_effect();
    let iterations = retrigger_count(seed);
    let mut out = HarvestYield {
        iterations,
        ..HarvestYield::default()
    };

    for _ in 0..iterations {
        match effect {
            Some(HarvestEffect::AddCoins { value: coins }) => {
                backpack.add_coins(*coins);
                out.coins_granted += coins;
            }
            Some(HarvestEffect::SelfDuplicateChance { value: chance }) => {
                if rng.next_f64() < *chance {
                    match backpack.add_seed(seed.duplicate()) {
                        Ok(()) => out.duplicates_added += 1,
                        Err(_) => out.duplicates_dropped += 1,
                    }
                }
            }
            Some(HarvestEffect::Retrigger { .. }) | None => {}
        }
        out.total += value;
    }

    debug!(
        seed = seed.name(),
        total = out.total,
        iterations = out.iterations,
        "seed harvested"
    );
    out
}

/// Bonus the seed at `index` earns from its neighbours.
///
/// `adjacent_same_type_value_boost` looks at the right neighbour only;
/// `adjacent_type_value_boost` looks both ways and pays per match.
pub fn calculate_synergy_bonus(soils: &[Soil], index: usize) -> f64 {
    let Some(seed) = soils.get(index).and_then(Soil::planted_seed) else {
        return 0.0;
    };
    let neighbour_type = |i: usize| {
        soils
            .get(i)
            .and_then(Soil::planted_seed)
            .map(|s| s.seed_type())
    };

    match seed.synergy_effect() {
        Some(SynergyEffect::AdjacentSameTypeValueBoost { value }) => {
            if neighbour_type(index + 1) == Some(seed.seed_type()) {
                *value
            } else {
                0.0
            }
        }
        Some(SynergyEffect::AdjacentTypeValueBoost {
            target_seed_type,
            bonus_per_match,
        }) => {
            let left = index.checked_sub(1).and_then(neighbour_type);
            let right = neighbour_type(index + 1);
            [left, right]
                .into_iter()
                .filter(|t| *t == Some(target_seed_type.as_str()))
                .count() as f64
                * bonus_per_match
        }
        None => 0.0,
    }
}

/// Applies `upgrade` to the soil at `index`. Some effects reach past the
/// target: holy soil blesses both neighbours, even/odd soil touches every
/// soil of that parity.
///
/// Returns `false` if `index` is off the board. Refusing a second upgrade on
/// an upgraded soil is the round manager's decision, not this function's.
pub fn apply_upgrade(upgrade: &UpgradeTemplate, soils: &mut [Soil], index: usize) -> bool {
    let len = soils.len();
    if index >= len {
        return false;
    }
    let v = upgrade.effect_value;
    let effect = upgrade.upgrade_effect;

    match effect {
        UpgradeEffect::MultiplierBoost => {
            soils[index].multiplier *= v;
        }
        UpgradeEffect::EvilSoil => {
            soils[index].is_evil = true;
            soils[index].multiplier *= v;
        }
        UpgradeEffect::Clover => {
            soils[index].is_clover = true;
        }
        UpgradeEffect::HolySoil => {
            soils[index].is_holy = true;
            if let Some(left) = index.checked_sub(1) {
                soils[left].multiplier *= v;
            }
            if index + 1 < len {
                soils[index + 1].multiplier *= v;
            }
        }
        UpgradeEffect::RuneChange => {}
        UpgradeEffect::EvenSoil => {
            for soil in soils.iter_mut().step_by(2) {
                soil.multiplier *= v;
            }
        }
        UpgradeEffect::OddSoil => {
            for soil in soils.iter_mut().skip(1).step_by(2) {
                soil.multiplier *= v;
            }
        }
        UpgradeEffect::RemoveUpgrade => {
            // accumulated multipliers stay
            soils[index].clear_flags();
            debug!(index, "upgrade removed");
            return true;
        }
    }

    let target = &mut soils[index];
    target.is_upgraded = true;
    target.upgraded_color = Some(effect.color_tag().to_string());
    debug!(
        index,
        upgrade = upgrade.name.as_str(),
        multiplier = target.multiplier,
        "upgrade applied"
    );
    true
}
