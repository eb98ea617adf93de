use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Effect triggered when a planted seed is harvested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HarvestEffect {
    /// Harvest value (and per-iteration effects) apply `value` times
    Retrigger { value: u32 },
    /// Grant `value` coins per harvest iteration
    AddCoins { value: u32 },
    /// Chance in `[0, 1]` per iteration to add a copy of the seed to the backpack
    SelfDuplicateChance { value: f64 },
}

/// Bonus computed from the seeds planted next to this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SynergyEffect {
    /// Adds `value` when the right-hand neighbour has the same seed type
    AdjacentSameTypeValueBoost { value: f64 },
    /// Adds `bonus_per_match` for each neighbour of `target_seed_type`
    AdjacentTypeValueBoost {
        target_seed_type: String,
        bonus_per_match: f64,
    },
}

/// Immutable seed archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTemplate {
    pub name: String,
    pub base_value: f64,
    pub seed_type: String,
    #[serde(default)]
    pub on_harvest_effect: Option<HarvestEffect>,
    #[serde(default)]
    pub synergy_effect: Option<SynergyEffect>,
    /// Shop price; falls back to three times the base value
    #[serde(default)]
    pub price: Option<u32>,
}

impl SeedTemplate {
    pub fn new(name: impl Into<String>, base_value: f64, seed_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_value,
            seed_type: seed_type.into(),
            on_harvest_effect: None,
            synergy_effect: None,
            price: None,
        }
    }

    pub fn with_harvest_effect(mut self, effect: HarvestEffect) -> Self {
        self.on_harvest_effect = Some(effect);
        self
    }

    pub fn with_synergy(mut self, effect: SynergyEffect) -> Self {
        self.synergy_effect = Some(effect);
        self
    }

    pub fn shop_price(&self) -> u32 {
        self.price
            .unwrap_or_else(|| (self.base_value * 3.0).round().max(0.0) as u32)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !self.base_value.is_finite() || self.base_value < 0.0 {
            return Err(invalid("base_value must be finite and >= 0"));
        }
        match &self.on_harvest_effect {
            Some(HarvestEffect::Retrigger { value }) if *value == 0 => {
                Err(invalid("retrigger value must be >= 1"))
            }
            Some(HarvestEffect::SelfDuplicateChance { value }) if !(0.0..=1.0).contains(value) => {
                Err(invalid("self_duplicate_chance must be within [0, 1]"))
            }
            _ => Ok(()),
        }
    }
}

/// Kind of modification an upgrade performs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeEffect {
    MultiplierBoost,
    EvilSoil,
    Clover,
    HolySoil,
    RuneChange,
    EvenSoil,
    OddSoil,
    RemoveUpgrade,
}

impl UpgradeEffect {
    /// Presentation tag stored on the soil when the upgrade is applied.
    pub fn color_tag(self) -> &'static str {
        match self {
            UpgradeEffect::MultiplierBoost => "green",
            UpgradeEffect::EvilSoil => "crimson",
            UpgradeEffect::Clover => "clover",
            UpgradeEffect::HolySoil => "gold",
            UpgradeEffect::RuneChange => "violet",
            UpgradeEffect::EvenSoil | UpgradeEffect::OddSoil => "blue",
            UpgradeEffect::RemoveUpgrade => "default",
        }
    }
}

/// Immutable upgrade archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTemplate {
    pub name: String,
    pub upgrade_effect: UpgradeEffect,
    pub effect_value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<u32>,
}

impl UpgradeTemplate {
    pub fn new(name: impl Into<String>, upgrade_effect: UpgradeEffect, effect_value: f64) -> Self {
        Self {
            name: name.into(),
            upgrade_effect,
            effect_value,
            description: String::new(),
            price: None,
        }
    }

    pub fn shop_price(&self) -> u32 {
        self.price.unwrap_or(75)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !self.effect_value.is_finite() || self.effect_value < 0.0 {
            return Err(invalid("effect_value must be finite and >= 0"));
        }
        Ok(())
    }
}

/// A seed instance. Clones share the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    template: Arc<SeedTemplate>,
}

impl Seed {
    pub fn new(template: Arc<SeedTemplate>) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &SeedTemplate {
        &self.template
    }
    pub fn name(&self) -> &str {
        &self.template.name
    }
    pub fn base_value(&self) -> f64 {
        self.template.base_value
    }
    pub fn seed_type(&self) -> &str {
        &self.template.seed_type
    }
    pub fn on_harvest_effect(&self) -> Option<&HarvestEffect> {
        self.template.on_harvest_effect.as_ref()
    }
    pub fn synergy_effect(&self) -> Option<&SynergyEffect> {
        self.template.synergy_effect.as_ref()
    }

    /// Mints a fresh instance of the same archetype.
    pub fn duplicate(&self) -> Seed {
        Seed {
            template: Arc::clone(&self.template),
        }
    }
}

impl From<SeedTemplate> for Seed {
    fn from(template: SeedTemplate) -> Self {
        Seed::new(Arc::new(template))
    }
}

/// An upgrade instance. Clones share the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    template: Arc<UpgradeTemplate>,
}

impl Upgrade {
    pub fn new(template: Arc<UpgradeTemplate>) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &UpgradeTemplate {
        &self.template
    }
    pub fn name(&self) -> &str {
        &self.template.name
    }
    pub fn effect(&self) -> UpgradeEffect {
        self.template.upgrade_effect
    }
}

impl From<UpgradeTemplate> for Upgrade {
    fn from(template: UpgradeTemplate) -> Self {
        Upgrade::new(Arc::new(template))
    }
}

/// Anything that can be dragged onto the board or bought in the shop.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Seed(Seed),
    Upgrade(Upgrade),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Seed(s) => s.name(),
            Item::Upgrade(u) => u.name(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    seeds: Vec<SeedTemplate>,
    #[serde(default)]
    upgrades: Vec<UpgradeTemplate>,
}

/// Read-only registry of seed and upgrade archetypes keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    seeds: BTreeMap<String, Arc<SeedTemplate>>,
    upgrades: BTreeMap<String, Arc<UpgradeTemplate>>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Self::from_templates(file.seeds, file.upgrades)
    }

    pub fn from_templates(
        seeds: Vec<SeedTemplate>,
        upgrades: Vec<UpgradeTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        for seed in seeds {
            seed.validate()?;
            let name = seed.name.clone();
            if catalog.seeds.insert(name.clone(), Arc::new(seed)).is_some() {
                return Err(CatalogError::Invalid {
                    name,
                    reason: "duplicate seed name".into(),
                });
            }
        }
        for upgrade in upgrades {
            upgrade.validate()?;
            let name = upgrade.name.clone();
            if catalog.upgrades.insert(name.clone(), Arc::new(upgrade)).is_some() {
                return Err(CatalogError::Invalid {
                    name,
                    reason: "duplicate upgrade name".into(),
                });
            }
        }
        Ok(catalog)
    }

    pub fn seed(&self, name: &str) -> Option<&Arc<SeedTemplate>> {
        self.seeds.get(name)
    }

    pub fn upgrade(&self, name: &str) -> Option<&Arc<UpgradeTemplate>> {
        self.upgrades.get(name)
    }

    pub fn seeds(&self) -> impl Iterator<Item = &Arc<SeedTemplate>> {
        self.seeds.values()
    }

    pub fn upgrades(&self) -> impl Iterator<Item = &Arc<UpgradeTemplate>> {
        self.upgrades.values()
    }

    pub fn mint_seed(&self, name: &str) -> Option<Seed> {
        self.seed(name).map(|t| Seed::new(Arc::clone(t)))
    }

    pub fn mint_upgrade(&self, name: &str) -> Option<Upgrade> {
        self.upgrade(name).map(|t| Upgrade::new(Arc::clone(t)))
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.upgrades.is_empty()
    }
}
