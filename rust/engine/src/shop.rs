use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, Item, Seed, SeedTemplate, Upgrade};
use crate::errors::GameError;
use crate::player::Backpack;
use crate::rng::RandomSource;

/// Products on display after a roll
pub const SHOP_SLOTS: usize = 3;
/// Price of rerolling the display
pub const ROLL_COST: u32 = 10;
/// Coins per point of a shop seed's rolled value
pub const SEED_PRICE_MULTIPLIER: u32 = 3;

/// An item on display with its price tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub item: Item,
    pub price: u32,
}

/// Between-round shop. Products are drawn from the catalog with the injected
/// random source; bought slots stay empty until the next roll.
#[derive(Debug, Clone)]
pub struct Shop {
    catalog: Catalog,
    slots: Vec<Option<Product>>,
    roll_cost: u32,
}

impl Shop {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            slots: Vec::new(),
            roll_cost: ROLL_COST,
        }
    }

    pub fn products(&self) -> &[Option<Product>] {
        &self.slots
    }

    pub fn roll_cost(&self) -> u32 {
        self.roll_cost
    }

    /// Refills every slot. Each slot is a seed or an upgrade with even odds,
    /// then a uniformly chosen archetype of that kind. Seeds get a rolled
    /// value, see [`roll_seed`].
    pub fn roll<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let seeds: Vec<_> = self.catalog.seeds().cloned().collect();
        let upgrades: Vec<_> = self.catalog.upgrades().cloned().collect();
        self.slots = (0..SHOP_SLOTS)
            .map(|_| {
                let pick_seed = match (seeds.is_empty(), upgrades.is_empty()) {
                    (true, true) => return None,
                    (false, true) => true,
                    (true, false) => false,
                    (false, false) => rng.next_index(2) == 0,
                };
                if pick_seed {
                    let template = &seeds[rng.next_index(seeds.len())];
                    Some(roll_seed(template, rng))
                } else {
                    let template = &upgrades[rng.next_index(upgrades.len())];
                    Some(Product {
                        price: template.shop_price(),
                        item: Item::Upgrade(Upgrade::new(Arc::clone(template))),
                    })
                }
            })
            .collect();
        debug!(slots = self.slots.len(), "shop rolled");
    }

    /// Buys the product in `slot` into `backpack`.
    ///
    /// # Errors
    ///
    /// - [`GameError::EmptyShopSlot`] for an empty or missing slot
    /// - [`GameError::InsufficientCoins`] when the purse is short
    /// - [`GameError::BackpackFull`] / [`GameError::UpgradeCapacity`] when
    ///   there is no room; the price is refunded
    pub fn buy<B: Backpack + ?Sized>(
        &mut self,
        slot: usize,
        backpack: &mut B,
    ) -> Result<Item, GameError> {
        let Some(product) = self.slots.get(slot).and_then(Option::as_ref) else {
            return Err(GameError::EmptyShopSlot { slot });
        };
        let price = product.price;
        backpack.remove_coins(price)?;

        let item = product.item.clone();
        let stored = match &item {
            Item::Seed(seed) => backpack.add_seed(seed.duplicate()),
            Item::Upgrade(upgrade) => backpack.add_upgrade(upgrade.clone()),
        };
        if let Err(e) = stored {
            backpack.add_coins(price);
            return Err(e);
        }

        self.slots[slot] = None;
        debug!(item = item.name(), price, "bought");
        Ok(item)
    }

    /// Pays the roll cost and refills the display.
    pub fn reroll<B, R>(&mut self, backpack: &mut B, rng: &mut R) -> Result<(), GameError>
    where
        B: Backpack + ?Sized,
        R: RandomSource + ?Sized,
    {
        backpack.remove_coins(self.roll_cost)?;
        self.roll(rng);
        Ok(())
    }
}

/// Rolls a seed product: a whole value in `[base, 3 * base]` priced at
/// `value * SEED_PRICE_MULTIPLIER`, unless the archetype sets its own price.
/// The product carries the rolled value, so the bought seed scores with it.
pub fn roll_seed<R: RandomSource + ?Sized>(template: &SeedTemplate, rng: &mut R) -> Product {
    let base = template.base_value.round().max(0.0) as u32;
    let value = base + rng.next_index(2 * base as usize + 1) as u32;
    let rolled = SeedTemplate {
        base_value: f64::from(value),
        ..template.clone()
    };
    Product {
        price: template.price.unwrap_or(value * SEED_PRICE_MULTIPLIER),
        item: Item::Seed(Seed::new(Arc::new(rolled))),
    }
}
