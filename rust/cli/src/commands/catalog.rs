//! Catalog listing.
//!
//! Prints every seed and upgrade archetype with its shop price, either as an
//! aligned table or, with `--json`, in the same shape the catalog file uses.

use std::io::Write;

use botanic_engine::catalog::{
    Catalog, HarvestEffect, SeedTemplate, SynergyEffect, UpgradeTemplate,
};

use super::load_catalog;
use crate::error::CliError;
use crate::ui;

pub fn handle_catalog_command(
    catalog: Option<String>,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let catalog = load_catalog(catalog.as_deref())?;
    if catalog.is_empty() {
        ui::display_warning(err, "catalog is empty")?;
    }

    if json {
        write_json(&catalog, out)
    } else {
        write_table(&catalog, out)
    }
}

fn write_json(catalog: &Catalog, out: &mut dyn Write) -> Result<(), CliError> {
    let seeds: Vec<&SeedTemplate> = catalog.seeds().map(|s| s.as_ref()).collect();
    let upgrades: Vec<&UpgradeTemplate> = catalog.upgrades().map(|u| u.as_ref()).collect();
    let doc = serde_json::json!({ "seeds": seeds, "upgrades": upgrades });
    let s = serde_json::to_string_pretty(&doc).map_err(std::io::Error::other)?;
    writeln!(out, "{}", s)?;
    Ok(())
}

fn write_table(catalog: &Catalog, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "Seeds:")?;
    for seed in catalog.seeds() {
        writeln!(
            out,
            "  {:<16} {:>5} {:<8} {:>4}c  {}",
            seed.name,
            ui::format_score(seed.base_value),
            seed.seed_type,
            seed.shop_price(),
            describe_seed(seed)
        )?;
    }
    writeln!(out, "Upgrades:")?;
    for upgrade in catalog.upgrades() {
        let effect = serde_json::to_value(upgrade.upgrade_effect)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        writeln!(
            out,
            "  {:<16} {:<16} {:>5} {:>4}c  {}",
            upgrade.name,
            effect,
            ui::format_score(upgrade.effect_value),
            upgrade.shop_price(),
            upgrade.description
        )?;
    }
    Ok(())
}

/// One-line summary of a seed's effects, empty for plain seeds.
fn describe_seed(seed: &SeedTemplate) -> String {
    let harvest = seed.on_harvest_effect.as_ref().map(|e| match e {
        HarvestEffect::Retrigger { value } => format!("harvests x{}", value),
        HarvestEffect::AddCoins { value } => format!("+{} coins per harvest", value),
        HarvestEffect::SelfDuplicateChance { value } => {
            format!("{:.0}% chance to duplicate", value * 100.0)
        }
    });
    let synergy = seed.synergy_effect.as_ref().map(|e| match e {
        SynergyEffect::AdjacentSameTypeValueBoost { value } => {
            format!("+{} beside same type on the right", ui::format_score(*value))
        }
        SynergyEffect::AdjacentTypeValueBoost {
            target_seed_type,
            bonus_per_match,
        } => format!(
            "+{} per adjacent {}",
            ui::format_score(*bonus_per_match),
            target_seed_type
        ),
    });
    [harvest, synergy]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("; ")
}
