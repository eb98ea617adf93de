//! Configuration command handler.
//!
//! Prints the resolved configuration with the source of every value
//! (default, config file or environment) as pretty JSON:
//!
//! ```json
//! {
//!   "soils": {
//!     "value": 5,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    for (name, source) in [("seed", resolved.sources.seed), ("animate", resolved.sources.animate)] {
        if source == config::ValueSource::Env {
            ui::display_warning(err, &format!("{} overridden by the environment", name))?;
        }
    }

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "soils": {
            "value": config.soils,
            "source": sources.soils,
        },
        "hand_size": {
            "value": config.hand_size,
            "source": sources.hand_size,
        },
        "score_goal": {
            "value": config.score_goal,
            "source": sources.score_goal,
        },
        "animate": {
            "value": config.animate,
            "source": sources.animate,
        },
        "starting_seed": {
            "value": config.starting_seed,
            "source": sources.starting_seed,
        },
        "starting_seeds": {
            "value": config.starting_seeds,
            "source": sources.starting_seeds,
        },
        "starting_coins": {
            "value": config.starting_coins,
            "source": sources.starting_coins,
        },
        "starting_upgrades": {
            "value": config.starting_upgrades,
            "source": sources.starting_upgrades,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
