//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "botanic",
    version,
    about = "Botanic round engine CLI",
    long_about = "Headless driver for the botanic round engine: simulate rounds, \
                  inspect the seed catalog and show the resolved configuration."
)]
pub struct BotanicCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play rounds with a greedy planting policy and report the outcome
    Sim {
        /// Number of rounds to win before stopping
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: u32,
        /// RNG seed; falls back to the configured seed, then a random one
        #[arg(long)]
        seed: Option<u64>,
        /// Write one JSONL harvest record per played hand
        #[arg(long)]
        output: Option<String>,
        /// Catalog JSON file replacing the built-in catalog
        #[arg(long)]
        catalog: Option<String>,
    },
    /// List seed and upgrade archetypes
    Catalog {
        /// Catalog JSON file replacing the built-in catalog
        #[arg(long)]
        catalog: Option<String>,
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_requires_positive_rounds() {
        assert!(BotanicCli::try_parse_from(["botanic", "sim", "--rounds", "0"]).is_err());
        assert!(BotanicCli::try_parse_from(["botanic", "sim"]).is_err());
        let cli = BotanicCli::try_parse_from(["botanic", "sim", "--rounds", "3", "--seed", "9"])
            .unwrap();
        match cli.cmd {
            Commands::Sim { rounds, seed, .. } => {
                assert_eq!(rounds, 3);
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn every_subcommand_parses() {
        for args in [
            vec!["botanic", "cfg"],
            vec!["botanic", "catalog"],
            vec!["botanic", "catalog", "--json", "--catalog", "c.json"],
            vec!["botanic", "sim", "--rounds", "1", "--output", "o.jsonl"],
        ] {
            assert!(BotanicCli::try_parse_from(&args).is_ok(), "{:?}", args);
        }
    }
}
