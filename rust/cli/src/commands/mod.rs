//! Command handlers for the `botanic` CLI.
//!
//! Each subcommand lives in its own module and follows one pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in by the caller
//! - Errors propagated as [`CliError`](crate::error::CliError)

pub mod catalog;
pub mod cfg;
pub mod sim;

pub use catalog::handle_catalog_command;
pub use cfg::handle_cfg_command;
pub use sim::handle_sim_command;

use botanic_engine::catalog::Catalog;

use crate::error::CliError;

/// Loads the catalog at `path`, or the built-in one.
pub(crate) fn load_catalog(path: Option<&str>) -> Result<Catalog, CliError> {
    match path {
        Some(p) => Ok(Catalog::load(p)?),
        None => Ok(Catalog::builtin()?),
    }
}
