pub mod buildings;
pub mod density;
pub mod places;
pub mod population;

use anyhow::Result;
use gridpop::{logging, Config};

use crate::cli::{Cli, ConfigArgs};

/// Load the run config and install logging from it.
fn setup(cli: &Cli, args: &ConfigArgs) -> Result<Config> {
    let config = Config::from_path(&args.config)?;
    logging::init(config.logging.as_ref(), cli.verbose)?;
    Ok(config)
}
