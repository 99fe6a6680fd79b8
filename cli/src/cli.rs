use std::path::PathBuf;

/// Grid population and supermarket density CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "gridpop", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Reduce a building footprint shapefile to residential buildings
    Buildings(ConfigArgs),

    /// Estimate population per grid cell
    Population(ConfigArgs),

    /// Extract the supermarket list from raw place results
    Places(ConfigArgs),

    /// Compute population per reachable supermarket for each grid cell
    Density(ConfigArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// YAML run configuration
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,
}
