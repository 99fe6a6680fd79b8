mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{buildings, density, places, population};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    match &cli.command {
        Commands::Buildings(args) => buildings::run(&cli, args),
        Commands::Population(args) => population::run(&cli, args),
        Commands::Places(args) => places::run(&cli, args),
        Commands::Density(args) => density::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
