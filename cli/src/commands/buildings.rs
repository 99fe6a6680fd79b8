use anyhow::Result;
use gridpop::pipeline;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ConfigArgs) -> Result<()> {
    let config = super::setup(cli, args)?;
    let stats = pipeline::run_buildings(&config)?;
    tracing::info!("[buildings] kept {} of {} footprint(s)", stats.kept, stats.read);
    Ok(())
}
