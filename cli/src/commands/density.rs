use anyhow::Result;
use gridpop::pipeline;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ConfigArgs) -> Result<()> {
    let config = super::setup(cli, args)?;
    let stats = pipeline::run_density(&config)?;
    tracing::info!(
        "[density] {} grid(s), {} with a reachable supermarket; {} failed quer(ies)",
        stats.grids,
        stats.grids_with_access,
        stats.failed_queries,
    );
    Ok(())
}
