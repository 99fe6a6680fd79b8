use anyhow::Result;
use gridpop::pipeline;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ConfigArgs) -> Result<()> {
    let config = super::setup(cli, args)?;
    let stats = pipeline::run_population(&config)?;
    tracing::info!(
        "[population] {} grid(s), {} district(s), {:.1} resident(s); {} building(s) unassigned, {} grid(s) without district",
        stats.grids,
        stats.districts,
        stats.total_population,
        stats.buildings.unassigned,
        stats.grids_without_district,
    );
    Ok(())
}
