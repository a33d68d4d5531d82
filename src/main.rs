mod season;

use color_eyre::eyre::WrapErr;
use database::{DatabaseGenerator, DatabaseLoader};
use env_logger::Env;
use gridiron_core::SimRng;
use gridiron_core::utils::TimeEstimation;
use log::info;
use season::{RunnerSettings, SeasonRunner};
use std::env;
use std::str::FromStr;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_SEASON: u16 = 2026;

fn env_or<T: FromStr>(name: &str, default: T) -> color_eyre::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .wrap_err_with(|| format!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}

fn load_settings() -> color_eyre::Result<RunnerSettings> {
    match env::var("SETTINGS_FILE") {
        Ok(path) => {
            let contents = std::fs::read_to_string(&path).wrap_err_with(|| format!("reading {}", path))?;
            serde_json::from_str(&contents).wrap_err_with(|| format!("parsing {}", path))
        }
        Err(_) => Ok(RunnerSettings::default()),
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let seed: u64 = env_or("SEED", 2026)?;
    let season: u16 = env_or("SEASON", DEFAULT_SEASON)?;
    let seasons: u16 = env_or("SEASONS", 1)?;
    let settings = load_settings()?;

    let (database, estimated) = TimeEstimation::estimate(DatabaseLoader::load);
    let database = database?;

    info!("database loaded: {} ms", estimated);

    let league = DatabaseGenerator::generate(&database, &mut SimRng::seed_from(seed))?;

    let mut runner = SeasonRunner::new(season, league.teams, league.rosters, settings, seed)?;

    let (summaries, estimated) = TimeEstimation::estimate(|| runner.run(seasons));

    for summary in summaries? {
        info!(
            "season {}: {} regular season games, {} playoff games, {} injuries, {} schedule issues",
            summary.season,
            summary.regular_season_games,
            summary.playoff_games,
            summary.injuries,
            summary.schedule_issues.len()
        );
    }

    info!("{} season(s) simulated: {} ms", seasons, estimated);

    Ok(())
}
