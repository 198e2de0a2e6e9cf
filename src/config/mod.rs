pub mod lookups;

pub use lookups::LookupTables;

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Season the player ages are pinned to.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;
pub const DEFAULT_INJURY_LEAGUE: u32 = 39;
pub const DEFAULT_INJURY_SEASON: u32 = 2021;
pub const DEFAULT_SNAPSHOT_DIR: &str = "data/snapshot";

#[derive(Debug, Clone)]
pub struct Config {
    pub reference_year: i32,
    pub lookups: LookupTables,
    pub injury_api_key: Option<String>,
    pub injury_league: u32,
    pub injury_season: u32,
    pub snapshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            lookups: LookupTables::default(),
            injury_api_key: None,
            injury_league: DEFAULT_INJURY_LEAGUE,
            injury_season: DEFAULT_INJURY_SEASON,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
        }
    }
}

impl Config {
    /// Build from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(year) = parse_var("PLSTATS_REFERENCE_YEAR")? {
            config.reference_year = year;
        }
        if let Some(league) = parse_var("PLSTATS_INJURY_LEAGUE")? {
            config.injury_league = league;
        }
        if let Some(season) = parse_var("PLSTATS_INJURY_SEASON")? {
            config.injury_season = season;
        }
        if let Ok(dir) = env::var("PLSTATS_SNAPSHOT_DIR") {
            config.snapshot_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("PLSTATS_LOOKUPS") {
            config.lookups = LookupTables::from_file(&PathBuf::from(path))?;
        }
        config.injury_api_key = env::var("API_KEY").ok().filter(|k| !k.trim().is_empty());

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { key, value }),
        Err(_) => Ok(None),
    }
}
