use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, PipelineError};
use crate::services::fields::{require_str, require_u32};

// ── 2025/26 Premier League defaults ─────────────────────────────────────────

const DEFAULT_TEAMS: [(u32, &str); 20] = [
    (1, "Arsenal"),
    (2, "Aston Villa"),
    (3, "Burnley"),
    (4, "Bournemouth"),
    (5, "Brentford"),
    (6, "Brighton"),
    (7, "Chelsea"),
    (8, "Crystal Palace"),
    (9, "Everton"),
    (10, "Fulham"),
    (11, "Leeds"),
    (12, "Liverpool"),
    (13, "Man City"),
    (14, "Man Utd"),
    (15, "Newcastle"),
    (16, "Nott'm Forest"),
    (17, "Sunderland"),
    (18, "Spurs"),
    (19, "West Ham"),
    (20, "Wolves"),
];

const DEFAULT_POSITIONS: [(u32, &str); 4] = [(1, "GKP"), (2, "DEF"), (3, "MID"), (4, "FWD")];

/// Team-id → name and position-id → short-name maps shared by both normalizers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables {
    teams: BTreeMap<u32, String>,
    positions: BTreeMap<u32, String>,
}

/// On-disk override format. JSON object keys are always strings, so ids
/// arrive as text and are parsed on load.
#[derive(Debug, Deserialize)]
struct LookupFile {
    #[serde(default)]
    teams: BTreeMap<String, String>,
    #[serde(default)]
    positions: BTreeMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self {
            teams: DEFAULT_TEAMS
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
            positions: DEFAULT_POSITIONS
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        }
    }
}

impl LookupTables {
    /// Load an override file. Entries in the file replace the defaults id by
    /// id; ids the file does not mention keep their default names.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LookupFile = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tables = Self::default();
        for (id, name) in file.teams {
            tables.teams.insert(parse_id(&id)?, name);
        }
        for (id, name) in file.positions {
            tables.positions.insert(parse_id(&id)?, name);
        }
        Ok(tables)
    }

    /// Fill gaps from the bootstrap `teams` and `element_types` lists.
    /// Configured names win; upstream only adds ids the tables lack.
    pub fn absorb_upstream(
        &mut self,
        teams: &[Value],
        positions: &[Value],
    ) -> Result<(), PipelineError> {
        let mut added = 0usize;
        for team in teams {
            let id = require_u32(team, "team", "id")?;
            let name = require_str(team, "team", "name")?;
            if !self.teams.contains_key(&id) {
                self.teams.insert(id, name.to_string());
                added += 1;
            }
        }
        for position in positions {
            let id = require_u32(position, "position", "id")?;
            let short = require_str(position, "position", "singular_name_short")?;
            if !self.positions.contains_key(&id) {
                self.positions.insert(id, short.to_string());
                added += 1;
            }
        }
        if added > 0 {
            tracing::info!("Lookup tables extended with {} upstream entries", added);
        }
        Ok(())
    }

    pub fn team_name(&self, id: u32) -> Option<&str> {
        self.teams.get(&id).map(String::as_str)
    }

    pub fn position_name(&self, id: u32) -> Option<&str> {
        self.positions.get(&id).map(String::as_str)
    }
}

fn parse_id(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::BadId(raw.to_string()))
}
