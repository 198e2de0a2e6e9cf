use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::PlayerRecord;

/// Team / position / age selection over the player table. Empty lists and
/// missing bounds select everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerFilter {
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &PlayerRecord) -> bool {
        let in_list = |list: &[String], value: Option<&str>| {
            list.is_empty() || value.is_some_and(|v| list.iter().any(|x| x == v))
        };

        in_list(self.teams.as_slice(), player.team.as_deref())
            && in_list(self.positions.as_slice(), player.position.as_deref())
            && self.min_age.map_or(true, |min| player.age >= min)
            && self.max_age.map_or(true, |max| player.age <= max)
    }

    pub fn apply<'a>(&self, players: &'a [PlayerRecord]) -> Vec<&'a PlayerRecord> {
        players.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerOption {
    pub label: String,
    pub value: u32,
}

impl PlayerOption {
    pub fn for_player(player: &PlayerRecord) -> Self {
        Self {
            label: format!(
                "{} ({} - {})",
                player.web_name,
                player.team.as_deref().unwrap_or("N/A"),
                player.position.as_deref().unwrap_or("N/A")
            ),
            value: player.id,
        }
    }
}

/// Choices offered to a player filter: distinct teams and positions, sorted,
/// and the age range present in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub teams: Vec<String>,
    pub positions: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
}

pub fn filter_options(players: &[PlayerRecord]) -> FilterOptions {
    let teams: BTreeSet<&str> = players.iter().filter_map(|p| p.team.as_deref()).collect();
    let positions: BTreeSet<&str> = players.iter().filter_map(|p| p.position.as_deref()).collect();

    FilterOptions {
        teams: teams.into_iter().map(str::to_string).collect(),
        positions: positions.into_iter().map(str::to_string).collect(),
        age_min: players.iter().map(|p| p.age).min(),
        age_max: players.iter().map(|p| p.age).max(),
    }
}
