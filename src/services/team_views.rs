use serde::{Deserialize, Serialize};

use crate::models::TeamResult;
use crate::utils::column_label;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatMode {
    #[default]
    Defense,
    Attack,
}

type Column = (&'static str, fn(&TeamResult) -> u32);

const DEFENSIVE_COLUMNS: [Column; 5] = [
    ("tackles", |t| t.stats.tackles),
    ("recoveries", |t| t.stats.recoveries),
    ("clearances_blocks_interceptions", |t| t.stats.clearances_blocks_interceptions),
    ("defensive_contribution", |t| t.stats.defensive_contribution),
    ("total_goals_against", |t| t.total_goals_against),
];

const ATTACKING_COLUMNS: [Column; 7] = [
    ("total_goals_for", |t| t.total_goals_for),
    ("home_wins", |t| t.home_wins),
    ("home_losses", |t| t.home_losses),
    ("home_draws", |t| t.home_draws),
    ("away_wins", |t| t.away_wins),
    ("away_losses", |t| t.away_losses),
    ("away_draws", |t| t.away_draws),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatPoint {
    pub stat: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDashboard {
    pub title: String,
    pub stats: Vec<StatPoint>,
    #[serde(rename = "Available")]
    pub available: u32,
    #[serde(rename = "Doubtful")]
    pub doubtful: u32,
    #[serde(rename = "Injured")]
    pub injured: u32,
    pub summary: String,
}

pub fn stat_view(team: &TeamResult, mode: StatMode) -> Vec<StatPoint> {
    let columns: &[Column] = match mode {
        StatMode::Defense => &DEFENSIVE_COLUMNS,
        StatMode::Attack => &ATTACKING_COLUMNS,
    };
    columns
        .iter()
        .map(|(name, value)| StatPoint {
            stat: column_label(name),
            count: value(team),
        })
        .collect()
}

pub fn status_summary(team: &TeamResult) -> String {
    format!(
        "{} has {} available players, {} doubtful, and {} injured.",
        team.stats.team, team.stats.available, team.stats.doubtful, team.stats.injured
    )
}

pub fn team_dashboard(team: &TeamResult, mode: StatMode) -> TeamDashboard {
    let title = match mode {
        StatMode::Defense => format!("{} Defensive Stats", team.stats.team),
        StatMode::Attack => format!("{} Attacking Stats", team.stats.team),
    };
    TeamDashboard {
        title,
        stats: stat_view(team, mode),
        available: team.stats.available,
        doubtful: team.stats.doubtful,
        injured: team.stats.injured,
        summary: status_summary(team),
    }
}
