use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Available,
    Injured,
    Doubtful,
}

impl PlayerStatus {
    /// Single-letter FPL availability code. The placeholder `u` and anything
    /// else unknown map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(PlayerStatus::Available),
            "i" => Some(PlayerStatus::Injured),
            "d" => Some(PlayerStatus::Doubtful),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerStatus::Available => write!(f, "Available"),
            PlayerStatus::Injured => write!(f, "Injured"),
            PlayerStatus::Doubtful => write!(f, "Doubtful"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub first_name: String,
    pub second_name: String,
    pub web_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub age: u32,
    pub status: Option<PlayerStatus>,
    pub news: String,
    pub chance_of_playing_this_round: Option<u32>,
    pub chance_of_playing_next_round: Option<u32>,
    pub minutes: u32,
    pub starts: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub saves: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub tackles: u32,
    pub recoveries: u32,
    pub clearances_blocks_interceptions: u32,
    pub defensive_contribution: u32,
    pub defensive_contribution_per_90: f64,
    pub expected_goals: f64,
    pub expected_assists: f64,
    pub expected_goal_involvements: f64,
    pub team_join_date: Option<String>,
}

/// Per-team sums over the normalized player table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,
    pub tackles: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub clearances_blocks_interceptions: u32,
    pub recoveries: u32,
    pub defensive_contribution: u32,
    pub minutes: u32,
    #[serde(rename = "Available")]
    pub available: u32,
    #[serde(rename = "Doubtful")]
    pub doubtful: u32,
    #[serde(rename = "Injured")]
    pub injured: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub event: Option<String>,
    pub finished: bool,
    pub team_a: String,
    pub team_a_score: Option<u32>,
    pub team_h: String,
    pub team_h_score: Option<u32>,
    pub date: Option<NaiveDate>,
}

impl FixtureRecord {
    /// Both scores present.
    pub fn scores(&self) -> Option<(u32, u32)> {
        Some((self.team_h_score?, self.team_a_score?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "D")]
    Draw,
}

impl MatchOutcome {
    pub fn from_scores(own: u32, opponent: u32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            MatchOutcome::Win => 'W',
            MatchOutcome::Loss => 'L',
            MatchOutcome::Draw => 'D',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    #[serde(flatten)]
    pub stats: TeamRecord,
    pub total_goals_for: u32,
    pub total_goals_against: u32,
    pub results_list: Vec<MatchOutcome>,
    pub home_wins: u32,
    pub home_losses: u32,
    pub home_draws: u32,
    pub away_wins: u32,
    pub away_losses: u32,
    pub away_draws: u32,
    pub form: String, // Last 5 games, most recent first: "WLWDW"
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjurySummaryRow {
    #[serde(rename = "Injury Type")]
    pub injury_type: String,
    #[serde(rename = "Team with Most")]
    pub team_with_most: String,
    #[serde(rename = "Count")]
    pub count: u32,
}

/// Dense team × injury-type matrix; `counts[t][r]` is the number of
/// `injury_types[r]` injuries recorded for `teams[t]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryHeatmap {
    pub teams: Vec<String>,
    pub injury_types: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

/// One heatmap row as a flat mapping: `Team` plus one column per injury type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjuryHeatmapRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u32>,
}

impl InjuryHeatmap {
    pub fn rows(&self) -> Vec<InjuryHeatmapRow> {
        self.teams
            .iter()
            .zip(&self.counts)
            .map(|(team, counts)| InjuryHeatmapRow {
                team: team.clone(),
                counts: self.injury_types.iter().cloned().zip(counts.iter().copied()).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryReport {
    pub summary: Vec<InjurySummaryRow>,
    pub heatmap: InjuryHeatmap,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful request with nothing to show (e.g. no injury dataset).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PlayerStatus::from_code("a"), Some(PlayerStatus::Available));
        assert_eq!(PlayerStatus::from_code("d"), Some(PlayerStatus::Doubtful));
        assert_eq!(PlayerStatus::from_code("s"), None);
    }

    #[test]
    fn test_team_result_serializes_flat() {
        let result = TeamResult {
            stats: TeamRecord {
                team: "Arsenal".to_string(),
                available: 20,
                ..Default::default()
            },
            total_goals_for: 3,
            total_goals_against: 1,
            results_list: vec![MatchOutcome::Win, MatchOutcome::Draw],
            home_wins: 1,
            home_losses: 0,
            home_draws: 0,
            away_wins: 0,
            away_losses: 0,
            away_draws: 1,
            form: "DW".to_string(),
            win_percentage: 66.7,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["team"], "Arsenal");
        assert_eq!(value["Available"], 20);
        assert_eq!(value["results_list"], serde_json::json!(["W", "D"]));
    }

    #[test]
    fn test_heatmap_rows() {
        let heatmap = InjuryHeatmap {
            teams: vec!["A".to_string(), "B".to_string()],
            injury_types: vec!["Knee".to_string(), "Illness".to_string()],
            counts: vec![vec![2, 0], vec![1, 3]],
        };

        let rows = heatmap.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].team, "B");
        assert_eq!(rows[1].counts["Illness"], 3);
        assert_eq!(rows[0].counts["Illness"], 0);
    }
}
