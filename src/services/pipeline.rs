use serde::Serialize;

use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{FixtureRecord, InjuryReport, PlayerRecord, TeamResult};
use crate::services::data_source::RawDataset;
use crate::services::{
    aggregate_teams, normalize_fixtures, normalize_players, reconstruct_results, summarize_injuries,
};

/// Every derived table, built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tables {
    pub players: Vec<PlayerRecord>,
    pub fixtures: Vec<FixtureRecord>,
    pub teams: Vec<TeamResult>,
    pub injuries: Option<InjuryReport>,
}

impl Tables {
    pub fn team(&self, name: &str) -> Option<&TeamResult> {
        self.teams.iter().find(|t| t.stats.team == name)
    }

    pub fn player(&self, id: u32) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Run every stage over one fetched dataset.
pub fn run_pipeline(raw: &RawDataset, config: &Config) -> Result<Tables, PipelineError> {
    let mut lookups = config.lookups.clone();
    lookups.absorb_upstream(&raw.general.teams, &raw.general.positions)?;

    let players = normalize_players(&raw.general.players, &lookups, config.reference_year)?;
    let fixtures = normalize_fixtures(&raw.fixtures, &lookups)?;
    let aggregates = aggregate_teams(&players);
    let teams = reconstruct_results(&fixtures, &aggregates);

    if raw.injuries.is_empty() {
        tracing::warn!("No historical injury data available");
    }
    let injuries = summarize_injuries(&raw.injuries);

    Ok(Tables {
        players,
        fixtures,
        teams,
        injuries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerStatus;
    use crate::services::data_source::GeneralInformation;
    use crate::services::test_records::raw_fixture;
    use crate::services::test_records::raw_player;
    use serde_json::json;

    fn dataset() -> RawDataset {
        RawDataset {
            general: GeneralInformation {
                players: vec![
                    raw_player(1, 1, "a", Some("1998-03-02")),
                    raw_player(2, 1, "i", Some("2001-09-10")),
                    raw_player(3, 2, "d", Some("1994-01-20")),
                    raw_player(4, 2, "u", Some("2000-01-01")),
                    raw_player(5, 3, "a", None),
                ],
                teams: vec![
                    json!({"id": 1, "name": "Arsenal"}),
                    json!({"id": 2, "name": "Aston Villa"}),
                    json!({"id": 3, "name": "Burnley"}),
                ],
                positions: vec![json!({"id": 3, "singular_name_short": "MID"})],
            },
            fixtures: vec![
                raw_fixture(1, 2, Some((2, 1)), Some("2025-08-16T14:00:00Z")),
                raw_fixture(2, 1, Some((0, 0)), Some("2025-08-23T14:00:00Z")),
                raw_fixture(3, 1, None, Some("2025-08-30T14:00:00Z")),
            ],
            injuries: vec![
                json!({"team": {"name": "Arsenal"}, "player": {"reason": "Knee Injury"}}),
                json!({"team": {"name": "Arsenal"}, "player": {"reason": "Knee Injury"}}),
                json!({"team": {"name": "Chelsea"}, "player": {"reason": "Knee Injury"}}),
            ],
        }
    }

    #[test]
    fn test_full_pipeline() {
        let tables = run_pipeline(&dataset(), &Config::default()).unwrap();

        assert_eq!(tables.players.len(), 3);
        assert_eq!(tables.fixtures.len(), 3);
        assert_eq!(
            tables.teams.iter().map(|t| t.stats.team.as_str()).collect::<Vec<_>>(),
            vec!["Arsenal", "Aston Villa"]
        );

        let arsenal = tables.team("Arsenal").unwrap();
        assert_eq!((arsenal.stats.available, arsenal.stats.injured), (1, 1));
        assert_eq!((arsenal.total_goals_for, arsenal.total_goals_against), (2, 1));
        assert_eq!(arsenal.form, "DW");

        let villa = tables.team("Aston Villa").unwrap();
        assert_eq!(villa.stats.doubtful, 1);
        assert_eq!((villa.total_goals_for, villa.total_goals_against), (1, 2));

        let injuries = tables.injuries.as_ref().unwrap();
        assert_eq!(injuries.summary[0].team_with_most, "Arsenal");
        assert_eq!(injuries.summary[0].count, 2);

        assert_eq!(tables.player(2).unwrap().status, Some(PlayerStatus::Injured));
    }

    #[test]
    fn test_without_injuries() {
        let mut raw = dataset();
        raw.injuries.clear();
        let tables = run_pipeline(&raw, &Config::default()).unwrap();
        assert!(tables.injuries.is_none());
        assert_eq!(tables.teams.len(), 2);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let raw = dataset();
        let config = Config::default();
        let first = serde_json::to_string(&run_pipeline(&raw, &config).unwrap()).unwrap();
        let second = serde_json::to_string(&run_pipeline(&raw, &config).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_schema_mismatch_aborts() {
        let mut raw = dataset();
        raw.general.players[0].as_object_mut().unwrap().remove("minutes");
        assert!(matches!(
            run_pipeline(&raw, &Config::default()),
            Err(PipelineError::SchemaMismatch { .. })
        ));
    }
}
