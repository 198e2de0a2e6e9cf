use std::collections::BTreeMap;

use crate::models::{PlayerRecord, PlayerStatus, TeamRecord};

/// Sum defensive counters per team and pivot player status into
/// `Available`/`Doubtful`/`Injured` counts. Players without a team are
/// ignored; rows come back ordered by team name.
pub fn aggregate_teams(players: &[PlayerRecord]) -> Vec<TeamRecord> {
    let mut sums: BTreeMap<&str, TeamRecord> = BTreeMap::new();
    let mut status_counts: BTreeMap<&str, BTreeMap<PlayerStatus, u32>> = BTreeMap::new();

    for player in players {
        let Some(team) = player.team.as_deref() else {
            continue;
        };

        let row = sums.entry(team).or_insert_with(|| TeamRecord {
            team: team.to_string(),
            ..Default::default()
        });
        row.tackles += player.tackles;
        row.yellow_cards += player.yellow_cards;
        row.red_cards += player.red_cards;
        row.clearances_blocks_interceptions += player.clearances_blocks_interceptions;
        row.recoveries += player.recoveries;
        row.defensive_contribution += player.defensive_contribution;
        row.minutes += player.minutes;

        if let Some(status) = player.status {
            *status_counts.entry(team).or_default().entry(status).or_insert(0) += 1;
        }
    }

    // Left join of the status pivot onto the sums; absent buckets stay 0.
    let teams: Vec<TeamRecord> = sums
        .into_iter()
        .map(|(team, mut row)| {
            if let Some(counts) = status_counts.get(team) {
                let count = |s: PlayerStatus| counts.get(&s).copied().unwrap_or(0);
                row.available = count(PlayerStatus::Available);
                row.doubtful = count(PlayerStatus::Doubtful);
                row.injured = count(PlayerStatus::Injured);
            }
            row
        })
        .collect();

    tracing::info!("Aggregated {} teams", teams.len());
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupTables;
    use crate::services::player_normalizer::normalize_players;
    use crate::services::test_records::raw_player;

    fn players() -> Vec<PlayerRecord> {
        let raw = vec![
            raw_player(1, 1, "a", Some("2000-01-01")),
            raw_player(2, 1, "i", Some("2000-01-01")),
            raw_player(3, 1, "a", Some("2000-01-01")),
            raw_player(4, 1, "s", Some("2000-01-01")),
            raw_player(5, 7, "d", Some("2000-01-01")),
            raw_player(6, 77, "a", Some("2000-01-01")),
        ];
        normalize_players(&raw, &LookupTables::default(), 2025).unwrap()
    }

    #[test]
    fn test_sums_per_team() {
        let teams = aggregate_teams(&players());
        assert_eq!(
            teams.iter().map(|t| t.team.as_str()).collect::<Vec<_>>(),
            vec!["Arsenal", "Chelsea"]
        );
        let arsenal = &teams[0];
        assert_eq!(arsenal.tackles, 48);
        assert_eq!(arsenal.minutes, 3600);
        assert_eq!(arsenal.defensive_contribution, 180);
    }

    #[test]
    fn test_status_pivot_defaults_to_zero() {
        let teams = aggregate_teams(&players());
        let chelsea = &teams[1];
        assert_eq!((chelsea.available, chelsea.doubtful, chelsea.injured), (0, 1, 0));
    }

    #[test]
    fn test_status_counts_match_players_with_status() {
        let players = players();
        for team in aggregate_teams(&players) {
            let expected = players
                .iter()
                .filter(|p| p.team.as_deref() == Some(team.team.as_str()) && p.status.is_some())
                .count() as u32;
            assert_eq!(team.available + team.doubtful + team.injured, expected);
        }
    }

    #[test]
    fn test_team_with_only_unknown_statuses_still_appears() {
        let mut players = players();
        players.retain(|p| p.id == 4);
        let teams = aggregate_teams(&players);
        assert_eq!(teams.len(), 1);
        assert_eq!((teams[0].available, teams[0].doubtful, teams[0].injured), (0, 0, 0));
    }
}
