use serde_json::Value;

use crate::config::LookupTables;
use crate::error::PipelineError;
use crate::models::{PlayerRecord, PlayerStatus};
use crate::services::fields::{
    optional_str, optional_u32, require_decimal, require_str, require_u32,
};

const RECORD: &str = "player";

/// Status code FPL uses for placeholder roster entries.
const PLACEHOLDER_STATUS: &str = "u";

/// Flatten raw `elements` into the player table.
///
/// Placeholder entries are skipped, players without a usable birth date are
/// dropped, and unknown team/position ids resolve to `None`. A whitelisted
/// field missing from any record aborts the whole normalization.
pub fn normalize_players(
    raw_players: &[Value],
    lookups: &LookupTables,
    reference_year: i32,
) -> Result<Vec<PlayerRecord>, PipelineError> {
    let mut players = Vec::with_capacity(raw_players.len());
    let mut placeholders = 0usize;
    let mut incomplete = 0usize;

    for raw in raw_players {
        let code = require_str(raw, RECORD, "status")?;
        if code == PLACEHOLDER_STATUS {
            placeholders += 1;
            continue;
        }

        match normalize_player(raw, code, lookups, reference_year)? {
            Some(player) => players.push(player),
            None => incomplete += 1,
        }
    }

    tracing::info!(
        "Normalized {} players ({} placeholders skipped, {} without birth date dropped)",
        players.len(),
        placeholders,
        incomplete
    );
    Ok(players)
}

fn normalize_player(
    raw: &Value,
    code: &str,
    lookups: &LookupTables,
    reference_year: i32,
) -> Result<Option<PlayerRecord>, PipelineError> {
    let id = require_u32(raw, RECORD, "id")?;

    let status = PlayerStatus::from_code(code);
    if status.is_none() {
        tracing::debug!("Player {} has unmapped status code '{}'", id, code);
    }

    let team_id = optional_u32(raw, RECORD, "team")?;
    let team = team_id
        .and_then(|t| lookups.team_name(t))
        .map(str::to_string);
    if team.is_none() {
        tracing::debug!("Player {} has unknown team id {:?}", id, team_id);
    }

    let position_id = optional_u32(raw, RECORD, "element_type")?;
    let position = position_id
        .and_then(|p| lookups.position_name(p))
        .map(str::to_string);
    if position.is_none() {
        tracing::debug!("Player {} has unknown position id {:?}", id, position_id);
    }

    let record = PlayerRecord {
        id,
        first_name: require_str(raw, RECORD, "first_name")?.to_string(),
        second_name: require_str(raw, RECORD, "second_name")?.to_string(),
        web_name: require_str(raw, RECORD, "web_name")?.to_string(),
        team,
        position,
        age: 0,
        status,
        news: optional_str(raw, RECORD, "news")?.unwrap_or_default().to_string(),
        chance_of_playing_this_round: optional_u32(
            raw,
            RECORD,
            "chance_of_playing_this_round",
        )?,
        chance_of_playing_next_round: optional_u32(
            raw,
            RECORD,
            "chance_of_playing_next_round",
        )?,
        minutes: require_u32(raw, RECORD, "minutes")?,
        starts: require_u32(raw, RECORD, "starts")?,
        goals_scored: require_u32(raw, RECORD, "goals_scored")?,
        assists: require_u32(raw, RECORD, "assists")?,
        saves: require_u32(raw, RECORD, "saves")?,
        yellow_cards: require_u32(raw, RECORD, "yellow_cards")?,
        red_cards: require_u32(raw, RECORD, "red_cards")?,
        tackles: require_u32(raw, RECORD, "tackles")?,
        recoveries: require_u32(raw, RECORD, "recoveries")?,
        clearances_blocks_interceptions: require_u32(
            raw,
            RECORD,
            "clearances_blocks_interceptions",
        )?,
        defensive_contribution: require_u32(raw, RECORD, "defensive_contribution")?,
        defensive_contribution_per_90: require_decimal(
            raw,
            RECORD,
            "defensive_contribution_per_90",
        )?,
        expected_goals: require_decimal(raw, RECORD, "expected_goals")?,
        expected_assists: require_decimal(raw, RECORD, "expected_assists")?,
        expected_goal_involvements: require_decimal(
            raw,
            RECORD,
            "expected_goal_involvements",
        )?,
        team_join_date: optional_str(raw, RECORD, "team_join_date")?.map(str::to_string),
    };

    let birth_date = optional_str(raw, RECORD, "birth_date")?;
    let Some(age) = birth_date.and_then(|d| age_from_birth_date(d, reference_year)) else {
        tracing::debug!("Dropping player {}: no usable birth date", id);
        return Ok(None);
    };

    Ok(Some(PlayerRecord { age, ..record }))
}

/// `reference_year - YYYY` from a `YYYY-MM-DD` string. Non-positive ages are
/// treated as unusable.
fn age_from_birth_date(birth_date: &str, reference_year: i32) -> Option<u32> {
    let year: i32 = birth_date.trim().split('-').next()?.parse().ok()?;
    let age = reference_year - year;
    u32::try_from(age).ok().filter(|a| *a > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_records::raw_player;
    use serde_json::json;

    #[test]
    fn test_placeholder_players_are_skipped() {
        let raw = vec![
            raw_player(1, 1, "a", Some("2000-01-01")),
            raw_player(2, 1, "u", Some("2000-01-01")),
        ];
        let players = normalize_players(&raw, &LookupTables::default(), 2025).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, 1);
    }

    #[test]
    fn test_unmapped_status_is_kept_with_null_status() {
        let raw = vec![raw_player(7, 1, "s", Some("1999-05-05"))];
        let players = normalize_players(&raw, &LookupTables::default(), 2025).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].status, None);
    }

    #[test]
    fn test_missing_birth_date_drops_player() {
        let raw = vec![
            raw_player(1, 1, "a", None),
            raw_player(2, 1, "i", Some("not-a-date")),
            raw_player(3, 1, "d", Some("1995-11-30")),
        ];
        let players = normalize_players(&raw, &LookupTables::default(), 2025).unwrap();
        assert_eq!(players.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(players[0].age, 30);
        assert_eq!(players[0].status, Some(PlayerStatus::Doubtful));
    }

    #[test]
    fn test_age_uses_reference_year() {
        let raw = vec![raw_player(1, 1, "a", Some("2001-08-14"))];
        let players = normalize_players(&raw, &LookupTables::default(), 2030).unwrap();
        assert_eq!(players[0].age, 29);
    }

    #[test]
    fn test_unknown_ids_resolve_to_none() {
        let mut raw = raw_player(1, 99, "a", Some("2000-01-01"));
        raw["element_type"] = json!(9);
        let players = normalize_players(&[raw], &LookupTables::default(), 2025).unwrap();
        assert_eq!(players[0].team, None);
        assert_eq!(players[0].position, None);
    }

    #[test]
    fn test_null_ids_resolve_to_none() {
        let mut raw = raw_player(1, 1, "a", Some("2000-01-01"));
        raw["team"] = json!(null);
        raw["element_type"] = json!(null);
        let players = normalize_players(&[raw], &LookupTables::default(), 2025).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].team, None);
        assert_eq!(players[0].position, None);
    }

    #[test]
    fn test_non_positive_age_drops_player() {
        let raw = vec![
            raw_player(1, 1, "a", Some("2025-01-01")),
            raw_player(2, 1, "a", Some("2030-06-01")),
            raw_player(3, 1, "a", Some("2024-12-31")),
        ];
        let players = normalize_players(&raw, &LookupTables::default(), 2025).unwrap();
        assert_eq!(players.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(players[0].age, 1);
    }

    #[test]
    fn test_mapped_fields() {
        let raw = vec![raw_player(1, 12, "i", Some("2000-01-01"))];
        let player = &normalize_players(&raw, &LookupTables::default(), 2025).unwrap()[0];
        assert_eq!(player.team.as_deref(), Some("Liverpool"));
        assert_eq!(player.position.as_deref(), Some("MID"));
        assert_eq!(player.status, Some(PlayerStatus::Injured));
        assert_eq!(player.chance_of_playing_next_round, Some(75));
        assert!((player.expected_goals - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_schema_drift_is_reported() {
        let mut raw = raw_player(1, 1, "a", Some("2000-01-01"));
        raw.as_object_mut().unwrap().remove("tackles");
        let err = normalize_players(&[raw], &LookupTables::default(), 2025).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SchemaMismatch { record: "player", ref field } if field == "tackles"
        ));
    }
}
