use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::config::LookupTables;
use crate::error::PipelineError;
use crate::models::FixtureRecord;
use crate::services::fields::{optional_str, optional_u32, require_bool, require_u32};

const RECORD: &str = "fixture";

pub fn normalize_fixtures(
    raw_fixtures: &[Value],
    lookups: &LookupTables,
) -> Result<Vec<FixtureRecord>, PipelineError> {
    let fixtures = raw_fixtures
        .iter()
        .map(|raw| normalize_fixture(raw, lookups))
        .collect::<Result<Vec<_>, _>>()?;

    let played = fixtures.iter().filter(|f| f.scores().is_some()).count();
    tracing::info!("Normalized {} fixtures ({} with scores)", fixtures.len(), played);
    Ok(fixtures)
}

fn normalize_fixture(raw: &Value, lookups: &LookupTables) -> Result<FixtureRecord, PipelineError> {
    let event = optional_u32(raw, RECORD, "event")?.map(|n| format!("Gameweek {}", n));

    Ok(FixtureRecord {
        event,
        finished: require_bool(raw, RECORD, "finished")?,
        team_a: team_label(require_u32(raw, RECORD, "team_a")?, lookups),
        team_a_score: optional_u32(raw, RECORD, "team_a_score")?,
        team_h: team_label(require_u32(raw, RECORD, "team_h")?, lookups),
        team_h_score: optional_u32(raw, RECORD, "team_h_score")?,
        date: optional_str(raw, RECORD, "kickoff_time")?.and_then(kickoff_date),
    })
}

/// Unlisted teams keep their numeric id as the name.
fn team_label(id: u32, lookups: &LookupTables) -> String {
    match lookups.team_name(id) {
        Some(name) => name.to_string(),
        None => {
            tracing::debug!("Fixture references unknown team id {}", id);
            id.to_string()
        }
    }
}

fn kickoff_date(kickoff: &str) -> Option<NaiveDate> {
    match DateTime::parse_from_rfc3339(kickoff) {
        Ok(d) => Some(d.with_timezone(&Utc).date_naive()),
        Err(e) => {
            tracing::warn!("Bad kickoff time '{}': {}", kickoff, e);
            None
        }
    }
}
