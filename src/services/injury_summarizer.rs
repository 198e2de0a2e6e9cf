use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::models::{InjuryHeatmap, InjuryReport, InjurySummaryRow};

type ColumnPredicate = fn(&str) -> bool;

// Candidates are tried in order; the first predicate with any matching
// column wins, and among its matches the first-seen column is taken.
const TEAM_COLUMN_CANDIDATES: [ColumnPredicate; 3] =
    [is_team_name, mentions_team_and_name, mentions_team];
const REASON_COLUMN_CANDIDATES: [ColumnPredicate; 3] =
    [is_player_reason, mentions_reason_and_player, mentions_reason];

fn is_team_name(c: &str) -> bool {
    c == "team.name"
}

fn mentions_team_and_name(c: &str) -> bool {
    c.contains("team") && c.contains("name")
}

fn mentions_team(c: &str) -> bool {
    c.contains("team")
}

fn is_player_reason(c: &str) -> bool {
    c == "player.reason"
}

fn mentions_reason_and_player(c: &str) -> bool {
    c.contains("reason") && c.contains("player")
}

fn mentions_reason(c: &str) -> bool {
    c.contains("reason")
}

/// Cross-tabulate historical injuries by team and reason.
///
/// Returns `None` when the dataset has no recognisable team or reason column,
/// or no record carries both; that is the "nothing to show" state, not an
/// error. Ties for "team with most" go to the alphabetically first team.
pub fn summarize_injuries(records: &[Value]) -> Option<InjuryReport> {
    let rows: Vec<Vec<(String, Value)>> = records.iter().filter_map(flatten_record).collect();
    let columns = discover_columns(&rows);

    let Some(team_col) = find_column(&columns, &TEAM_COLUMN_CANDIDATES) else {
        tracing::warn!("Injury dataset has no team column ({} columns seen)", columns.len());
        return None;
    };
    let Some(reason_col) = find_column(&columns, &REASON_COLUMN_CANDIDATES) else {
        tracing::warn!("Injury dataset has no injury reason column");
        return None;
    };
    tracing::debug!("Injury columns: team='{}', reason='{}'", team_col, reason_col);

    // reason -> team -> count
    let mut counts: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
    let mut incomplete = 0usize;
    for row in &rows {
        let team = cell(row, team_col);
        let reason = cell(row, reason_col);
        let (Some(team), Some(reason)) = (team, reason) else {
            incomplete += 1;
            continue;
        };
        *counts.entry(reason).or_default().entry(team).or_insert(0) += 1;
    }

    if counts.is_empty() {
        tracing::warn!("Injury dataset has no complete records");
        return None;
    }

    let summary = summary_rows(&counts);
    let heatmap = heatmap(&counts);
    tracing::info!(
        "Summarized {} injury types across {} teams ({} incomplete records dropped)",
        summary.len(),
        heatmap.teams.len(),
        incomplete
    );
    Some(InjuryReport { summary, heatmap })
}

fn summary_rows(counts: &BTreeMap<String, BTreeMap<String, u32>>) -> Vec<InjurySummaryRow> {
    let mut summary: Vec<InjurySummaryRow> = counts
        .iter()
        .filter_map(|(reason, teams)| {
            let mut best: Option<(&String, u32)> = None;
            for (team, &count) in teams {
                if best.map_or(true, |(_, top)| count > top) {
                    best = Some((team, count));
                }
            }
            best.map(|(team, count)| InjurySummaryRow {
                injury_type: reason.clone(),
                team_with_most: team.clone(),
                count,
            })
        })
        .collect();

    // Stable over reason order, so equal counts stay alphabetical by type.
    summary.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}

fn heatmap(counts: &BTreeMap<String, BTreeMap<String, u32>>) -> InjuryHeatmap {
    let teams: Vec<String> = counts
        .values()
        .flat_map(|teams| teams.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let injury_types: Vec<String> = counts.keys().cloned().collect();

    let matrix = teams
        .iter()
        .map(|team| {
            injury_types
                .iter()
                .map(|reason| counts[reason].get(team).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    InjuryHeatmap {
        teams,
        injury_types,
        counts: matrix,
    }
}

/// Nested objects become dotted columns (`team.name`, `player.reason`).
/// Records that are not objects carry no columns.
fn flatten_record(record: &Value) -> Option<Vec<(String, Value)>> {
    let object = record.as_object()?;
    let mut out = Vec::new();
    flatten_into(object, "", &mut out);
    Some(out)
}

fn flatten_into(object: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in object {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(inner, &column, out),
            _ => out.push((column, value.clone())),
        }
    }
}

/// Column names in first-seen order across all records.
fn discover_columns(rows: &[Vec<(String, Value)>]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for (column, _) in row {
            if seen.insert(column.as_str()) {
                columns.push(column.clone());
            }
        }
    }
    columns
}

fn find_column<'a>(columns: &'a [String], candidates: &[ColumnPredicate]) -> Option<&'a str> {
    candidates.iter().find_map(|predicate| {
        columns
            .iter()
            .find(|c| predicate(&c.to_lowercase()))
            .map(String::as_str)
    })
}

/// Scalar cell as text; null, blank, and nested values count as missing.
fn cell(row: &[(String, Value)], column: &str) -> Option<String> {
    let (_, value) = row.iter().find(|(c, _)| c == column)?;
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_sports_record(team: &str, reason: Option<&str>) -> Value {
        json!({
            "player": {
                "id": 1,
                "name": "Someone",
                "photo": "",
                "type": "Missing Fixture",
                "reason": reason
            },
            "team": {"id": 42, "name": team, "logo": ""},
            "fixture": {"id": 7, "timezone": "UTC", "date": "2021-08-13T19:00:00+00:00"},
            "league": {"id": 39, "season": 2021, "name": "Premier League"}
        })
    }

    #[test]
    fn test_empty_input_has_nothing_to_show() {
        assert!(summarize_injuries(&[]).is_none());
    }

    #[test]
    fn test_flat_records() {
        let records = vec![
            json!({"team": "A", "reason": "Knee"}),
            json!({"team": "A", "reason": "Knee"}),
            json!({"team": "B", "reason": "Knee"}),
        ];
        let report = summarize_injuries(&records).unwrap();
        assert_eq!(
            report.summary,
            vec![InjurySummaryRow {
                injury_type: "Knee".to_string(),
                team_with_most: "A".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_nested_api_sports_records() {
        let records = vec![
            api_sports_record("Arsenal", Some("Hamstring Injury")),
            api_sports_record("Chelsea", Some("Hamstring Injury")),
            api_sports_record("Chelsea", Some("Hamstring Injury")),
            api_sports_record("Arsenal", Some("Illness")),
            api_sports_record("Arsenal", None),
        ];
        let report = summarize_injuries(&records).unwrap();

        assert_eq!(report.summary[0].injury_type, "Hamstring Injury");
        assert_eq!(report.summary[0].team_with_most, "Chelsea");
        assert_eq!(report.summary[0].count, 2);
        assert_eq!(report.summary[1].injury_type, "Illness");

        assert_eq!(report.heatmap.teams, vec!["Arsenal", "Chelsea"]);
        assert_eq!(report.heatmap.injury_types, vec!["Hamstring Injury", "Illness"]);
        assert_eq!(report.heatmap.counts, vec![vec![1, 1], vec![2, 0]]);
    }

    #[test]
    fn test_team_name_column_is_preferred_over_team_id() {
        let records = vec![json!({"team.id": 5, "team_name": "Spurs", "reason": "Ankle"})];
        let report = summarize_injuries(&records).unwrap();
        assert_eq!(report.summary[0].team_with_most, "Spurs");
    }

    #[test]
    fn test_ties_go_to_alphabetically_first_team() {
        let records = vec![
            json!({"team": "Wolves", "reason": "Knee"}),
            json!({"team": "Brentford", "reason": "Knee"}),
        ];
        let report = summarize_injuries(&records).unwrap();
        assert_eq!(report.summary[0].team_with_most, "Brentford");
    }

    #[test]
    fn test_summary_sorted_by_count() {
        let records = vec![
            json!({"team": "A", "reason": "Ankle"}),
            json!({"team": "A", "reason": "Knee"}),
            json!({"team": "B", "reason": "Knee"}),
            json!({"team": "B", "reason": "Knee"}),
            json!({"team": "C", "reason": "Back"}),
        ];
        let report = summarize_injuries(&records).unwrap();
        let order: Vec<_> = report.summary.iter().map(|r| r.injury_type.as_str()).collect();
        assert_eq!(order, vec!["Knee", "Ankle", "Back"]);
    }

    #[test]
    fn test_missing_reason_column() {
        let records = vec![json!({"team": "A", "type": "Knee"})];
        assert!(summarize_injuries(&records).is_none());
    }

    #[test]
    fn test_no_complete_rows() {
        let records = vec![
            json!({"team": "A", "reason": null}),
            json!({"team": null, "reason": "Knee"}),
        ];
        assert!(summarize_injuries(&records).is_none());
    }
}
