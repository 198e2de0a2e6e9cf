//! Raw upstream records shaped like the FPL payloads, for unit tests.

use serde_json::{json, Value};

pub fn raw_player(id: u32, team: u32, status: &str, birth_date: Option<&str>) -> Value {
    json!({
        "id": id,
        "first_name": "Test",
        "second_name": format!("Player{}", id),
        "web_name": format!("P{}", id),
        "team": team,
        "element_type": 3,
        "status": status,
        "news": "",
        "chance_of_playing_this_round": null,
        "chance_of_playing_next_round": 75,
        "minutes": 900,
        "starts": 10,
        "goals_scored": 2,
        "assists": 1,
        "saves": 0,
        "yellow_cards": 1,
        "red_cards": 0,
        "tackles": 12,
        "recoveries": 30,
        "clearances_blocks_interceptions": 8,
        "defensive_contribution": 45,
        "defensive_contribution_per_90": 4.5,
        "expected_goals": "1.80",
        "expected_assists": "0.90",
        "expected_goal_involvements": "2.70",
        "birth_date": birth_date,
        "team_join_date": "2023-07-01",
        "now_cost": 55,
        "selected_by_percent": "3.2"
    })
}

pub fn raw_fixture(
    team_h: u32,
    team_a: u32,
    scores: Option<(u32, u32)>,
    kickoff: Option<&str>,
) -> Value {
    json!({
        "code": 2561895,
        "event": 1,
        "finished": scores.is_some(),
        "id": 1,
        "kickoff_time": kickoff,
        "minutes": 90,
        "started": scores.is_some(),
        "team_a": team_a,
        "team_a_score": scores.map(|s| s.1),
        "team_h": team_h,
        "team_h_score": scores.map(|s| s.0),
        "stats": []
    })
}
