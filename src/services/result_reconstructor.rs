use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{FixtureRecord, MatchOutcome, TeamRecord, TeamResult};
use crate::utils::{calculate_win_percentage, results_to_form};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Venue {
    Home,
    Away,
}

/// One played fixture seen from one team's side.
#[derive(Debug, Clone, Copy)]
struct Appearance {
    date: Option<NaiveDate>,
    venue: Venue,
    goals_for: u32,
    goals_against: u32,
}

/// Rebuild per-team results from the fixture list and merge them onto the
/// team aggregates.
///
/// Fixtures without both scores have not been played and are left out of the
/// goal totals, the result sequence, and the home/away breakdowns. Every
/// aggregated team is kept; teams with no played fixtures get zeros.
pub fn reconstruct_results(fixtures: &[FixtureRecord], teams: &[TeamRecord]) -> Vec<TeamResult> {
    let mut appearances: HashMap<&str, Vec<Appearance>> = HashMap::new();
    let mut unplayed = 0usize;

    for fixture in fixtures {
        let Some((home_score, away_score)) = fixture.scores() else {
            unplayed += 1;
            continue;
        };
        appearances.entry(fixture.team_h.as_str()).or_default().push(Appearance {
            date: fixture.date,
            venue: Venue::Home,
            goals_for: home_score,
            goals_against: away_score,
        });
        appearances.entry(fixture.team_a.as_str()).or_default().push(Appearance {
            date: fixture.date,
            venue: Venue::Away,
            goals_for: away_score,
            goals_against: home_score,
        });
    }

    let results: Vec<TeamResult> = teams
        .iter()
        .map(|team| {
            let played = appearances
                .get(team.team.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            team_result(team, played)
        })
        .collect();

    tracing::info!(
        "Reconstructed results for {} teams ({} unplayed fixtures excluded)",
        results.len(),
        unplayed
    );
    results
}

fn team_result(team: &TeamRecord, played: &[Appearance]) -> TeamResult {
    let mut chronological = played.to_vec();
    // Stable: same-day fixtures keep list order; undated ones go last.
    chronological.sort_by_key(|a| (a.date.is_none(), a.date));

    let mut result = TeamResult {
        stats: team.clone(),
        total_goals_for: 0,
        total_goals_against: 0,
        results_list: Vec::with_capacity(chronological.len()),
        home_wins: 0,
        home_losses: 0,
        home_draws: 0,
        away_wins: 0,
        away_losses: 0,
        away_draws: 0,
        form: String::new(),
        win_percentage: 0.0,
    };

    for appearance in &chronological {
        result.total_goals_for += appearance.goals_for;
        result.total_goals_against += appearance.goals_against;

        let outcome = MatchOutcome::from_scores(appearance.goals_for, appearance.goals_against);
        result.results_list.push(outcome);

        let counter = match (appearance.venue, outcome) {
            (Venue::Home, MatchOutcome::Win) => &mut result.home_wins,
            (Venue::Home, MatchOutcome::Loss) => &mut result.home_losses,
            (Venue::Home, MatchOutcome::Draw) => &mut result.home_draws,
            (Venue::Away, MatchOutcome::Win) => &mut result.away_wins,
            (Venue::Away, MatchOutcome::Loss) => &mut result.away_losses,
            (Venue::Away, MatchOutcome::Draw) => &mut result.away_draws,
        };
        *counter += 1;
    }

    result.form = results_to_form(&result.results_list);
    result.win_percentage = calculate_win_percentage(
        result.home_wins + result.away_wins,
        result.home_draws + result.away_draws,
        result.home_losses + result.away_losses,
    );
    result
}
