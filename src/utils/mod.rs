use crate::models::MatchOutcome;

/// Convert a chronological result sequence to a form string (e.g., "WLWDW"),
/// most recent first.
pub fn results_to_form(results: &[MatchOutcome]) -> String {
    results.iter().rev().take(5).map(|r| r.as_char()).collect()
}

/// Calculate win percentage from wins, draws, and losses
pub fn calculate_win_percentage(wins: u32, draws: u32, losses: u32) -> f64 {
    let total_games = wins + losses + draws;
    if total_games == 0 {
        return 0.0;
    }

    let points = wins * 3 + draws; // Football scoring
    (points as f64) / ((total_games * 3) as f64) * 100.0
}

/// "total_goals_for" -> "Total Goals For"
pub fn column_label(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Closest candidate by normalized Levenshtein similarity, case-insensitive.
pub fn closest_name<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let query = query.to_lowercase();
    candidates
        .into_iter()
        .map(|c| (c, strsim::normalized_levenshtein(&query, &c.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
