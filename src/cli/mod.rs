use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::config::Config;
use crate::services::{
    load_dataset, run_pipeline, team_dashboard, LiveFetcher, SnapshotSource, StatMode, Tables,
};
use crate::utils::closest_name;

/// Where the raw upstream payloads are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Fetch from the FPL and api-sports endpoints
    Live,
    /// Replay payloads saved by the `snapshot` command
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

pub async fn load_tables(source: SourceKind, config: &Config) -> Result<Tables> {
    let raw = match source {
        SourceKind::Live => load_dataset(&LiveFetcher::new(config)).await,
        SourceKind::Snapshot => {
            load_dataset(&SnapshotSource::new(config.snapshot_dir.clone())).await
        }
    }
    .context("Failed to load upstream data")?;

    run_pipeline(&raw, config).context("Upstream data did not match the expected schema")
}

pub async fn save_snapshot(config: &Config) -> Result<()> {
    println!("📥 Fetching live data...");
    let raw = load_dataset(&LiveFetcher::new(config))
        .await
        .context("Failed to fetch live data")?;

    SnapshotSource::save(&config.snapshot_dir, &raw)?;
    println!(
        "✅ Saved {} players, {} fixtures and {} injury records to {}",
        raw.general.players.len(),
        raw.fixtures.len(),
        raw.injuries.len(),
        config.snapshot_dir.display()
    );
    Ok(())
}

pub fn print_report(tables: &Tables) {
    println!("⚽ Premier League overview\n");
    println!(
        "{:<16} {:>4} {:>4} {:>4} {:>6} {:>6}  {:<5} {:>6}",
        "Team", "GF", "GA", "P", "Tkl", "Inj", "Form", "Win%"
    );
    for team in &tables.teams {
        println!(
            "{:<16} {:>4} {:>4} {:>4} {:>6} {:>6}  {:<5} {:>5.1}%",
            team.stats.team,
            team.total_goals_for,
            team.total_goals_against,
            team.results_list.len(),
            team.stats.tackles,
            team.stats.injured,
            team.form,
            team.win_percentage
        );
    }

    println!("\n🩹 Historical injuries:");
    match &tables.injuries {
        Some(report) => {
            for row in &report.summary {
                println!("   • {}: {} ({})", row.injury_type, row.team_with_most, row.count);
            }
        }
        None => println!("   No historical injury data available"),
    }
}

pub fn query_team(tables: &Tables, team_name: &str) {
    println!("🔍 Searching for team: {}", team_name);

    let exact = tables
        .teams
        .iter()
        .find(|t| t.stats.team.eq_ignore_ascii_case(team_name));
    let team = match exact {
        Some(team) => team,
        None => {
            let names = tables.teams.iter().map(|t| t.stats.team.as_str());
            match closest_name(team_name, names).and_then(|name| tables.team(name)) {
                Some(team) => {
                    println!("💡 Closest match: {}", team.stats.team);
                    team
                }
                None => {
                    println!("❌ No teams found matching '{}'", team_name);
                    println!("\n💡 Available teams:");
                    for team in &tables.teams {
                        println!("   • {}", team.stats.team);
                    }
                    return;
                }
            }
        }
    };

    for mode in [StatMode::Defense, StatMode::Attack] {
        let dashboard = team_dashboard(team, mode);
        println!("\n📊 {}", dashboard.title);
        for point in &dashboard.stats {
            println!("   {:<34} {}", point.stat, point.count);
        }
    }

    println!("\n📅 Results:");
    let results: String = team.results_list.iter().map(|r| r.as_char()).collect();
    println!("   Season: {}", if results.is_empty() { "-" } else { results.as_str() });
    println!("   Form:   {}", if team.form.is_empty() { "-" } else { team.form.as_str() });
    println!("   Win %:  {:.1}", team.win_percentage);

    println!("\n🏥 {}", team_dashboard(team, StatMode::Defense).summary);
}

pub fn export(tables: &Tables, format: ExportFormat, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let heatmap_rows = tables.injuries.as_ref().map(|r| r.heatmap.rows());
    let summary = tables.injuries.as_ref().map(|r| &r.summary);

    match format {
        ExportFormat::Csv => {
            write_csv(&out.join("players.csv"), &tables.players)?;
            write_csv(&out.join("teams.csv"), &tables.teams)?;
            if let (Some(summary), Some(rows)) = (summary, &heatmap_rows) {
                write_csv(&out.join("injury_summary.csv"), summary)?;
                write_csv(&out.join("injury_heatmap.csv"), rows)?;
            }
        }
        ExportFormat::Json => {
            write_json(&out.join("players.json"), &tables.players)?;
            write_json(&out.join("teams.json"), &tables.teams)?;
            if let (Some(summary), Some(rows)) = (summary, &heatmap_rows) {
                write_json(&out.join("injury_summary.json"), summary)?;
                write_json(&out.join("injury_heatmap.json"), rows)?;
            }
        }
    }

    if tables.injuries.is_none() {
        tracing::warn!("No injury data; injury tables were not exported");
    }
    println!("✅ Exported tables to {}", out.display());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, rows: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

/// Rows are written in field order; the first row decides the header.
fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for (i, row) in rows.iter().enumerate() {
        let Value::Object(fields) = serde_json::to_value(row)? else {
            anyhow::bail!("{} rows must serialize to objects", path.display());
        };
        if i == 0 {
            writer.write_record(fields.keys())?;
        }
        writer.write_record(fields.values().map(cell_text))?;
    }

    writer.flush()?;
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        // results_list: ["W", "D"] -> "WD"
        Value::Array(items) => items.iter().map(cell_text).collect(),
        other => other.to_string(),
    }
}
