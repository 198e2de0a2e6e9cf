use std::path::{Path, PathBuf};

use reqwest::Client;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::SourceError;

const FPL_BOOTSTRAP_URL: &str = "https://fantasy.premierleague.com/api/bootstrap-static/";
const FPL_FIXTURES_URL: &str = "https://fantasy.premierleague.com/api/fixtures/";
const INJURIES_URL: &str = "https://v3.football.api-sports.io/injuries";

const BOOTSTRAP_FILE: &str = "bootstrap-static.json";
const FIXTURES_FILE: &str = "fixtures.json";
const INJURIES_FILE: &str = "injuries.json";

/// Players, teams and positions from the FPL bootstrap payload.
#[derive(Debug, Clone, Default)]
pub struct GeneralInformation {
    pub players: Vec<Value>,
    pub teams: Vec<Value>,
    pub positions: Vec<Value>,
}

/// Everything the pipeline consumes, as fetched.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub general: GeneralInformation,
    pub fixtures: Vec<Value>,
    pub injuries: Vec<Value>,
}

/// Where upstream records come from. The caller picks an implementation;
/// nothing here falls back from one to the other.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn general_information(&self) -> Result<GeneralInformation, SourceError>;
    async fn fixtures(&self) -> Result<Vec<Value>, SourceError>;
    /// Historical injuries; empty when the source has none to offer.
    async fn injuries(&self) -> Result<Vec<Value>, SourceError>;
}

/// Player and fixture failures are fatal. Injury failures degrade to an empty
/// list, which the pipeline reports as "no injury data".
pub async fn load_dataset<S: DataSource>(source: &S) -> Result<RawDataset, SourceError> {
    let general = source.general_information().await?;
    let fixtures = source.fixtures().await?;
    let injuries = match source.injuries().await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Injury data unavailable, continuing without it: {}", e);
            Vec::new()
        }
    };

    tracing::info!(
        "Loaded {} players, {} teams, {} positions, {} fixtures, {} injury records",
        general.players.len(),
        general.teams.len(),
        general.positions.len(),
        fixtures.len(),
        injuries.len()
    );
    Ok(RawDataset {
        general,
        fixtures,
        injuries,
    })
}

fn parse_bootstrap(payload: Value) -> Result<GeneralInformation, SourceError> {
    let take = |key: &str| match payload.get(key) {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => Err(SourceError::Shape(format!("bootstrap payload has no `{}` array", key))),
    };
    Ok(GeneralInformation {
        players: take("elements")?,
        teams: take("teams")?,
        positions: take("element_types")?,
    })
}

fn parse_fixtures(payload: Value) -> Result<Vec<Value>, SourceError> {
    match payload {
        Value::Array(items) => Ok(items),
        _ => Err(SourceError::Shape("fixtures payload is not an array".to_string())),
    }
}

/// api-sports wraps records in `{"response": [...]}`; saved copies are
/// sometimes the bare list.
fn parse_injuries(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("response") {
            Some(Value::Array(items)) => items,
            _ => {
                if let Some(errors) = object.get("errors").filter(|e| !is_empty_json(e)) {
                    tracing::warn!("Injuries API reported errors: {}", errors);
                }
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

// ── Live fetch ──────────────────────────────────────────────────────────────

pub struct LiveFetcher {
    client: Client,
    injury_api_key: Option<String>,
    injury_league: u32,
    injury_season: u32,
}

impl LiveFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            injury_api_key: config.injury_api_key.clone(),
            injury_league: config.injury_league,
            injury_season: config.injury_season,
        }
    }

    async fn get_json(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<Value, SourceError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Upstream {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl DataSource for LiveFetcher {
    async fn general_information(&self) -> Result<GeneralInformation, SourceError> {
        tracing::info!("Fetching FPL bootstrap data…");
        let payload = self
            .get_json(self.client.get(FPL_BOOTSTRAP_URL), "bootstrap-static")
            .await?;
        parse_bootstrap(payload)
    }

    async fn fixtures(&self) -> Result<Vec<Value>, SourceError> {
        tracing::info!("Fetching FPL fixtures…");
        let payload = self.get_json(self.client.get(FPL_FIXTURES_URL), "fixtures").await?;
        parse_fixtures(payload)
    }

    async fn injuries(&self) -> Result<Vec<Value>, SourceError> {
        let Some(api_key) = self.injury_api_key.as_ref() else {
            tracing::warn!("API_KEY not set, skipping historical injuries");
            return Ok(Vec::new());
        };

        tracing::info!(
            "Fetching injuries for league {} season {}…",
            self.injury_league,
            self.injury_season
        );
        let request = self
            .client
            .get(INJURIES_URL)
            .header("x-apisports-key", api_key)
            .query(&[("league", self.injury_league), ("season", self.injury_season)]);
        let payload = self.get_json(request, "injuries").await?;
        Ok(parse_injuries(payload))
    }
}

// ── Snapshot replay ─────────────────────────────────────────────────────────

/// Replays payloads saved by [`SnapshotSource::save`].
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, file: &str) -> Result<Value, SourceError> {
        let path = self.dir.join(file);
        let raw = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SourceError::Json { path, source })
    }

    /// Write a fetched dataset in the layout `SnapshotSource` reads back.
    pub fn save(dir: &Path, dataset: &RawDataset) -> Result<(), SourceError> {
        std::fs::create_dir_all(dir).map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let bootstrap = json!({
            "elements": dataset.general.players,
            "teams": dataset.general.teams,
            "element_types": dataset.general.positions,
        });
        write_json(&dir.join(BOOTSTRAP_FILE), &bootstrap)?;
        write_json(&dir.join(FIXTURES_FILE), &Value::Array(dataset.fixtures.clone()))?;
        write_json(
            &dir.join(INJURIES_FILE),
            &json!({ "response": dataset.injuries }),
        )?;

        tracing::info!("Snapshot written to {}", dir.display());
        Ok(())
    }
}

fn write_json(path: &Path, value: &Value) -> Result<(), SourceError> {
    let body = serde_json::to_string_pretty(value).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl DataSource for SnapshotSource {
    async fn general_information(&self) -> Result<GeneralInformation, SourceError> {
        parse_bootstrap(self.read(BOOTSTRAP_FILE)?)
    }

    async fn fixtures(&self) -> Result<Vec<Value>, SourceError> {
        parse_fixtures(self.read(FIXTURES_FILE)?)
    }

    async fn injuries(&self) -> Result<Vec<Value>, SourceError> {
        if !self.dir.join(INJURIES_FILE).exists() {
            tracing::warn!("No {} in snapshot {}", INJURIES_FILE, self.dir.display());
            return Ok(Vec::new());
        }
        Ok(parse_injuries(self.read(INJURIES_FILE)?))
    }
}
