//! FRED API integration (flat, date-indexed series).

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::data::source::SeriesSource;
use crate::domain::{Period, RawObservation, Reducer, SeriesId, SourceKind, TimeWindow};
use crate::error::{AppError, FetchError};
use crate::series::annualize;

const OBSERVATIONS_PATH: &str = "/series/observations";
const OBS_LIMIT: usize = 100_000;

pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build from configuration; fails when `FRED_API_KEY` is missing.
    pub fn from_config(config: &Config, client: Client) -> Result<Self, AppError> {
        let api_key = config
            .fred_api_key
            .clone()
            .ok_or_else(|| AppError::usage("Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self::new(client, config.fred_base_url.clone(), api_key))
    }

    /// Daily/monthly observations for `code` within the window's calendar years.
    pub fn fetch_observations(&self, code: &str, window: TimeWindow) -> Result<Vec<(NaiveDate, f64)>, FetchError> {
        let start = format!("{:04}-01-01", window.start);
        let end = format!("{:04}-12-31", window.end);
        let limit = OBS_LIMIT.to_string();
        let url = format!("{}{OBSERVATIONS_PATH}", self.base_url);

        tracing::debug!(code, %window, "FRED request");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("series_id", code),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .map_err(|e| FetchError::unavailable(SourceKind::Fred, strip_api_key(&e.to_string(), &self.api_key)))?;

        let status = resp.status();
        if !status.is_success() {
            // FRED reports query errors (unknown series, bad key) as JSON.
            let detail = resp
                .json::<ErrorResponse>()
                .ok()
                .and_then(|e| e.error_message)
                .map(|m| format!(": {m}"))
                .unwrap_or_default();
            return Err(FetchError::unavailable(SourceKind::Fred, format!("status {status}{detail}")));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| FetchError::unavailable(SourceKind::Fred, format!("failed to parse response: {e}")))?;

        let mut out = Vec::with_capacity(body.observations.len());
        for obs in body.observations {
            let Some(value) = parse_value(&obs.value) else {
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(obs.date.trim(), "%Y-%m-%d") else {
                tracing::debug!(code, date = %obs.date, "skipping FRED row with invalid date");
                continue;
            };
            out.push((date, value));
        }

        Ok(out)
    }
}

impl SeriesSource for FredClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Fred
    }

    fn fetch_raw(&self, id: &SeriesId, window: TimeWindow) -> Result<RawObservation, FetchError> {
        let (code, reducer): (&str, Reducer) = match id {
            SeriesId::Fred { code, reducer } if !code.trim().is_empty() => (code.trim(), *reducer),
            other => return Err(FetchError::InvalidIdentifier(format!("{other} is not a FRED series"))),
        };

        let obs = self.fetch_observations(code, window)?;
        let rows = annualize(&obs, reducer)
            .into_iter()
            .map(|(year, value)| (Period::Year(year), value))
            .collect();
        Ok(RawObservation::Series(rows))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: Option<String>,
}

/// FRED encodes missing values as `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// reqwest errors embed the request URL, which carries the key.
fn strip_api_key(message: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        message.to_string()
    } else {
        message.replace(api_key, "***")
    }
}
