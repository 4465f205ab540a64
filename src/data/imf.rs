//! IMF SDMX data service integration (SDMX-JSON data messages).
//!
//! A data query returns one or more series. Each observation is identified by
//! the series dimension values plus the time period, so the adapter returns
//! `RawObservation::MultiIndexed` rows shaped like `[REF_AREA, INDICATOR, FREQ, period]`.
//!
//! Both the 1.0 layout (`dataSets` + `structure` at the top level) and the 2.0
//! layout (everything under `data`, `structures` as an array) are accepted.

use std::collections::HashMap;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::config::Config;
use crate::data::source::SeriesSource;
use crate::domain::{RawObservation, SeriesId, SourceKind, TimeWindow};
use crate::error::FetchError;

const SDMX_JSON: &str = "application/vnd.sdmx.data+json;version=1.0.0, application/json;q=0.9";

pub struct ImfClient {
    client: Client,
    base_url: String,
}

impl ImfClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(client, config.imf_base_url.clone())
    }

    fn fetch_message(&self, dataset: &str, key: &str, window: TimeWindow) -> Result<DataMessage, FetchError> {
        let url = format!("{}/data/{dataset}/{key}", self.base_url);
        let start = window.start.to_string();
        let end = window.end.to_string();

        tracing::debug!(dataset, key, %window, "IMF request");
        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, SDMX_JSON)
            .query(&[("startPeriod", start.as_str()), ("endPeriod", end.as_str())])
            .send()
            .map_err(|e| FetchError::unavailable(SourceKind::Imf, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::unavailable(SourceKind::Imf, format!("status {status}")));
        }

        resp.json()
            .map_err(|e| FetchError::unavailable(SourceKind::Imf, format!("failed to parse SDMX-JSON: {e}")))
    }
}

impl SeriesSource for ImfClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Imf
    }

    fn fetch_raw(&self, id: &SeriesId, window: TimeWindow) -> Result<RawObservation, FetchError> {
        let (dataset, key) = match id {
            SeriesId::Imf { dataset, key } if !dataset.trim().is_empty() && !key.trim().is_empty() => {
                (dataset.trim(), key.trim())
            }
            other => return Err(FetchError::InvalidIdentifier(format!("{other} is not an IMF series"))),
        };

        let message = self.fetch_message(dataset, key, window)?;
        let rows = flatten_message(message)?;

        // Point query: squeeze a lone observation to a scalar.
        if window.is_point() && rows.len() == 1 {
            return Ok(RawObservation::Scalar(rows[0].1));
        }
        Ok(RawObservation::MultiIndexed(rows))
    }
}

#[derive(Debug, Deserialize)]
struct DataMessage {
    #[serde(default)]
    data: Option<DataBody>,
    #[serde(rename = "dataSets", default)]
    data_sets: Vec<DataSet>,
    #[serde(default)]
    structure: Option<Structure>,
}

#[derive(Debug, Deserialize)]
struct DataBody {
    #[serde(rename = "dataSets", default)]
    data_sets: Vec<DataSet>,
    #[serde(default)]
    structure: Option<Structure>,
    #[serde(default)]
    structures: Vec<Structure>,
}

#[derive(Debug, Deserialize)]
struct Structure {
    dimensions: Dimensions,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    #[serde(default)]
    series: Vec<Dimension>,
    #[serde(default)]
    observation: Vec<Dimension>,
}

#[derive(Debug, Deserialize)]
struct Dimension {
    #[serde(default)]
    values: Vec<DimensionValue>,
}

#[derive(Debug, Deserialize)]
struct DimensionValue {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DataSet {
    #[serde(default)]
    series: HashMap<String, SeriesEntry>,
    /// Flat layout: observation keys carry every dimension.
    #[serde(default)]
    observations: HashMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SeriesEntry {
    #[serde(default)]
    observations: HashMap<String, Vec<serde_json::Value>>,
}

/// Resolve dimension indexes into `(key parts, value)` rows.
///
/// Rows are ordered by series key, then observation position. Observations
/// whose value is null or not numeric are skipped.
fn flatten_message(message: DataMessage) -> Result<Vec<(Vec<String>, f64)>, FetchError> {
    let (data_sets, structure) = match message.data {
        Some(body) => {
            let structure = body.structure.or_else(|| body.structures.into_iter().next());
            (body.data_sets, structure)
        }
        None => (message.data_sets, message.structure),
    };

    let structure =
        structure.ok_or_else(|| FetchError::unavailable(SourceKind::Imf, "SDMX-JSON message has no structure"))?;
    let series_dims = &structure.dimensions.series;
    let obs_dims = &structure.dimensions.observation;

    let mut keyed: Vec<(Vec<usize>, Vec<String>, f64)> = Vec::new();

    for data_set in data_sets {
        for (series_key, entry) in data_set.series {
            let Some(series_idx) = parse_key(&series_key) else {
                continue;
            };
            let Some(series_parts) = resolve(series_dims, &series_idx) else {
                continue;
            };
            for (obs_key, obs) in entry.observations {
                let Some(obs_idx) = parse_key(&obs_key) else {
                    continue;
                };
                let (Some(obs_parts), Some(value)) = (resolve(obs_dims, &obs_idx), observation_value(&obs)) else {
                    continue;
                };
                let mut order = series_idx.clone();
                order.extend(&obs_idx);
                let mut parts = series_parts.clone();
                parts.extend(obs_parts);
                keyed.push((order, parts, value));
            }
        }

        for (obs_key, obs) in data_set.observations {
            let Some(obs_idx) = parse_key(&obs_key) else {
                continue;
            };
            let (Some(parts), Some(value)) = (resolve(obs_dims, &obs_idx), observation_value(&obs)) else {
                continue;
            };
            keyed.push((obs_idx, parts, value));
        }
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, parts, value)| (parts, value)).collect())
}

/// `"0:1:0"` -> `[0, 1, 0]`.
fn parse_key(key: &str) -> Option<Vec<usize>> {
    key.split(':').map(|p| p.trim().parse().ok()).collect()
}

fn resolve(dims: &[Dimension], idx: &[usize]) -> Option<Vec<String>> {
    if dims.len() != idx.len() {
        return None;
    }
    dims.iter()
        .zip(idx)
        .map(|(dim, &i)| dim.values.get(i).map(|v| v.id.clone()))
        .collect()
}

fn observation_value(obs: &[serde_json::Value]) -> Option<f64> {
    let v = match obs.first()? {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}
