//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - loaded from a JSON catalog (`Indicator`, `SeriesId`)
//! - used as cache keys (`SeriesId`, `TimeWindow`)
//! - passed between the source adapters, the normalizer and the front-ends

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Calendar year.
pub type Year = i32;

/// Upstream data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// IMF SDMX data service.
    Imf,
    /// FRED time-series API.
    Fred,
}

impl SourceKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SourceKind::Imf => "IMF",
            SourceKind::Fred => "FRED",
        }
    }

    /// Short hint appended to "not configured" messages. Only FRED needs a credential.
    pub fn config_hint(self) -> &'static str {
        match self {
            SourceKind::Fred => " (set FRED_API_KEY)",
            SourceKind::Imf => "",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

/// How sub-annual observations collapse into one value per year.
///
/// The two are not interchangeable: a daily oil price series averaged over the
/// year and the same series sampled at year-end are different numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Last observation of the year (by date).
    Last,
    /// Arithmetic mean of the year's observations.
    #[default]
    Mean,
}

impl Reducer {
    pub fn display_name(self) -> &'static str {
        match self {
            Reducer::Last => "last",
            Reducer::Mean => "mean",
        }
    }
}

/// Source-specific key for one indicator.
///
/// The FRED reducer is part of the identifier so a year-end and an annual-mean
/// view of the same code never share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SeriesId {
    /// SDMX dataflow + dimension key, e.g. `WEO` / `G001.POILBRE.A`.
    Imf { dataset: String, key: String },
    /// FRED series code, e.g. `FEDFUNDS`.
    Fred {
        code: String,
        #[serde(default)]
        reducer: Reducer,
    },
}

impl SeriesId {
    pub fn imf(dataset: impl Into<String>, key: impl Into<String>) -> Self {
        SeriesId::Imf {
            dataset: dataset.into(),
            key: key.into(),
        }
    }

    pub fn fred(code: impl Into<String>, reducer: Reducer) -> Self {
        SeriesId::Fred {
            code: code.into(),
            reducer,
        }
    }

    pub fn source(&self) -> SourceKind {
        match self {
            SeriesId::Imf { .. } => SourceKind::Imf,
            SeriesId::Fred { .. } => SourceKind::Fred,
        }
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesId::Imf { dataset, key } => write!(f, "{dataset}/{key}"),
            SeriesId::Fred { code, reducer } => write!(f, "{code} ({})", reducer.display_name()),
        }
    }
}

/// Closed year range `[start, end]`.
///
/// `start <= end` is not enforced; a reversed window contains no years and
/// every fetch for it resolves to no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Year,
    pub end: Year,
}

impl TimeWindow {
    pub fn new(start: Year, end: Year) -> Self {
        Self { start, end }
    }

    /// Single-year window (point query).
    pub fn point(year: Year) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, year: Year) -> bool {
        self.start <= year && year <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Period component of one raw observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Period {
    /// Already an integer year.
    Year(Year),
    /// Date or reporting-period string (`2020`, `2020-03-31`, `2020-Q1`, ...).
    Text(String),
}

impl From<Year> for Period {
    fn from(year: Year) -> Self {
        Period::Year(year)
    }
}

impl From<&str> for Period {
    fn from(text: &str) -> Self {
        Period::Text(text.to_string())
    }
}

/// Source-native result of one fetch, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawObservation {
    /// No usable data.
    #[default]
    Absent,
    /// Single value from a point query.
    Scalar(f64),
    /// `(period, value)` rows.
    Series(Vec<(Period, f64)>),
    /// `(key parts, value)` rows; the last key part is the period.
    MultiIndexed(Vec<(Vec<String>, f64)>),
}

impl RawObservation {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawObservation::Absent)
    }

    /// Number of observations carried (0 for `Absent`).
    pub fn len(&self) -> usize {
        match self {
            RawObservation::Absent => 0,
            RawObservation::Scalar(_) => 1,
            RawObservation::Series(rows) => rows.len(),
            RawObservation::MultiIndexed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized annual series: year -> value, ascending by year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalSeries {
    points: BTreeMap<Year, f64>,
}

impl CanonicalSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point; an existing value for the same year is replaced.
    pub fn insert(&mut self, year: Year, value: f64) {
        self.points.insert(year, value);
    }

    pub fn get(&self, year: Year) -> Option<f64> {
        self.points.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        self.points.iter().map(|(&y, &v)| (y, v))
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.points.keys().copied()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.points.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.points.keys().next_back().copied()
    }
}

impl FromIterator<(Year, f64)> for CanonicalSeries {
    fn from_iter<I: IntoIterator<Item = (Year, f64)>>(iter: I) -> Self {
        let mut series = CanonicalSeries::new();
        for (year, value) in iter {
            series.insert(year, value);
        }
        series
    }
}

/// One named column of a `CombinedTable`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub series: CanonicalSeries,
}

/// Year-aligned, multi-indicator table.
///
/// Columns keep selection order. The year axis is the ascending union of the
/// years of every column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    columns: Vec<Column>,
}

impl CombinedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column; a column with the same name is replaced in place.
    pub fn push_column(&mut self, name: impl Into<String>, series: CanonicalSeries) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.series = series,
            None => self.columns.push(Column { name, series }),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&CanonicalSeries> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.series)
    }

    /// No columns at all (every selected indicator was absent).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Ascending union of all column years.
    pub fn years(&self) -> Vec<Year> {
        let mut years: Vec<Year> = self.columns.iter().flat_map(|c| c.series.years()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Cell value; `None` when the indicator has no observation for `year`.
    pub fn value(&self, name: &str, year: Year) -> Option<f64> {
        self.column(name).and_then(|s| s.get(year))
    }

    /// Rows in year order, one cell per column.
    pub fn rows(&self) -> Vec<(Year, Vec<Option<f64>>)> {
        self.years()
            .into_iter()
            .map(|year| {
                let cells = self.columns.iter().map(|c| c.series.get(year)).collect();
                (year, cells)
            })
            .collect()
    }

    /// Min/max over every populated cell.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for (_, v) in self.columns.iter().flat_map(|c| c.series.iter()) {
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        range
    }
}

/// One catalog entry: a display name bound to a source-specific identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    #[serde(flatten)]
    pub id: SeriesId,
    /// Optional unit label shown next to values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Indicator {
    pub fn new(name: impl Into<String>, id: SeriesId) -> Self {
        Self {
            name: name.into(),
            id,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Chart style used by the front-ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    pub fn toggle(self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_contains_both_endpoints() {
        let w = TimeWindow::new(2015, 2025);
        assert!(w.contains(2015));
        assert!(w.contains(2025));
        assert!(!w.contains(2026));
        assert!(!w.is_empty());
        assert!(TimeWindow::new(2025, 2015).is_empty());
        assert_eq!(TimeWindow::point(2024).to_string(), "2024");
        assert_eq!(w.to_string(), "2015-2025");
    }

    #[test]
    fn canonical_series_iterates_ascending_and_last_write_wins() {
        let s: CanonicalSeries = vec![(2022, 3.0), (2020, 1.0), (2022, 4.0)].into_iter().collect();
        let pts: Vec<_> = s.iter().collect();
        assert_eq!(pts, vec![(2020, 1.0), (2022, 4.0)]);
        assert_eq!(s.first_year(), Some(2020));
        assert_eq!(s.last_year(), Some(2022));
    }

    #[test]
    fn push_column_replaces_same_name_in_place() {
        let mut t = CombinedTable::new();
        t.push_column("A", [(2020, 1.0)].into_iter().collect());
        t.push_column("B", [(2021, 2.0)].into_iter().collect());
        t.push_column("A", [(2019, 9.0)].into_iter().collect());

        let names: Vec<_> = t.column_names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(t.value("A", 2019), Some(9.0));
        assert_eq!(t.value("A", 2020), None);
        assert_eq!(t.years(), vec![2019, 2021]);
        assert_eq!(t.value_range(), Some((2.0, 9.0)));
    }

    #[test]
    fn indicator_json_uses_source_tag() {
        let json = r#"[
            {"name": "Brent", "source": "imf", "dataset": "WEO", "key": "G001.POILBRE.A"},
            {"name": "Fed Funds", "source": "fred", "code": "FEDFUNDS", "reducer": "last", "unit": "%"},
            {"name": "CPI", "source": "fred", "code": "CPIAUCSL"}
        ]"#;
        let parsed: Vec<Indicator> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].id, SeriesId::imf("WEO", "G001.POILBRE.A"));
        assert_eq!(parsed[1].id, SeriesId::fred("FEDFUNDS", Reducer::Last));
        assert_eq!(parsed[1].unit.as_deref(), Some("%"));
        assert_eq!(parsed[2].id, SeriesId::fred("CPIAUCSL", Reducer::Mean));
        assert_eq!(parsed[2].id.source(), SourceKind::Fred);
    }

    #[test]
    fn raw_observation_len() {
        assert_eq!(RawObservation::Absent.len(), 0);
        assert!(RawObservation::Series(vec![]).is_empty());
        assert_eq!(RawObservation::Scalar(1.0).len(), 1);
    }
}
