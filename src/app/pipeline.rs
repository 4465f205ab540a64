//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! selection -> cache/fetch -> normalize -> combine -> view
//!
//! The front-ends then only decide how to present a `DashboardView`.

use rayon::prelude::*;

use crate::config::Config;
use crate::data::source::report_failure;
use crate::data::{Catalog, ErrorSink, FredClient, ImfClient, SeriesCache, SeriesSource, fetch, http_client};
use crate::domain::{CanonicalSeries, CombinedTable, Indicator, SourceKind, TimeWindow};
use crate::error::{AppError, FetchError};
use crate::series::{combine, normalize};

/// What the presentation layer should show for one selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Nothing selected: prompt the user to pick an indicator.
    NoSelection,
    /// Every selected indicator came back absent.
    NoData,
    /// At least one indicator produced data.
    Table(CombinedTable),
}

impl DashboardView {
    pub fn table(&self) -> Option<&CombinedTable> {
        match self {
            DashboardView::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Long-lived pipeline state: one adapter per source plus the series cache.
pub struct Dashboard {
    imf: Option<Box<dyn SeriesSource>>,
    fred: Option<Box<dyn SeriesSource>>,
    cache: SeriesCache,
    parallel: bool,
}

impl Dashboard {
    pub fn new(
        imf: Option<Box<dyn SeriesSource>>,
        fred: Option<Box<dyn SeriesSource>>,
        cache: SeriesCache,
    ) -> Self {
        Self {
            imf,
            fred,
            cache,
            parallel: false,
        }
    }

    /// Build adapters and cache from configuration.
    ///
    /// A missing FRED key leaves the FRED adapter unset; FRED indicators then
    /// resolve to no data with a "not configured" message.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = http_client(config)?;
        let imf: Box<dyn SeriesSource> = Box::new(ImfClient::from_config(config, client.clone()));
        let fred: Option<Box<dyn SeriesSource>> = match FredClient::from_config(config, client) {
            Ok(fred) => Some(Box::new(fred)),
            Err(err) => {
                tracing::warn!(%err, "FRED adapter disabled");
                None
            }
        };
        let cache = SeriesCache::new(config.cache_capacity, config.cache_ttl);
        Ok(Self::new(Some(imf), fred, cache))
    }

    /// Fan out fetches across indicators on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    fn source(&self, kind: SourceKind) -> Option<&dyn SeriesSource> {
        match kind {
            SourceKind::Imf => self.imf.as_deref(),
            SourceKind::Fred => self.fred.as_deref(),
        }
    }

    /// Cache -> fetch -> normalize for one indicator. `None` means absent.
    pub fn load_series(
        &self,
        indicator: &Indicator,
        window: TimeWindow,
        sink: &dyn ErrorSink,
    ) -> Option<CanonicalSeries> {
        if let Some(hit) = self.cache.get(&indicator.id, window) {
            return Some(hit);
        }

        let kind = indicator.id.source();
        let Some(source) = self.source(kind) else {
            report_failure(&indicator.name, &FetchError::NotConfigured(kind), sink);
            return None;
        };

        let raw = fetch(source, &indicator.name, &indicator.id, window, sink);
        let series = normalize(&raw, window);
        match &series {
            Some(s) => self.cache.put(&indicator.id, window, s.clone()),
            None if !raw.is_absent() => {
                tracing::info!(indicator = %indicator.name, %window, "no observations inside window");
            }
            None => {}
        }
        series
    }

    /// Build the view for a selection. Column order follows `selection`.
    pub fn view(&self, selection: &[Indicator], window: TimeWindow, sink: &dyn ErrorSink) -> DashboardView {
        if selection.is_empty() {
            return DashboardView::NoSelection;
        }

        let loaded: Vec<Option<CanonicalSeries>> = if self.parallel {
            // `collect` on an indexed parallel iterator keeps input order.
            selection
                .par_iter()
                .map(|ind| self.load_series(ind, window, sink))
                .collect()
        } else {
            selection
                .iter()
                .map(|ind| self.load_series(ind, window, sink))
                .collect()
        };

        let table = combine(selection.iter().map(|i| i.name.clone()).zip(loaded));
        tracing::debug!(
            selected = selection.len(),
            columns = table.columns().len(),
            %window,
            "dashboard view built"
        );

        if table.is_empty() {
            DashboardView::NoData
        } else {
            DashboardView::Table(table)
        }
    }
}

/// Everything a one-shot CLI run needs: catalog + dashboard.
pub struct Session {
    pub catalog: Catalog,
    pub dashboard: Dashboard,
}

impl Session {
    pub fn open(config: &Config, catalog_override: Option<&std::path::Path>) -> Result<Self, AppError> {
        let catalog = Catalog::load(catalog_override.or(config.catalog_path.as_deref()))?;
        let dashboard = Dashboard::from_config(config)?;
        Ok(Self { catalog, dashboard })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::MessageLog;
    use crate::data::source::testing::FakeSource;
    use crate::domain::{Period, RawObservation, Reducer, SeriesId};

    fn brent() -> Indicator {
        Indicator::new("Brent", SeriesId::imf("WEO", "G001.POILBRE.A"))
    }

    fn fed() -> Indicator {
        Indicator::new("Fed Funds", SeriesId::fred("FEDFUNDS", Reducer::Mean))
    }

    fn imf_source() -> FakeSource {
        FakeSource::new(SourceKind::Imf).with(
            brent().id,
            Ok(RawObservation::MultiIndexed(vec![
                (vec!["G001".into(), "2020".into()], 42.3),
                (vec!["G001".into(), "2022".into()], 99.8),
            ])),
        )
    }

    fn fred_source() -> FakeSource {
        FakeSource::new(SourceKind::Fred).with(
            fed().id,
            Ok(RawObservation::Series(vec![(Period::Year(2021), 0.08)])),
        )
    }

    fn dashboard(imf: FakeSource, fred: Option<FakeSource>) -> Dashboard {
        Dashboard::new(
            Some(Box::new(imf)),
            fred.map(|f| Box::new(f) as Box<dyn SeriesSource>),
            SeriesCache::new(16, Duration::from_secs(60)),
        )
    }

    #[test]
    fn no_selection_is_distinct_from_no_data() {
        let dash = dashboard(imf_source(), None);
        let sink = MessageLog::new();
        assert_eq!(
            dash.view(&[], TimeWindow::new(2015, 2025), &sink),
            DashboardView::NoSelection
        );
        assert!(sink.is_empty());

        let failing = vec![
            Indicator::new("Bad 1", SeriesId::imf("WEO", "BAD1")),
            Indicator::new("Bad 2", SeriesId::imf("WEO", "BAD2")),
        ];
        assert_eq!(
            dash.view(&failing, TimeWindow::new(2015, 2025), &sink),
            DashboardView::NoData
        );
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn merges_sources_in_selection_order() {
        let dash = dashboard(imf_source(), Some(fred_source()));
        let sink = MessageLog::new();

        let view = dash.view(&[fed(), brent()], TimeWindow::new(2015, 2025), &sink);
        let table = view.table().unwrap();

        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec!["Fed Funds", "Brent"]);
        assert_eq!(table.years(), vec![2020, 2021, 2022]);
        assert_eq!(table.value("Fed Funds", 2021), Some(0.08));
        assert_eq!(table.value("Brent", 2021), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_fred_adapter_reports_and_keeps_other_columns() {
        let dash = dashboard(imf_source(), None);
        let sink = MessageLog::new();

        let view = dash.view(&[brent(), fed()], TimeWindow::new(2015, 2025), &sink);
        let table = view.table().unwrap();

        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec!["Brent"]);
        let messages = sink.drain();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("FRED_API_KEY"), "{}", messages[0]);
    }

    #[test]
    fn cache_hit_skips_the_adapter() {
        let dash = dashboard(imf_source(), None);
        let sink = MessageLog::new();
        let window = TimeWindow::new(2015, 2025);

        let first = dash.view(&[brent()], window, &sink);
        let second = dash.view(&[brent()], window, &sink);
        assert_eq!(first, second);
        assert_eq!(dash.cache().len(), 1);

        // Different window -> different key -> new fetch, filtered to the window.
        let narrow = dash.view(&[brent()], TimeWindow::new(2021, 2025), &sink);
        assert_eq!(narrow.table().unwrap().years(), vec![2022]);
        assert_eq!(dash.cache().len(), 2);
    }

    #[test]
    fn absent_results_are_not_cached() {
        let dash = dashboard(imf_source(), None);
        let sink = MessageLog::new();
        let bad = Indicator::new("Bad", SeriesId::imf("WEO", "BAD"));

        dash.view(&[bad.clone()], TimeWindow::new(2015, 2025), &sink);
        dash.view(&[bad], TimeWindow::new(2015, 2025), &sink);
        assert!(dash.cache().is_empty());
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn parallel_view_matches_sequential_view() {
        let sequential = dashboard(imf_source(), Some(fred_source()));
        let parallel = dashboard(imf_source(), Some(fred_source())).with_parallel(true);
        let sink = MessageLog::new();
        let selection = vec![brent(), fed(), Indicator::new("Bad", SeriesId::imf("WEO", "BAD"))];
        let window = TimeWindow::new(2015, 2025);

        assert_eq!(
            sequential.view(&selection, window, &sink),
            parallel.view(&selection, window, &sink)
        );
    }

    #[test]
    fn point_query_scalar_is_wrapped() {
        let source = FakeSource::new(SourceKind::Imf).with(brent().id, Ok(RawObservation::Scalar(42.5)));
        let dash = dashboard(source, None);
        let sink = MessageLog::new();

        let view = dash.view(&[brent()], TimeWindow::point(2024), &sink);
        let table = view.table().unwrap();
        assert_eq!(table.rows(), vec![(2024, vec![Some(42.5)])]);
    }
}
