//! Source adapter contract and failure reporting.
//!
//! Adapters expose a fallible `fetch_raw`. Callers go through [`fetch`], which
//! never fails: errors are reported to an [`ErrorSink`] and come back as
//! `RawObservation::Absent`.

use std::sync::Mutex;

use crate::domain::{RawObservation, SeriesId, SourceKind, TimeWindow};
use crate::error::FetchError;

/// One upstream data service.
pub trait SeriesSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetch one series for `window` (both endpoints inclusive).
    fn fetch_raw(&self, id: &SeriesId, window: TimeWindow) -> Result<RawObservation, FetchError>;
}

/// Receives human-readable fetch failure messages.
pub trait ErrorSink: Sync {
    fn report(&self, message: String);
}

/// Collects reported messages in order.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<String>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything reported so far.
    pub fn drain(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for MessageLog {
    fn report(&self, message: String) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

/// Fetch through `source`, converting failures into `Absent` + a report.
///
/// `label` names the series in the reported message (usually the indicator name).
pub fn fetch(
    source: &dyn SeriesSource,
    label: &str,
    id: &SeriesId,
    window: TimeWindow,
    sink: &dyn ErrorSink,
) -> RawObservation {
    if window.is_empty() {
        tracing::debug!(%id, %window, "reversed window, skipping request");
        return RawObservation::Absent;
    }

    match source.fetch_raw(id, window) {
        Ok(raw) if raw.is_empty() => {
            let err = FetchError::EmptyResult {
                kind: source.kind(),
                series: id.to_string(),
            };
            report_failure(label, &err, sink);
            RawObservation::Absent
        }
        Ok(raw) => {
            tracing::debug!(%id, %window, observations = raw.len(), "fetched series");
            raw
        }
        Err(err) => {
            report_failure(label, &err, sink);
            RawObservation::Absent
        }
    }
}

/// Report a failure for an indicator that has no usable adapter.
pub fn report_failure(label: &str, err: &FetchError, sink: &dyn ErrorSink) {
    tracing::warn!(indicator = label, error = %err, "fetch failed");
    sink.report(format!("Error fetching {label}: {err}"));
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory source used by pipeline tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    pub struct FakeSource {
        pub kind: SourceKind,
        pub responses: HashMap<SeriesId, Result<RawObservation, FetchError>>,
        pub calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn new(kind: SourceKind) -> Self {
            Self {
                kind,
                responses: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with(mut self, id: SeriesId, response: Result<RawObservation, FetchError>) -> Self {
            self.responses.insert(id, response);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SeriesSource for FakeSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn fetch_raw(&self, id: &SeriesId, _window: TimeWindow) -> Result<RawObservation, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(id)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::InvalidIdentifier(id.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeSource;
    use super::*;
    use crate::domain::Period;

    #[test]
    fn errors_become_absent_and_are_reported() {
        let id = SeriesId::imf("WEO", "BAD");
        let source = FakeSource::new(SourceKind::Imf)
            .with(id.clone(), Err(FetchError::unavailable(SourceKind::Imf, "status 404 Not Found")));
        let sink = MessageLog::new();

        let raw = fetch(&source, "Brent", &id, TimeWindow::new(2015, 2025), &sink);

        assert!(raw.is_absent());
        assert_eq!(
            sink.drain(),
            vec!["Error fetching Brent: IMF request failed: status 404 Not Found".to_string()]
        );
    }

    #[test]
    fn empty_payload_is_reported_like_a_failure() {
        let id = SeriesId::imf("WEO", "EMPTY");
        let source = FakeSource::new(SourceKind::Imf).with(id.clone(), Ok(RawObservation::Series(vec![])));
        let sink = MessageLog::new();

        let raw = fetch(&source, "Empty", &id, TimeWindow::new(2015, 2025), &sink);

        assert!(raw.is_absent());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn reversed_window_skips_the_request() {
        let id = SeriesId::imf("WEO", "X");
        let source = FakeSource::new(SourceKind::Imf).with(id.clone(), Ok(RawObservation::Scalar(1.0)));
        let sink = MessageLog::new();

        let raw = fetch(&source, "X", &id, TimeWindow::new(2025, 2015), &sink);

        assert!(raw.is_absent());
        assert_eq!(source.calls(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn successful_fetch_passes_through() {
        let id = SeriesId::imf("WEO", "OK");
        let rows = vec![(Period::Year(2020), 1.0)];
        let source = FakeSource::new(SourceKind::Imf).with(id.clone(), Ok(RawObservation::Series(rows.clone())));
        let sink = MessageLog::new();

        let raw = fetch(&source, "OK", &id, TimeWindow::new(2015, 2025), &sink);

        assert_eq!(raw, RawObservation::Series(rows));
        assert!(sink.is_empty());
    }
}
