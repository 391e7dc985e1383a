//! Tests for metrics emitted by the chart service.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use occon_chart::telemetry;
use occon_chart::{
    ChartDataService, ChartError, ContentSource, PageQuery, PageSummary, Result, ServiceConfig,
    SiteSession,
};

// ============================================================================
// Mock source
// ============================================================================

#[derive(Default)]
struct MockSource {
    fail: AtomicBool,
}

struct MockSession;

#[async_trait]
impl ContentSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open_site(&self, site: &str) -> Result<Box<dyn SiteSession>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ChartError::SiteNotFound(site.to_string()));
        }
        Ok(Box::new(MockSession))
    }
}

#[async_trait]
impl SiteSession for MockSession {
    fn site(&self) -> &str {
        "mock"
    }

    async fn search_pages(&self, _query: &PageQuery) -> Result<Vec<PageSummary>> {
        Ok(vec![PageSummary::new("page", 1.0)])
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for a metric name with a specific label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn miss_then_hit_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let service = ChartDataService::new(
                    Arc::new(MockSource::default()),
                    ServiceConfig::default(),
                );
                service.get_chart_data(false).await.unwrap();
                service.get_chart_data(false).await.unwrap();
                service.get_chart_data(true).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, "reason", "empty"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, "reason", "debug"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REFRESHES_TOTAL, "status", "ok"),
        2
    );
    assert!(
        has_histogram(&snapshot, telemetry::REFRESH_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_refresh_records_error_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let source = MockSource::default();
                source.fail.store(true, Ordering::SeqCst);
                let service = ChartDataService::new(Arc::new(source), ServiceConfig::default());
                service.get_chart_data(false).await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::REFRESHES_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REFRESHES_TOTAL, "status", "ok"),
        0
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let service = ChartDataService::new(Arc::new(MockSource::default()), ServiceConfig::default());
    service.get_chart_data(false).await.unwrap();
}
