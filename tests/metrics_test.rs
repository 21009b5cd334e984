//! Tests for metrics emitted by the fallback sweep.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use munez::telemetry;
use munez::{
    AttemptResult, ChatAdapter, ChatRequest, FallbackOrchestrator, Mode, ProviderFailure,
    ProviderRegistry, Result,
};

// ============================================================================
// Mock adapters
// ============================================================================

struct Replying;

#[async_trait]
impl ChatAdapter for Replying {
    fn name(&self) -> &str {
        "replying"
    }

    async fn call(&self, _prompt: &str, _mode: Mode) -> AttemptResult {
        Ok("hello".to_string())
    }
}

struct Exhausted;

#[async_trait]
impl ChatAdapter for Exhausted {
    fn name(&self) -> &str {
        "exhausted"
    }

    async fn call(&self, _prompt: &str, _mode: Mode) -> AttemptResult {
        Err(ProviderFailure::QuotaExceeded("429".to_string()))
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

/// Sum counter values matching a metric name and, optionally, one label.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            label.is_none_or(|(k, v)| {
                key.key()
                    .labels()
                    .any(|label| label.key() == k && label.value() == v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn shared(adapter: impl ChatAdapter + 'static) -> Arc<dyn ChatAdapter> {
    Arc::new(adapter)
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Run one dispatch over `adapters` with a local recorder installed.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the dispatch.
fn dispatch_recorded(adapters: Vec<Arc<dyn ChatAdapter>>) -> (Result<String>, SnapshotVec) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let mut registry = ProviderRegistry::new();
                for adapter in adapters {
                    registry.add(adapter);
                }
                let orch = FallbackOrchestrator::new(Arc::new(registry));
                let req = ChatRequest::new("hello", Mode::Chat).unwrap();
                orch.dispatch(&req).await.map(|reply| reply.provider_used)
            })
        })
    });

    (result, snapshotter.snapshot().into_vec())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn fallback_success_records_each_attempt() {
    let (result, snapshot) = dispatch_recorded(vec![shared(Exhausted), shared(Replying)]);
    assert_eq!(result.unwrap(), "replying");

    assert_eq!(counter_total(&snapshot, telemetry::ATTEMPTS_TOTAL, None), 2);
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::ATTEMPTS_TOTAL,
            Some(("failure", "quota_exceeded"))
        ),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::DISPATCH_TOTAL, Some(("status", "ok"))),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::ATTEMPT_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn exhausted_sweep_records_all_failed() {
    let (result, snapshot) = dispatch_recorded(vec![shared(Exhausted), shared(Exhausted)]);
    assert!(result.is_err());

    assert_eq!(
        counter_total(&snapshot, telemetry::ATTEMPTS_TOTAL, Some(("status", "error"))),
        2
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::DISPATCH_TOTAL,
            Some(("status", "all_failed"))
        ),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn empty_registry_records_no_attempts() {
    let (result, snapshot) = dispatch_recorded(Vec::new());
    assert!(result.is_err());

    assert_eq!(counter_total(&snapshot, telemetry::ATTEMPTS_TOTAL, None), 0);
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::DISPATCH_TOTAL,
            Some(("status", "no_providers"))
        ),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    let mut registry = ProviderRegistry::new();
    registry.add(Arc::new(Replying));
    let orch = FallbackOrchestrator::new(Arc::new(registry));
    let req = ChatRequest::new("hello", Mode::Chat).unwrap();
    orch.dispatch(&req).await.unwrap();
}
