//! Metrics sink boundary.
//!
//! Generator and adapter logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{generate::StatementKind, obs::metrics, transfer::ConversionOutcome};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    GenerateStart {
        kind: StatementKind,
    },
    GenerateFinish {
        kind: StatementKind,
        statements: u64,
    },
    GenerateFailed {
        kind: StatementKind,
    },
    ValueRead {
        outcome: ConversionOutcome,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::GenerateStart { kind } => metrics::with_state_mut(|m| {
                m.ops.generate_calls = m.ops.generate_calls.saturating_add(1);
                let entry = m.statements.entry(kind.to_string()).or_default();
                entry.calls = entry.calls.saturating_add(1);
            }),

            MetricsEvent::GenerateFinish { kind, statements } => metrics::with_state_mut(|m| {
                m.ops.statements_generated = m.ops.statements_generated.saturating_add(statements);
                let entry = m.statements.entry(kind.to_string()).or_default();
                entry.statements = entry.statements.saturating_add(statements);
            }),

            MetricsEvent::GenerateFailed { kind } => metrics::with_state_mut(|m| {
                m.ops.generate_failures = m.ops.generate_failures.saturating_add(1);
                let entry = m.statements.entry(kind.to_string()).or_default();
                entry.failures = entry.failures.saturating_add(1);
            }),

            MetricsEvent::ValueRead { outcome } => metrics::with_state_mut(|m| {
                m.ops.values_read = m.ops.values_read.saturating_add(1);
                let counter = match outcome {
                    ConversionOutcome::Passthrough => &mut m.ops.values_passthrough,
                    ConversionOutcome::Converted => &mut m.ops.datetime_converted,
                    ConversionOutcome::Blank => &mut m.ops.datetime_blank,
                    ConversionOutcome::Rejected => &mut m.ops.datetime_rejected,
                };
                *counter = counter.saturating_add(1);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous pointer on every exit,
        //   including unwind, via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::since_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}
