use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for generation and transfer reads.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub statements: BTreeMap<String, StatementCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            statements: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Generator entrypoints
    pub generate_calls: u64,
    pub generate_failures: u64,
    pub statements_generated: u64,

    // Adapter reads
    pub values_read: u64,
    pub values_passthrough: u64,
    pub datetime_converted: u64,
    pub datetime_blank: u64,
    pub datetime_rejected: u64,
}

///
/// StatementCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StatementCounters {
    pub calls: u64,
    pub failures: u64,
    pub statements: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
    /// Per-statement-kind summaries, sorted by label.
    pub statement_summaries: Vec<StatementSummary>,
}

///
/// StatementSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StatementSummary {
    pub kind: String,
    pub calls: u64,
    pub failures: u64,
    pub statements: u64,
    pub avg_statements_per_call: f64,
}

/// Build a report, dropping counters whose window started before
/// `window_start_ms`.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snap = with_state(Clone::clone);
    if let Some(requested) = window_start_ms
        && requested > snap.since_ms
    {
        return EventReport::default();
    }

    let statement_summaries = snap
        .statements
        .iter()
        .map(|(kind, counters)| {
            let successes = counters.calls.saturating_sub(counters.failures);
            let avg = if successes > 0 {
                counters.statements as f64 / successes as f64
            } else {
                0.0
            };

            StatementSummary {
                kind: kind.clone(),
                calls: counters.calls,
                failures: counters.failures,
                statements: counters.statements,
                avg_statements_per_call: avg,
            }
        })
        .collect();

    EventReport {
        counters: Some(snap),
        statement_summaries,
    }
}
