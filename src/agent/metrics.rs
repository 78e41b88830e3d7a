//! Run metrics
//!
//! Counters and timestamps updated as a side effect of loop activity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counters for agent activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Tokens reported by the provider
    pub total_tokens: u64,
    /// Tool executions
    pub tool_calls: u64,
    /// Model-call attempts, including failed retries
    pub api_calls: u64,
    /// Runs that ended in an error
    pub errors: u64,
    /// Loop iterations of the latest run
    pub iterations: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Metrics {
    /// All-zero metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run: cumulative counters carry over, per-run fields reset
    pub fn begin_run(previous: &Metrics) -> Self {
        Self {
            iterations: 0,
            start_time: Some(Utc::now()),
            end_time: None,
            ..previous.clone()
        }
    }

    /// Mark the run finished
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// Record one completion call made in `attempts` attempts
    pub fn record_model_call(&mut self, attempts: u32, tokens: u64) {
        self.api_calls += u64::from(attempts);
        self.total_tokens += tokens;
    }

    /// Wall-clock time of the run, once finished
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let elapsed = self
            .duration()
            .map(|d| format!("{:.2}s", d.num_milliseconds() as f64 / 1000.0))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "iterations={} api_calls={} tool_calls={} tokens={} errors={} time={}",
            self.iterations, self.api_calls, self.tool_calls, self.total_tokens, self.errors, elapsed
        )
    }
}
