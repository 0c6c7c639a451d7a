//! # Trend Metrics
//!
//! **Computed view** - aggregates over `action_execution_logs` for a closed
//! time interval. Never stored.
//!
//! Three queries feed one `TrendMetrics`:
//!
//! ```sql
//! -- totals
//! SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'success'),
//!        COUNT(*) FILTER (WHERE status = 'failed'), AVG(duration)
//!   FROM action_execution_logs WHERE executed_at BETWEEN $1 AND $2;
//! -- slowest single execution
//! ... ORDER BY duration DESC LIMIT 1;
//! -- action type with the most failures
//! ... WHERE status = 'failed' GROUP BY action_type ORDER BY COUNT(*) DESC LIMIT 1;
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw totals for a window, as returned by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExecutionSummary {
    pub total_actions: i64,
    pub success_count: i64,
    pub failure_count: i64,
    /// `None` when the window holds no rows
    pub average_duration: Option<f64>,
}

/// The single slowest execution in a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SlowestAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub duration: i64,
}

/// The action type with the most failed executions in a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MostFailedAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub failure_count: i64,
}

/// Aggregate execution statistics for a date range.
///
/// `success_rate` is a percentage rounded to two decimals and
/// `average_duration` is whole milliseconds; both are 0 for an empty window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetrics {
    pub period: String,
    pub total_actions: i64,
    pub success_count: i64,
    pub failure_count: i64,
    pub success_rate: f64,
    pub average_duration: i64,
    pub slowest_action: Option<SlowestAction>,
    pub most_failed_action: Option<MostFailedAction>,
}

impl TrendMetrics {
    pub fn from_parts(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        summary: ExecutionSummary,
        slowest_action: Option<SlowestAction>,
        most_failed_action: Option<MostFailedAction>,
    ) -> Self {
        let success_rate = if summary.total_actions > 0 {
            (summary.success_count as f64 / summary.total_actions as f64) * 100.0
        } else {
            0.0
        };

        Self {
            period: format_period(start, end),
            total_actions: summary.total_actions,
            success_count: summary.success_count,
            failure_count: summary.failure_count,
            success_rate: round_to(success_rate, 2),
            average_duration: summary.average_duration.unwrap_or(0.0).round() as i64,
            slowest_action,
            most_failed_action,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_actions == 0
    }

    /// Complement of the success rate, the figure period comparisons use.
    /// Executions in neither terminal state count as not successful.
    pub fn unsuccessful_rate(&self) -> f64 {
        100.0 - self.success_rate
    }
}

/// `"<start> to <end>"` with millisecond ISO-8601 timestamps
pub fn format_period(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{} to {}",
        start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
