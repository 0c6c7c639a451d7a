//! # Execution Log Store
//!
//! The data-access seam for the analysis service. The service only needs a
//! handful of filter / group / order / limit / aggregate primitives over
//! `action_execution_logs`; each is one method here.
//!
//! - [`PgExecutionLogStore`] runs them as SQL against a shared `PgPool`.
//! - [`InMemoryExecutionLogStore`] evaluates them over rows held in memory,
//!   with the same ordering and tie-breaking rules.
//!
//! Ordering contract shared by both implementations:
//!
//! | Query | Order |
//! |-------|-------|
//! | slowest action | duration desc, id asc |
//! | most failed action | failures desc, action type asc |
//! | baselines / type stats | action type asc |
//! | recent durations | executed_at desc, id desc |
//! | error patterns | occurrences desc, action type asc, message asc (nulls last) |

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::insights::{
    ActionTypeStats, DurationBaseline, ErrorPattern, ExecutionSummary, MostFailedAction,
    SlowestAction,
};
use crate::models::{ActionExecutionLog, NewActionExecutionLog};

pub use memory::InMemoryExecutionLogStore;
pub use postgres::PgExecutionLogStore;

/// Closed interval `[start, end]` on `executed_at`.
///
/// An inverted range is valid and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

#[async_trait]
pub trait ExecutionLogStore: Send + Sync {
    /// Counts and average duration inside `range`, optionally for one type
    async fn execution_summary(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<ExecutionSummary>;

    /// Single slowest execution inside `range`
    async fn slowest_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<SlowestAction>>;

    /// Action type with the most failed executions inside `range`
    async fn most_failed_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<MostFailedAction>>;

    /// Mean and population standard deviation of duration per action type
    /// for rows at or after `since`
    async fn duration_baselines(&self, since: DateTime<Utc>) -> Result<Vec<DurationBaseline>>;

    /// Durations of the `limit` most recent executions of `action_type`
    /// at or after `since`
    async fn recent_durations(
        &self,
        action_type: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<i64>>;

    /// Totals, failures and average duration per action type
    async fn action_type_stats(&self, since: DateTime<Utc>) -> Result<Vec<ActionTypeStats>>;

    /// Top `limit` (action type, error message) groups among failed rows
    async fn error_patterns(&self, since: DateTime<Utc>, limit: u32) -> Result<Vec<ErrorPattern>>;

    /// Append one execution row
    async fn append(&self, log: NewActionExecutionLog) -> Result<ActionExecutionLog>;
}
