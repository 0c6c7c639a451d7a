//! In-memory execution log store.
//!
//! Holds rows in a `Vec` behind a `parking_lot::RwLock` and evaluates each
//! primitive with iterator pipelines. Mirrors the ordering contract of the
//! PostgreSQL store so both can back the same tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, HashMap};

use super::{ExecutionLogStore, TimeRange};
use crate::error::Result;
use crate::models::insights::{
    ActionTypeStats, DurationBaseline, ErrorPattern, ExecutionSummary, MostFailedAction,
    SlowestAction,
};
use crate::models::{ActionExecutionLog, ExecutionStatus, NewActionExecutionLog};

#[derive(Debug, Default)]
pub struct InMemoryExecutionLogStore {
    logs: RwLock<Vec<ActionExecutionLog>>,
}

impl InMemoryExecutionLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `logs`, ids assigned in order
    pub fn with_logs(logs: impl IntoIterator<Item = NewActionExecutionLog>) -> Self {
        let store = Self::new();
        for log in logs {
            store.push(log);
        }
        store
    }

    /// Synchronous append
    pub fn push(&self, log: NewActionExecutionLog) -> ActionExecutionLog {
        let mut logs = self.logs.write();
        let row = ActionExecutionLog {
            id: logs.len() as i64 + 1,
            action_type: log.action_type,
            status: log.status.as_str().to_string(),
            duration: log.duration,
            error_message: log.error_message,
            executed_at: log.executed_at,
        };
        logs.push(row.clone());
        row
    }

    pub fn len(&self) -> usize {
        self.logs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.read().is_empty()
    }

    fn select<F>(&self, predicate: F) -> Vec<ActionExecutionLog>
    where
        F: Fn(&ActionExecutionLog) -> bool,
    {
        self.logs
            .read()
            .iter()
            .filter(|log| predicate(log))
            .cloned()
            .collect()
    }
}

fn matches_type(log: &ActionExecutionLog, action_type: Option<&str>) -> bool {
    action_type.map_or(true, |wanted| log.action_type == wanted)
}

fn is_failed(log: &ActionExecutionLog) -> bool {
    log.execution_status() == ExecutionStatus::Failed
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn population_stddev(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Rows grouped by action type, in action type order
fn group_by_type(logs: Vec<ActionExecutionLog>) -> BTreeMap<String, Vec<ActionExecutionLog>> {
    let mut groups: BTreeMap<String, Vec<ActionExecutionLog>> = BTreeMap::new();
    for log in logs {
        groups.entry(log.action_type.clone()).or_default().push(log);
    }
    groups
}

/// `ASC NULLS LAST`
fn compare_messages(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl ExecutionLogStore for InMemoryExecutionLogStore {
    async fn execution_summary(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<ExecutionSummary> {
        let rows = self.select(|log| range.contains(log.executed_at) && matches_type(log, action_type));
        let durations: Vec<f64> = rows.iter().map(|log| f64::from(log.duration)).collect();

        Ok(ExecutionSummary {
            total_actions: rows.len() as i64,
            success_count: rows
                .iter()
                .filter(|log| log.execution_status().is_success())
                .count() as i64,
            failure_count: rows.iter().filter(|log| is_failed(log)).count() as i64,
            average_duration: mean(&durations),
        })
    }

    async fn slowest_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<SlowestAction>> {
        let rows = self.select(|log| range.contains(log.executed_at) && matches_type(log, action_type));

        Ok(rows
            .into_iter()
            .min_by_key(|log| (Reverse(log.duration), log.id))
            .map(|log| SlowestAction {
                action_type: log.action_type,
                duration: i64::from(log.duration),
            }))
    }

    async fn most_failed_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<MostFailedAction>> {
        let rows = self.select(|log| {
            range.contains(log.executed_at) && is_failed(log) && matches_type(log, action_type)
        });

        Ok(group_by_type(rows)
            .into_iter()
            .map(|(action_type, failures)| MostFailedAction {
                action_type,
                failure_count: failures.len() as i64,
            })
            // BTreeMap iteration is type-ascending, so the first max wins ties
            .fold(None, |best: Option<MostFailedAction>, candidate| match best {
                Some(current) if current.failure_count >= candidate.failure_count => Some(current),
                _ => Some(candidate),
            }))
    }

    async fn duration_baselines(&self, since: DateTime<Utc>) -> Result<Vec<DurationBaseline>> {
        let rows = self.select(|log| log.executed_at >= since);

        Ok(group_by_type(rows)
            .into_iter()
            .filter_map(|(action_type, logs)| {
                let durations: Vec<f64> = logs.iter().map(|log| f64::from(log.duration)).collect();
                let mean_duration = mean(&durations)?;
                Some(DurationBaseline {
                    action_type,
                    mean_duration,
                    stddev_duration: population_stddev(&durations, mean_duration),
                    sample_count: durations.len() as i64,
                })
            })
            .collect())
    }

    async fn recent_durations(
        &self,
        action_type: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<i64>> {
        let mut rows = self.select(|log| log.action_type == action_type && log.executed_at >= since);
        rows.sort_by_key(|log| Reverse((log.executed_at, log.id)));

        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(|log| i64::from(log.duration))
            .collect())
    }

    async fn action_type_stats(&self, since: DateTime<Utc>) -> Result<Vec<ActionTypeStats>> {
        let rows = self.select(|log| log.executed_at >= since);

        Ok(group_by_type(rows)
            .into_iter()
            .map(|(action_type, logs)| {
                let durations: Vec<f64> = logs.iter().map(|log| f64::from(log.duration)).collect();
                ActionTypeStats {
                    action_type,
                    total_executions: logs.len() as i64,
                    failed_executions: logs.iter().filter(|log| is_failed(log)).count() as i64,
                    average_duration: mean(&durations).unwrap_or(0.0),
                }
            })
            .collect())
    }

    async fn error_patterns(&self, since: DateTime<Utc>, limit: u32) -> Result<Vec<ErrorPattern>> {
        let rows = self.select(|log| log.executed_at >= since && is_failed(log));

        let mut counts: HashMap<(String, Option<String>), i64> = HashMap::new();
        for log in rows {
            *counts.entry((log.action_type, log.error_message)).or_insert(0) += 1;
        }

        let mut patterns: Vec<ErrorPattern> = counts
            .into_iter()
            .map(|((action_type, error_message), occurrences)| ErrorPattern {
                action_type,
                error_message,
                occurrences,
            })
            .collect();

        patterns.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.action_type.cmp(&b.action_type))
                .then_with(|| compare_messages(&a.error_message, &b.error_message))
        });
        patterns.truncate(limit as usize);

        Ok(patterns)
    }

    async fn append(&self, log: NewActionExecutionLog) -> Result<ActionExecutionLog> {
        Ok(self.push(log))
    }
}
