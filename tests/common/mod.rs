//! Shared fixtures for integration and property tests
#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use action_trends::models::insights::{
    ActionTypeStats, DurationBaseline, ErrorPattern, ExecutionSummary, MostFailedAction,
    SlowestAction,
};
use action_trends::models::{ActionExecutionLog, NewActionExecutionLog};
use action_trends::services::TrendAnalysisService;
use action_trends::store::{ExecutionLogStore, InMemoryExecutionLogStore, TimeRange};
use action_trends::{Result, TrendError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed reference instant so windows and orderings are deterministic
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn service_with(logs: Vec<NewActionExecutionLog>) -> TrendAnalysisService {
    TrendAnalysisService::with_defaults(Arc::new(InMemoryExecutionLogStore::with_logs(logs)))
}

/// 100 `email_send` executions, one minute apart ending at `now`. 20 failed.
/// All run 1000ms except the most recent one, which took 9000ms.
pub fn email_send_scenario(now: DateTime<Utc>) -> Vec<NewActionExecutionLog> {
    (0..100)
        .map(|i| {
            let at = now - Duration::minutes(i);
            let duration = if i == 0 { 9000 } else { 1000 };
            if (1..=20).contains(&i) {
                NewActionExecutionLog::failed("email_send", duration, Some("SMTP timeout"), at)
            } else {
                NewActionExecutionLog::success("email_send", duration, at)
            }
        })
        .collect()
}

/// `count` executions of one type, `failed` of them failed, all at `duration`
pub fn executions(
    action_type: &str,
    count: i64,
    failed: i64,
    duration: i32,
    now: DateTime<Utc>,
) -> Vec<NewActionExecutionLog> {
    (0..count)
        .map(|i| {
            let at = now - Duration::minutes(i);
            if i < failed {
                NewActionExecutionLog::failed(action_type, duration, None, at)
            } else {
                NewActionExecutionLog::success(action_type, duration, at)
            }
        })
        .collect()
}

/// Store whose every primitive fails, for propagation tests
pub struct FailingStore;

fn unavailable<T>() -> Result<T> {
    Err(TrendError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ExecutionLogStore for FailingStore {
    async fn execution_summary(&self, _: &TimeRange, _: Option<&str>) -> Result<ExecutionSummary> {
        unavailable()
    }

    async fn slowest_action(&self, _: &TimeRange, _: Option<&str>) -> Result<Option<SlowestAction>> {
        unavailable()
    }

    async fn most_failed_action(
        &self,
        _: &TimeRange,
        _: Option<&str>,
    ) -> Result<Option<MostFailedAction>> {
        unavailable()
    }

    async fn duration_baselines(&self, _: DateTime<Utc>) -> Result<Vec<DurationBaseline>> {
        unavailable()
    }

    async fn recent_durations(&self, _: &str, _: DateTime<Utc>, _: u32) -> Result<Vec<i64>> {
        unavailable()
    }

    async fn action_type_stats(&self, _: DateTime<Utc>) -> Result<Vec<ActionTypeStats>> {
        unavailable()
    }

    async fn error_patterns(&self, _: DateTime<Utc>, _: u32) -> Result<Vec<ErrorPattern>> {
        unavailable()
    }

    async fn append(&self, _: NewActionExecutionLog) -> Result<ActionExecutionLog> {
        unavailable()
    }
}
