//! PostgreSQL execution log store.
//!
//! Every primitive is a single parameterised query against
//! `action_execution_logs`. `duration` is an `INTEGER` column, so it is cast
//! to `bigint` / `float8` where the Rust side expects `i64` / `f64`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Instant;

use super::{ExecutionLogStore, TimeRange};
use crate::error::Result;
use crate::logging::log_database_operation;
use crate::models::insights::{
    ActionTypeStats, DurationBaseline, ErrorPattern, ExecutionSummary, MostFailedAction,
    SlowestAction,
};
use crate::models::{ActionExecutionLog, NewActionExecutionLog};

const TABLE: &str = "action_execution_logs";

#[derive(Debug, Clone)]
pub struct PgExecutionLogStore {
    pool: PgPool,
}

impl PgExecutionLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn log_query(query: &str, started: Instant, rows: usize) {
    log_database_operation(
        query,
        Some(TABLE),
        Some(rows),
        "success",
        Some(started.elapsed().as_millis() as u64),
    );
}

#[async_trait]
impl ExecutionLogStore for PgExecutionLogStore {
    async fn execution_summary(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<ExecutionSummary> {
        let started = Instant::now();
        let summary = sqlx::query_as::<_, ExecutionSummary>(
            r#"
            SELECT
                COUNT(*)::bigint AS total_actions,
                COUNT(*) FILTER (WHERE status = 'success') AS success_count,
                COUNT(*) FILTER (WHERE status = 'failed') AS failure_count,
                AVG(duration)::float8 AS average_duration
            FROM action_execution_logs
            WHERE executed_at BETWEEN $1 AND $2
              AND ($3::text IS NULL OR action_type = $3)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(action_type)
        .fetch_one(&self.pool)
        .await?;

        log_query("execution_summary", started, 1);
        Ok(summary)
    }

    async fn slowest_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<SlowestAction>> {
        let started = Instant::now();
        let slowest = sqlx::query_as::<_, SlowestAction>(
            r#"
            SELECT action_type, duration::bigint AS duration
            FROM action_execution_logs
            WHERE executed_at BETWEEN $1 AND $2
              AND ($3::text IS NULL OR action_type = $3)
            ORDER BY duration DESC, id ASC
            LIMIT 1
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(action_type)
        .fetch_optional(&self.pool)
        .await?;

        log_query("slowest_action", started, usize::from(slowest.is_some()));
        Ok(slowest)
    }

    async fn most_failed_action(
        &self,
        range: &TimeRange,
        action_type: Option<&str>,
    ) -> Result<Option<MostFailedAction>> {
        let started = Instant::now();
        let most_failed = sqlx::query_as::<_, MostFailedAction>(
            r#"
            SELECT action_type, COUNT(*)::bigint AS failure_count
            FROM action_execution_logs
            WHERE executed_at BETWEEN $1 AND $2
              AND status = 'failed'
              AND ($3::text IS NULL OR action_type = $3)
            GROUP BY action_type
            ORDER BY COUNT(*) DESC, action_type ASC
            LIMIT 1
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(action_type)
        .fetch_optional(&self.pool)
        .await?;

        log_query("most_failed_action", started, usize::from(most_failed.is_some()));
        Ok(most_failed)
    }

    async fn duration_baselines(&self, since: DateTime<Utc>) -> Result<Vec<DurationBaseline>> {
        let started = Instant::now();
        let baselines = sqlx::query_as::<_, DurationBaseline>(
            r#"
            SELECT
                action_type,
                AVG(duration)::float8 AS mean_duration,
                COALESCE(STDDEV_POP(duration), 0)::float8 AS stddev_duration,
                COUNT(*)::bigint AS sample_count
            FROM action_execution_logs
            WHERE executed_at >= $1
            GROUP BY action_type
            ORDER BY action_type ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        log_query("duration_baselines", started, baselines.len());
        Ok(baselines)
    }

    async fn recent_durations(
        &self,
        action_type: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<i64>> {
        let started = Instant::now();
        let durations = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT duration::bigint
            FROM action_execution_logs
            WHERE action_type = $1
              AND executed_at >= $2
            ORDER BY executed_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(action_type)
        .bind(since)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        log_query("recent_durations", started, durations.len());
        Ok(durations)
    }

    async fn action_type_stats(&self, since: DateTime<Utc>) -> Result<Vec<ActionTypeStats>> {
        let started = Instant::now();
        let stats = sqlx::query_as::<_, ActionTypeStats>(
            r#"
            SELECT
                action_type,
                COUNT(*)::bigint AS total_executions,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed_executions,
                AVG(duration)::float8 AS average_duration
            FROM action_execution_logs
            WHERE executed_at >= $1
            GROUP BY action_type
            ORDER BY action_type ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        log_query("action_type_stats", started, stats.len());
        Ok(stats)
    }

    async fn error_patterns(&self, since: DateTime<Utc>, limit: u32) -> Result<Vec<ErrorPattern>> {
        let started = Instant::now();
        let patterns = sqlx::query_as::<_, ErrorPattern>(
            r#"
            SELECT action_type, error_message, COUNT(*)::bigint AS occurrences
            FROM action_execution_logs
            WHERE executed_at >= $1
              AND status = 'failed'
            GROUP BY action_type, error_message
            ORDER BY COUNT(*) DESC, action_type ASC, error_message ASC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        log_query("error_patterns", started, patterns.len());
        Ok(patterns)
    }

    async fn append(&self, log: NewActionExecutionLog) -> Result<ActionExecutionLog> {
        Ok(ActionExecutionLog::create(&self.pool, log).await?)
    }
}
