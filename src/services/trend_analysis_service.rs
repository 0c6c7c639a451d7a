//! # Trend Analysis Service
//!
//! Read-only analysis over the action execution log: trend metrics for a date
//! range, duration anomalies, rule-based optimization recommendations and
//! period comparisons.
//!
//! Every operation is a stateless computation over whatever the injected
//! [`ExecutionLogStore`] returns for the requested window. Nothing is cached,
//! and store failures propagate unchanged.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use action_trends::config::AnalysisConfig;
//! use action_trends::services::TrendAnalysisService;
//! use action_trends::store::PgExecutionLogStore;
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let service = TrendAnalysisService::new(
//!     Arc::new(PgExecutionLogStore::new(pool)),
//!     AnalysisConfig::default(),
//! );
//!
//! for anomaly in service.detect_anomalies(30).await? {
//!     println!("{} took {}ms", anomaly.action_type, anomaly.actual_duration);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::config::AnalysisConfig;
use crate::error::{Result, TrendError};
use crate::logging::{log_analysis_operation, log_error};
use crate::models::insights::{
    AnomalyDetection, OptimizationRecommendation, TrendAnalysisReport, TrendComparison,
    TrendMetrics,
};
use crate::models::insights::trend_metrics::format_period;
use crate::store::{ExecutionLogStore, TimeRange};

#[derive(Clone)]
pub struct TrendAnalysisService {
    store: Arc<dyn ExecutionLogStore>,
    config: AnalysisConfig,
}

impl std::fmt::Debug for TrendAnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendAnalysisService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Start of a trailing window of `days` ending at `now`.
///
/// Fails with a validation error when the window reaches past the earliest
/// representable timestamp.
pub fn window_start(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| {
            TrendError::validation(format!(
                "time window of {days} days starts before the earliest supported date"
            ))
        })
}

/// Emit the operation log line and pass the result through
fn record<T>(
    operation: &str,
    window: &str,
    started: Instant,
    result: Result<T>,
    count: impl Fn(&T) -> Option<usize>,
) -> Result<T> {
    let elapsed = started.elapsed().as_millis() as u64;
    match &result {
        Ok(value) => log_analysis_operation(operation, window, "success", count(value), elapsed),
        Err(e) => log_error("trend_analysis", operation, &e.to_string(), Some(window)),
    }
    result
}

impl TrendAnalysisService {
    pub fn new(store: Arc<dyn ExecutionLogStore>, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    pub fn with_defaults(store: Arc<dyn ExecutionLogStore>) -> Self {
        Self::new(store, AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ExecutionLogStore> {
        &self.store
    }

    /// Aggregate metrics for `[start, end]`, optionally for one action type.
    ///
    /// An inverted range is not an error; it yields empty metrics.
    #[instrument(skip(self))]
    pub async fn calculate_trend_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        action_type: Option<&str>,
    ) -> Result<TrendMetrics> {
        let started = Instant::now();
        let result = self.compute_trend_metrics(start, end, action_type).await;
        record(
            "calculate_trend_metrics",
            &format_period(start, end),
            started,
            result,
            |metrics| Some(metrics.total_actions as usize),
        )
    }

    async fn compute_trend_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        action_type: Option<&str>,
    ) -> Result<TrendMetrics> {
        let range = TimeRange::new(start, end);

        let summary = self.store.execution_summary(&range, action_type).await?;
        let slowest = self.store.slowest_action(&range, action_type).await?;
        let most_failed = self.store.most_failed_action(&range, action_type).await?;

        Ok(TrendMetrics::from_parts(start, end, summary, slowest, most_failed))
    }

    /// Anomalous recent executions over the trailing `time_window_days`.
    pub async fn detect_anomalies(&self, time_window_days: u32) -> Result<Vec<AnomalyDetection>> {
        let since = window_start(Utc::now(), time_window_days)?;
        self.detect_anomalies_since(since).await
    }

    /// Anomalous recent executions among rows at or after `since`.
    ///
    /// Results follow baseline order (action type), then recency within a type,
    /// and hold at most `recent_sample_size` entries per type.
    #[instrument(skip(self))]
    pub async fn detect_anomalies_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnomalyDetection>> {
        let started = Instant::now();
        let result = self.compute_anomalies(since).await;
        record(
            "detect_anomalies",
            &since.to_rfc3339(),
            started,
            result,
            |anomalies| Some(anomalies.len()),
        )
    }

    async fn compute_anomalies(&self, since: DateTime<Utc>) -> Result<Vec<AnomalyDetection>> {
        let thresholds = &self.config.anomaly;
        let baselines = self.store.duration_baselines(since).await?;
        let mut anomalies = Vec::new();

        for baseline in &baselines {
            let recent = self
                .store
                .recent_durations(&baseline.action_type, since, thresholds.recent_sample_size)
                .await?;

            if baseline.stddev_duration == 0.0 {
                debug!(
                    action_type = %baseline.action_type,
                    samples = baseline.sample_count,
                    "zero standard deviation, any differing duration will be flagged"
                );
            }

            anomalies.extend(
                recent
                    .into_iter()
                    .filter_map(|duration| baseline.evaluate(duration, thresholds)),
            );
        }

        Ok(anomalies)
    }

    /// Optimization recommendations over the trailing `time_window_days`.
    pub async fn generate_optimization_recommendations(
        &self,
        time_window_days: u32,
    ) -> Result<Vec<OptimizationRecommendation>> {
        let since = window_start(Utc::now(), time_window_days)?;
        self.generate_optimization_recommendations_since(since)
            .await
    }

    /// Failure-rate, latency and recurring-error recommendations, in that
    /// order, for rows at or after `since`.
    #[instrument(skip(self))]
    pub async fn generate_optimization_recommendations_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<OptimizationRecommendation>> {
        let started = Instant::now();
        let result = self.compute_recommendations(since).await;
        record(
            "generate_optimization_recommendations",
            &since.to_rfc3339(),
            started,
            result,
            |recommendations| Some(recommendations.len()),
        )
    }

    async fn compute_recommendations(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<OptimizationRecommendation>> {
        let thresholds = &self.config.recommendations;
        let stats = self.store.action_type_stats(since).await?;
        let patterns = self
            .store
            .error_patterns(since, thresholds.error_pattern_limit)
            .await?;

        let failure_rate = stats
            .iter()
            .filter_map(|s| OptimizationRecommendation::for_failure_rate(s, thresholds));
        let latency = stats
            .iter()
            .filter_map(|s| OptimizationRecommendation::for_slow_execution(s, thresholds));
        let recurring = patterns
            .iter()
            .filter_map(|p| OptimizationRecommendation::for_recurring_error(p, thresholds));

        Ok(failure_rate.chain(latency).chain(recurring).collect())
    }

    /// Metrics for two periods and their deltas (`period2 - period1`).
    #[instrument(skip(self))]
    pub async fn compare_trend_periods(
        &self,
        start1: DateTime<Utc>,
        end1: DateTime<Utc>,
        start2: DateTime<Utc>,
        end2: DateTime<Utc>,
    ) -> Result<TrendComparison> {
        let period1 = self.calculate_trend_metrics(start1, end1, None).await?;
        let period2 = self.calculate_trend_metrics(start2, end2, None).await?;

        Ok(TrendComparison::between(period1, period2))
    }

    /// Metrics, anomalies and recommendations for the trailing window,
    /// computed concurrently.
    pub async fn complete_trend_analysis(&self, time_window_days: u32) -> Result<TrendAnalysisReport> {
        self.complete_trend_analysis_at(Utc::now(), time_window_days)
            .await
    }

    /// Complete analysis for the window ending at `now`. Fails on the first
    /// error from any of the three computations.
    #[instrument(skip(self))]
    pub async fn complete_trend_analysis_at(
        &self,
        now: DateTime<Utc>,
        time_window_days: u32,
    ) -> Result<TrendAnalysisReport> {
        let since = window_start(now, time_window_days)?;

        let (metrics, anomalies, recommendations) = tokio::try_join!(
            self.calculate_trend_metrics(since, now, None),
            self.detect_anomalies_since(since),
            self.generate_optimization_recommendations_since(since)
        )?;

        Ok(TrendAnalysisReport::new(
            time_window_days,
            now,
            metrics,
            anomalies,
            recommendations,
        ))
    }
}
