//! # Optimization Recommendations
//!
//! **Computed view** - three independent rule checks over a trailing window:
//!
//! - **Failure rate**: action types failing more often than the configured
//!   percentage.
//! - **Latency**: action types whose average duration exceeds the slow cutoff.
//! - **Recurring errors**: the most frequent (action type, error message)
//!   pairs among failed executions.
//!
//! Rules never deduplicate against each other, so one action type can appear
//! several times with different issues.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::RecommendationThresholds;

/// Per action type execution statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActionTypeStats {
    pub action_type: String,
    pub total_executions: i64,
    pub failed_executions: i64,
    pub average_duration: f64,
}

impl ActionTypeStats {
    /// Failed executions as a percentage of all executions
    pub fn failure_rate(&self) -> f64 {
        if self.total_executions == 0 {
            return 0.0;
        }
        (self.failed_executions as f64 * 100.0) / self.total_executions as f64
    }
}

/// A failure message grouped by action type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPattern {
    pub action_type: String,
    pub error_message: Option<String>,
    pub occurrences: i64,
}

impl ErrorPattern {
    pub fn message(&self) -> &str {
        self.error_message.as_deref().unwrap_or("unknown error")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecommendation {
    pub action_type: String,
    pub issue: String,
    pub recommendation: String,
    /// Expected improvement, in percent
    pub estimated_improvement: f64,
    pub priority: RecommendationPriority,
}

impl OptimizationRecommendation {
    /// Failure-rate rule.
    pub fn for_failure_rate(
        stats: &ActionTypeStats,
        thresholds: &RecommendationThresholds,
    ) -> Option<Self> {
        let failure_rate = stats.failure_rate();
        if failure_rate <= thresholds.failure_rate_percent {
            return None;
        }

        let priority = if failure_rate > thresholds.high_failure_rate_percent {
            RecommendationPriority::High
        } else {
            RecommendationPriority::Medium
        };

        Some(Self {
            action_type: stats.action_type.clone(),
            issue: format!("High failure rate ({}%)", failure_rate.round() as i64),
            recommendation: format!(
                "Review error logs and implement retry logic with exponential backoff for {}",
                stats.action_type
            ),
            estimated_improvement: (failure_rate * thresholds.failure_improvement_factor)
                .min(thresholds.max_failure_improvement),
            priority,
        })
    }

    /// Latency rule.
    pub fn for_slow_execution(
        stats: &ActionTypeStats,
        thresholds: &RecommendationThresholds,
    ) -> Option<Self> {
        if stats.average_duration <= thresholds.slow_average_ms {
            return None;
        }

        let priority = if stats.average_duration > thresholds.very_slow_average_ms {
            RecommendationPriority::High
        } else {
            RecommendationPriority::Medium
        };

        Some(Self {
            action_type: stats.action_type.clone(),
            issue: format!(
                "Slow execution ({}ms average)",
                stats.average_duration.round() as i64
            ),
            recommendation: format!(
                "Optimize {} by implementing caching, parallel processing, or async operations",
                stats.action_type
            ),
            estimated_improvement: thresholds.slow_improvement,
            priority,
        })
    }

    /// Recurring-error rule.
    pub fn for_recurring_error(
        pattern: &ErrorPattern,
        thresholds: &RecommendationThresholds,
    ) -> Option<Self> {
        if pattern.occurrences <= thresholds.recurring_error_min_occurrences {
            return None;
        }

        let priority = if pattern.occurrences > thresholds.frequent_error_occurrences {
            RecommendationPriority::High
        } else {
            RecommendationPriority::Medium
        };

        Some(Self {
            action_type: pattern.action_type.clone(),
            issue: format!("Recurring error: {}", pattern.message()),
            recommendation: format!(
                "Implement specific error handling for \"{}\" in {}",
                pattern.message(),
                pattern.action_type
            ),
            estimated_improvement: thresholds.recurring_error_improvement,
            priority,
        })
    }
}
