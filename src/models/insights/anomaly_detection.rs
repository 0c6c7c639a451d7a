//! # Duration Anomaly Detection
//!
//! **Computed view** - per action type, a duration baseline (mean and
//! population standard deviation) over a trailing window is compared against
//! the most recent executions of that type.
//!
//! An execution is anomalous when `|duration - mean|` exceeds the configured
//! multiple of the standard deviation (2σ by default). Severity escalates to
//! `medium` past 3σ and `high` past 4σ.
//!
//! A type whose window holds identical durations (or a single sample) has
//! σ = 0, so every nonzero deviation is flagged as `high`. That behaviour is
//! deliberate and unresolved; callers should expect noise on low-volume types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::AnomalyThresholds;

/// Duration statistics for one action type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DurationBaseline {
    pub action_type: String,
    pub mean_duration: f64,
    /// Population standard deviation
    pub stddev_duration: f64,
    pub sample_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl AnomalySeverity {
    /// Classify a deviation against a standard deviation.
    ///
    /// Returns `None` when the deviation is within the anomaly threshold.
    pub fn classify(deviation: f64, stddev: f64, thresholds: &AnomalyThresholds) -> Option<Self> {
        if deviation <= stddev * thresholds.anomaly_stddev_multiplier {
            return None;
        }

        let severity = if deviation > stddev * thresholds.high_stddev_multiplier {
            AnomalySeverity::High
        } else if deviation > stddev * thresholds.medium_stddev_multiplier {
            AnomalySeverity::Medium
        } else {
            AnomalySeverity::Low
        };
        Some(severity)
    }
}

/// A flagged execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetection {
    pub action_type: String,
    /// Baseline mean, rounded to whole milliseconds
    pub expected_duration: i64,
    pub actual_duration: i64,
    /// Absolute distance from the mean, rounded
    pub deviation: i64,
    pub is_anomaly: bool,
    pub severity: AnomalySeverity,
}

impl DurationBaseline {
    /// Duration distance beyond which an execution is anomalous
    pub fn threshold(&self, thresholds: &AnomalyThresholds) -> f64 {
        self.stddev_duration * thresholds.anomaly_stddev_multiplier
    }

    /// Compare one execution against this baseline.
    pub fn evaluate(&self, duration: i64, thresholds: &AnomalyThresholds) -> Option<AnomalyDetection> {
        let deviation = (duration as f64 - self.mean_duration).abs();
        let severity = AnomalySeverity::classify(deviation, self.stddev_duration, thresholds)?;

        Some(AnomalyDetection {
            action_type: self.action_type.clone(),
            expected_duration: self.mean_duration.round() as i64,
            actual_duration: duration,
            deviation: deviation.round() as i64,
            is_anomaly: true,
            severity,
        })
    }
}
