//! # Complete Trend Analysis
//!
//! Metrics, anomalies and recommendations for one trailing window, computed
//! together and returned as a single dashboard payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::anomaly_detection::{AnomalyDetection, AnomalySeverity};
use super::optimization_recommendation::{OptimizationRecommendation, RecommendationPriority};
use super::trend_metrics::TrendMetrics;

/// Recommendation counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RecommendationSummary {
    pub fn from_recommendations(recommendations: &[OptimizationRecommendation]) -> Self {
        recommendations
            .iter()
            .fold(Self::default(), |mut summary, rec| {
                match rec.priority {
                    RecommendationPriority::High => summary.high += 1,
                    RecommendationPriority::Medium => summary.medium += 1,
                    RecommendationPriority::Low => summary.low += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysisReport {
    pub time_window_days: u32,
    pub generated_at: DateTime<Utc>,
    pub metrics: TrendMetrics,
    pub anomalies: Vec<AnomalyDetection>,
    pub recommendations: Vec<OptimizationRecommendation>,
    pub recommendation_summary: RecommendationSummary,
}

impl TrendAnalysisReport {
    pub fn new(
        time_window_days: u32,
        generated_at: DateTime<Utc>,
        metrics: TrendMetrics,
        anomalies: Vec<AnomalyDetection>,
        recommendations: Vec<OptimizationRecommendation>,
    ) -> Self {
        let recommendation_summary = RecommendationSummary::from_recommendations(&recommendations);
        Self {
            time_window_days,
            generated_at,
            metrics,
            anomalies,
            recommendations,
            recommendation_summary,
        }
    }

    pub fn high_severity_anomalies(&self) -> impl Iterator<Item = &AnomalyDetection> {
        self.anomalies
            .iter()
            .filter(|anomaly| anomaly.severity == AnomalySeverity::High)
    }
}
