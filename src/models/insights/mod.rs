//! # Insights and Analytics Models
//!
//! Computed views over `action_execution_logs`. None of these models support
//! create, update, or delete operations; they are response payloads derived
//! from the log rows inside a requested window.
//!
//! - `TrendMetrics`: totals, success rate, average duration, slowest and
//!   most-failed action for a date range
//! - `AnomalyDetection`: executions deviating from their type's baseline
//! - `OptimizationRecommendation`: rule-based suggestions
//! - `TrendComparison`: deltas between two periods
//! - `TrendAnalysisReport`: everything above for one trailing window

pub mod anomaly_detection;
pub mod optimization_recommendation;
pub mod trend_analysis_report;
pub mod trend_comparison;
pub mod trend_metrics;

pub use anomaly_detection::{AnomalyDetection, AnomalySeverity, DurationBaseline};
pub use optimization_recommendation::{
    ActionTypeStats, ErrorPattern, OptimizationRecommendation, RecommendationPriority,
};
pub use trend_analysis_report::{RecommendationSummary, TrendAnalysisReport};
pub use trend_comparison::{PeriodDeltas, TrendComparison};
pub use trend_metrics::{ExecutionSummary, MostFailedAction, SlowestAction, TrendMetrics};
