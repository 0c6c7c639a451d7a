//! # Period Comparison
//!
//! Raw arithmetic differences between two `TrendMetrics`, each delta computed
//! as `period2 - period1`. No significance testing; sample size is ignored.

use serde::{Deserialize, Serialize};

use super::trend_metrics::TrendMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDeltas {
    pub success_rate_change: f64,
    pub average_duration_change: i64,
    pub total_actions_change: i64,
    pub failure_rate_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub period1: TrendMetrics,
    pub period2: TrendMetrics,
    pub comparison: PeriodDeltas,
}

impl TrendComparison {
    pub fn between(period1: TrendMetrics, period2: TrendMetrics) -> Self {
        let comparison = PeriodDeltas {
            success_rate_change: period2.success_rate - period1.success_rate,
            average_duration_change: period2.average_duration - period1.average_duration,
            total_actions_change: period2.total_actions - period1.total_actions,
            failure_rate_change: period2.unsuccessful_rate() - period1.unsuccessful_rate(),
        };

        Self {
            period1,
            period2,
            comparison,
        }
    }
}
