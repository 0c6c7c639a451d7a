pub mod trend_analysis_service;

pub use trend_analysis_service::{window_start, TrendAnalysisService};
