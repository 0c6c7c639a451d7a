//! # Trend Analysis Configuration
//!
//! YAML-based configuration with environment-specific overrides. Every analysis
//! threshold that drives anomaly flagging and recommendation rules lives here
//! instead of in the code, so it can be tuned without a redeploy.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use action_trends::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//!
//! let database_url = manager.config().database_url();
//! let window = manager.config().analysis.default_time_window_days;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring trends-config.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrendsConfig {
    /// Database connection and pooling configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Analysis thresholds and windows
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Resolved environment name, set by the loader
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    "development".to_string()
}

/// Database connection and pooling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Run embedded migrations when the connection is opened
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: "trends".to_string(),
            password: "trends".to_string(),
            database: None,
            max_connections: 10,
            acquire_timeout_seconds: 30,
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    /// Database name for the given environment
    pub fn database_name(&self, environment: &str) -> String {
        if let Some(db_name) = &self.database {
            return db_name.clone();
        }
        format!("action_trends_{environment}")
    }

    /// Build the connection URL.
    ///
    /// An explicit `url` wins; a `${DATABASE_URL}` placeholder defers to the
    /// environment; otherwise the URL is assembled from components.
    pub fn database_url(&self, environment: &str) -> String {
        if let Some(url) = &self.url {
            if url.starts_with("${DATABASE_URL}") {
                if let Ok(env_url) = std::env::var("DATABASE_URL") {
                    return env_url;
                }
            } else if !url.is_empty() {
                return url.clone();
            }
        }

        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username,
            self.password,
            self.host,
            self.port,
            self.database_name(environment)
        )
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

/// Thresholds and windows for every analysis operation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trailing window used when callers don't pass one
    pub default_time_window_days: u32,
    pub anomaly: AnomalyThresholds,
    pub recommendations: RecommendationThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_time_window_days: 30,
            anomaly: AnomalyThresholds::default(),
            recommendations: RecommendationThresholds::default(),
        }
    }
}

/// Standard-deviation multipliers for anomaly flagging.
///
/// An execution is anomalous when its deviation from the baseline mean exceeds
/// `anomaly_stddev_multiplier` standard deviations. Severity escalates past the
/// medium and high multipliers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    pub anomaly_stddev_multiplier: f64,
    pub medium_stddev_multiplier: f64,
    pub high_stddev_multiplier: f64,
    /// Most recent executions per action type compared against the baseline
    pub recent_sample_size: u32,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            anomaly_stddev_multiplier: 2.0,
            medium_stddev_multiplier: 3.0,
            high_stddev_multiplier: 4.0,
            recent_sample_size: 5,
        }
    }
}

/// Cutoffs for the three recommendation rules
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Failure rate (percent) above which a type is reported
    pub failure_rate_percent: f64,
    /// Failure rate (percent) above which the report is high priority
    pub high_failure_rate_percent: f64,
    pub failure_improvement_factor: f64,
    pub max_failure_improvement: f64,

    /// Average duration (ms) above which a type is reported as slow
    pub slow_average_ms: f64,
    /// Average duration (ms) above which the slow report is high priority
    pub very_slow_average_ms: f64,
    pub slow_improvement: f64,

    /// Error message occurrences required before it counts as recurring
    pub recurring_error_min_occurrences: i64,
    /// Occurrences above which a recurring error is high priority
    pub frequent_error_occurrences: i64,
    pub recurring_error_improvement: f64,
    /// Number of top (action type, error message) groups inspected
    pub error_pattern_limit: u32,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            failure_rate_percent: 10.0,
            high_failure_rate_percent: 30.0,
            failure_improvement_factor: 0.5,
            max_failure_improvement: 50.0,
            slow_average_ms: 5000.0,
            very_slow_average_ms: 10000.0,
            slow_improvement: 30.0,
            recurring_error_min_occurrences: 3,
            frequent_error_occurrences: 10,
            recurring_error_improvement: 20.0,
            error_pattern_limit: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.default_time_window_days == 0 {
            return Err(ConfigurationError::invalid_value(
                "analysis.default_time_window_days",
                "0",
                "time window must be at least one day",
            ));
        }

        let anomaly = &self.anomaly;
        if !(anomaly.anomaly_stddev_multiplier >= 0.0) {
            return Err(ConfigurationError::invalid_value(
                "analysis.anomaly.anomaly_stddev_multiplier",
                anomaly.anomaly_stddev_multiplier.to_string(),
                "multiplier must be a non-negative number",
            ));
        }
        if anomaly.medium_stddev_multiplier < anomaly.anomaly_stddev_multiplier
            || anomaly.high_stddev_multiplier < anomaly.medium_stddev_multiplier
        {
            return Err(ConfigurationError::validation_error(format!(
                "anomaly multipliers must be ordered anomaly <= medium <= high (got {} / {} / {})",
                anomaly.anomaly_stddev_multiplier,
                anomaly.medium_stddev_multiplier,
                anomaly.high_stddev_multiplier
            )));
        }
        if anomaly.recent_sample_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "analysis.anomaly.recent_sample_size",
                "0",
                "sample size must be greater than 0",
            ));
        }

        let rec = &self.recommendations;
        if rec.high_failure_rate_percent < rec.failure_rate_percent {
            return Err(ConfigurationError::validation_error(
                "high_failure_rate_percent must not be below failure_rate_percent",
            ));
        }
        if rec.very_slow_average_ms < rec.slow_average_ms {
            return Err(ConfigurationError::validation_error(
                "very_slow_average_ms must not be below slow_average_ms",
            ));
        }
        if rec.frequent_error_occurrences < rec.recurring_error_min_occurrences {
            return Err(ConfigurationError::validation_error(
                "frequent_error_occurrences must not be below recurring_error_min_occurrences",
            ));
        }
        if rec.error_pattern_limit == 0 {
            return Err(ConfigurationError::invalid_value(
                "analysis.recommendations.error_pattern_limit",
                "0",
                "pattern limit must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl TrendsConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.database.url.as_deref().map_or(true, str::is_empty) && self.database.host.is_empty()
        {
            return Err(ConfigurationError::invalid_value(
                "database.host",
                "",
                "either database.url or database.host is required",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool size must be greater than 0",
            ));
        }

        self.analysis.validate()
    }

    pub fn database_url(&self) -> String {
        self.database.database_url(&self.environment)
    }
}
