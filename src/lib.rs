#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Action Trends
//!
//! Trend and anomaly analysis over the action execution log.
//!
//! ## Overview
//!
//! Every automated action that runs records one row in
//! `action_execution_logs`: its type, terminal status, duration and timestamp.
//! This crate turns those rows into operational insight:
//!
//! - trend metrics for a date range (volume, success rate, average latency,
//!   slowest and most-failing action)
//! - duration anomalies measured against each action type's baseline
//! - rule-based optimization recommendations
//! - side-by-side comparison of two periods
//! - a complete report for a trailing window, computed concurrently
//!
//! All analysis is read-only and stateless. Data access goes through the
//! [`store::ExecutionLogStore`] trait so the same service runs against
//! PostgreSQL in production and an in-memory store in tests.
//!
//! ## Module Organization
//!
//! - [`services`] - The trend analysis service
//! - [`store`] - Execution log access (PostgreSQL and in-memory)
//! - [`models`] - Log rows and computed insight payloads
//! - [`database`] - Connection pool and migrations
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use action_trends::config::ConfigManager;
//! use action_trends::database::DatabaseConnection;
//! use action_trends::services::TrendAnalysisService;
//! use action_trends::store::PgExecutionLogStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let db = DatabaseConnection::from_config(manager.config()).await?;
//!
//! let service = TrendAnalysisService::new(
//!     Arc::new(PgExecutionLogStore::new(db.pool().clone())),
//!     manager.config().analysis.clone(),
//! );
//!
//! let report = service.complete_trend_analysis(30).await?;
//! println!("success rate: {}%", report.metrics.success_rate);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib                      # Unit tests, no database needed
//! cargo test                            # In-memory integration and property tests
//! cargo test --features test-database   # PostgreSQL store tests (needs DATABASE_URL)
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use config::{AnalysisConfig, ConfigManager, DatabaseConfig, TrendsConfig};
pub use database::{DatabaseConnection, DatabaseMigrations};
pub use error::{Result, TrendError};
pub use models::insights::{
    AnomalyDetection, AnomalySeverity, OptimizationRecommendation, RecommendationPriority,
    TrendAnalysisReport, TrendComparison, TrendMetrics,
};
pub use models::{ActionExecutionLog, ExecutionStatus, NewActionExecutionLog};
pub use services::TrendAnalysisService;
pub use store::{ExecutionLogStore, InMemoryExecutionLogStore, PgExecutionLogStore, TimeRange};
