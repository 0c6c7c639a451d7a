//! # Database Operations
//!
//! Connection management and schema migrations for the PostgreSQL backend.
//!
//! - [`connection`] - pool construction from configuration
//! - [`migrations`] - embedded schema migrations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use action_trends::config::ConfigManager;
//! use action_trends::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let db = DatabaseConnection::from_config(manager.config()).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::DatabaseMigrations;
