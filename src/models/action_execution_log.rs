//! # Action Execution Log
//!
//! One row per executed automated action, written by the action-execution
//! subsystem. The table is append-only: this crate reads it for analysis and
//! only appends rows when seeding fixtures.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE action_execution_logs (
//!   id BIGSERIAL PRIMARY KEY,
//!   action_type VARCHAR(128) NOT NULL,
//!   status VARCHAR(32) NOT NULL,
//!   duration INTEGER NOT NULL,
//!   error_message TEXT,
//!   executed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;

/// Terminal state recorded for an execution.
///
/// Anything other than `success` or `failed` (for example `pending`) is kept
/// verbatim and counts toward totals but toward neither outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    pub const SUCCESS: &'static str = "success";
    pub const FAILED: &'static str = "failed";

    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Success => Self::SUCCESS,
            ExecutionStatus::Failed => Self::FAILED,
            ExecutionStatus::Other(status) => status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionStatus::Failed)
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        match value {
            Self::SUCCESS => ExecutionStatus::Success,
            Self::FAILED => ExecutionStatus::Failed,
            other => ExecutionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        ExecutionStatus::from(value.as_str())
    }
}

impl From<ExecutionStatus> for String {
    fn from(value: ExecutionStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted execution row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActionExecutionLog {
    pub id: i64,
    pub action_type: String,
    pub status: String,
    /// Milliseconds
    pub duration: i32,
    pub error_message: Option<String>,
    pub executed_at: DateTime<Utc>,
}

/// New execution row for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActionExecutionLog {
    pub action_type: String,
    pub status: ExecutionStatus,
    pub duration: i32,
    pub error_message: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl NewActionExecutionLog {
    pub fn success(action_type: impl Into<String>, duration: i32, executed_at: DateTime<Utc>) -> Self {
        Self {
            action_type: action_type.into(),
            status: ExecutionStatus::Success,
            duration,
            error_message: None,
            executed_at,
        }
    }

    pub fn failed(
        action_type: impl Into<String>,
        duration: i32,
        error_message: Option<&str>,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            status: ExecutionStatus::Failed,
            duration,
            error_message: error_message.map(str::to_string),
            executed_at,
        }
    }

    pub fn with_status(mut self, status: ExecutionStatus) -> Self {
        self.status = status;
        self
    }
}

impl ActionExecutionLog {
    pub fn execution_status(&self) -> ExecutionStatus {
        ExecutionStatus::from(self.status.as_str())
    }

    /// Append a new execution row.
    pub async fn create(
        pool: &PgPool,
        new_log: NewActionExecutionLog,
    ) -> Result<ActionExecutionLog, sqlx::Error> {
        sqlx::query_as::<_, ActionExecutionLog>(
            r#"
            INSERT INTO action_execution_logs (action_type, status, duration, error_message, executed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, action_type, status, duration, error_message, executed_at
            "#,
        )
        .bind(&new_log.action_type)
        .bind(new_log.status.as_str())
        .bind(new_log.duration)
        .bind(&new_log.error_message)
        .bind(new_log.executed_at)
        .fetch_one(pool)
        .await
    }

    /// Find an execution row by id.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ActionExecutionLog>, sqlx::Error> {
        sqlx::query_as::<_, ActionExecutionLog>(
            r#"
            SELECT id, action_type, status, duration, error_message, executed_at
            FROM action_execution_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
