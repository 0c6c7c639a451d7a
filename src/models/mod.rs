//! # Models
//!
//! - [`action_execution_log`] - the persisted execution rows
//! - [`insights`] - computed analytics payloads (never stored)

pub mod action_execution_log;
pub mod insights;

pub use action_execution_log::{ActionExecutionLog, ExecutionStatus, NewActionExecutionLog};
