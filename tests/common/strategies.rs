use action_trends::models::{ExecutionStatus, NewActionExecutionLog};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use super::fixed_now;

/// Strategy for action type names drawn from a small pool so groups collide
pub fn action_type_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["email_send", "sms_send", "webhook_call", "report_generate"])
        .prop_map(str::to_string)
}

/// Strategy for terminal and non-terminal statuses
pub fn status_strategy() -> impl Strategy<Value = ExecutionStatus> {
    prop_oneof![
        4 => Just(ExecutionStatus::Success),
        2 => Just(ExecutionStatus::Failed),
        1 => Just(ExecutionStatus::Other("pending".to_string())),
    ]
}

/// Strategy for optional error messages
pub fn error_message_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["timeout", "rate limited", "bad gateway"]))
        .prop_map(|message| message.map(str::to_string))
}

/// Strategy for one execution within the 30 days before `fixed_now()`
pub fn new_execution_strategy() -> impl Strategy<Value = NewActionExecutionLog> {
    (
        action_type_strategy(),
        status_strategy(),
        0i32..20_000,
        error_message_strategy(),
        0i64..(30 * 24 * 60),
    )
        .prop_map(|(action_type, status, duration, error_message, minutes_ago)| {
            let executed_at: DateTime<Utc> = fixed_now() - Duration::minutes(minutes_ago);
            let log = match status {
                ExecutionStatus::Failed => NewActionExecutionLog::failed(
                    action_type,
                    duration,
                    error_message.as_deref(),
                    executed_at,
                ),
                _ => NewActionExecutionLog::success(action_type, duration, executed_at),
            };
            log.with_status(status)
        })
}

/// Strategy for a batch of executions
pub fn execution_log_strategy() -> impl Strategy<Value = Vec<NewActionExecutionLog>> {
    prop::collection::vec(new_execution_strategy(), 0..120)
}
