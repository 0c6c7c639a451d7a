use action_trends::models::insights::RecommendationPriority;
use action_trends::models::NewActionExecutionLog;
use chrono::{DateTime, Duration, Utc};

use crate::common::{executions, fixed_now, service_with};

/// `count` runs with `failed` failures, every failure carrying a distinct
/// message so no recurring-error pattern forms
fn distinct_failures(
    action_type: &str,
    count: i64,
    failed: i64,
    duration: i32,
    now: DateTime<Utc>,
) -> Vec<NewActionExecutionLog> {
    (0..count)
        .map(|i| {
            let at = now - Duration::minutes(i);
            if i < failed {
                let message = format!("upstream error #{i}");
                NewActionExecutionLog::failed(action_type, duration, Some(&message), at)
            } else {
                NewActionExecutionLog::success(action_type, duration, at)
            }
        })
        .collect()
}

fn since() -> DateTime<Utc> {
    fixed_now() - Duration::days(30)
}

#[tokio::test]
async fn test_fifteen_percent_failure_rate() {
    let service = service_with(distinct_failures("sms_send", 100, 15, 1000, fixed_now()));

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    assert_eq!(recommendations.len(), 1);
    let rec = &recommendations[0];
    assert_eq!(rec.action_type, "sms_send");
    assert_eq!(rec.priority, RecommendationPriority::Medium);
    assert_eq!(rec.estimated_improvement, 7.5);
    assert_eq!(rec.issue, "High failure rate (15%)");
    assert_eq!(
        rec.recommendation,
        "Review error logs and implement retry logic with exponential backoff for sms_send"
    );
}

#[tokio::test]
async fn test_failure_rate_cutoffs() {
    let now = fixed_now();
    let mut logs = distinct_failures("exactly_ten", 100, 10, 1000, now);
    logs.extend(distinct_failures("thirty_five", 100, 35, 1000, now));
    logs.extend(distinct_failures("all_failing", 10, 10, 1000, now));
    let service = service_with(logs);

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    let summary: Vec<(&str, RecommendationPriority, f64)> = recommendations
        .iter()
        .map(|r| (r.action_type.as_str(), r.priority, r.estimated_improvement))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("all_failing", RecommendationPriority::High, 50.0),
            ("thirty_five", RecommendationPriority::High, 17.5),
        ]
    );
}

#[tokio::test]
async fn test_latency_cutoffs() {
    let now = fixed_now();
    let mut logs = executions("at_five_seconds", 5, 0, 5000, now);
    logs.extend(executions("seven_seconds", 5, 0, 7000, now));
    logs.extend(executions("twelve_seconds", 5, 0, 12_000, now));
    let service = service_with(logs);

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0].action_type, "seven_seconds");
    assert_eq!(recommendations[0].priority, RecommendationPriority::Medium);
    assert_eq!(recommendations[0].issue, "Slow execution (7000ms average)");
    assert_eq!(recommendations[1].action_type, "twelve_seconds");
    assert_eq!(recommendations[1].priority, RecommendationPriority::High);
    assert!(recommendations.iter().all(|r| r.estimated_improvement == 30.0));
}

#[tokio::test]
async fn test_recurring_errors() {
    let now = fixed_now();
    let mut logs = Vec::new();
    // Keep failure rates under 10% so only the error rule fires
    logs.extend(executions("filler", 1000, 0, 100, now));
    for (message, occurrences) in [("timeout", 12), ("rate limited", 4), ("bad gateway", 3)] {
        for i in 0..occurrences {
            logs.push(NewActionExecutionLog::failed(
                "filler",
                100,
                Some(message),
                now - Duration::seconds(i),
            ));
        }
    }
    let service = service_with(logs);

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    let issues: Vec<(&str, RecommendationPriority)> = recommendations
        .iter()
        .map(|r| (r.issue.as_str(), r.priority))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("Recurring error: timeout", RecommendationPriority::High),
            ("Recurring error: rate limited", RecommendationPriority::Medium),
        ]
    );
    assert_eq!(
        recommendations[0].recommendation,
        "Implement specific error handling for \"timeout\" in filler"
    );
    assert!(recommendations.iter().all(|r| r.estimated_improvement == 20.0));
}

#[tokio::test]
async fn test_missing_error_message_is_reported_as_unknown() {
    let now = fixed_now();
    let mut logs = executions("filler", 200, 0, 100, now);
    logs.extend(executions("filler", 5, 5, 100, now - Duration::hours(1)));
    let service = service_with(logs);

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].issue, "Recurring error: unknown error");
}

#[tokio::test]
async fn test_only_top_error_patterns_are_considered() {
    let now = fixed_now();
    let mut logs = executions("filler", 5000, 0, 100, now);
    for pattern in 0..7 {
        let message = format!("error kind {pattern}");
        for i in 0..(5 + pattern) {
            logs.push(NewActionExecutionLog::failed(
                "filler",
                100,
                Some(&message),
                now - Duration::seconds(i),
            ));
        }
    }
    let service = service_with(logs);

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    // Seven qualifying patterns, five fetched, most frequent first
    let issues: Vec<&str> = recommendations.iter().map(|r| r.issue.as_str()).collect();
    assert_eq!(
        issues,
        vec![
            "Recurring error: error kind 6",
            "Recurring error: error kind 5",
            "Recurring error: error kind 4",
            "Recurring error: error kind 3",
            "Recurring error: error kind 2",
        ]
    );
}

#[tokio::test]
async fn test_healthy_window_has_no_recommendations() {
    let service = service_with(executions("email_send", 50, 2, 300, fixed_now()));

    let recommendations = service
        .generate_optimization_recommendations_since(since())
        .await
        .unwrap();

    assert!(recommendations.is_empty());
}
