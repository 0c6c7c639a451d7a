use std::sync::Arc;

use action_trends::models::insights::{AnomalySeverity, RecommendationPriority};
use action_trends::services::TrendAnalysisService;
use chrono::Duration;

use crate::common::{email_send_scenario, fixed_now, service_with, FailingStore};

#[tokio::test]
async fn test_complete_analysis_combines_all_three() {
    let now = fixed_now();
    let service = service_with(email_send_scenario(now));

    let report = service.complete_trend_analysis_at(now, 30).await.unwrap();

    assert_eq!(report.time_window_days, 30);
    assert_eq!(report.generated_at, now);
    assert_eq!(
        report.metrics.period,
        "2025-05-02T12:00:00.000Z to 2025-06-01T12:00:00.000Z"
    );
    assert_eq!(report.metrics.total_actions, 100);
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.high_severity_anomalies().count(), 1);

    // 20% failure rate, then "SMTP timeout" 20 times
    let issues: Vec<(&str, RecommendationPriority)> = report
        .recommendations
        .iter()
        .map(|r| (r.issue.as_str(), r.priority))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("High failure rate (20%)", RecommendationPriority::Medium),
            ("Recurring error: SMTP timeout", RecommendationPriority::High),
        ]
    );
    assert_eq!(report.recommendation_summary.high, 1);
    assert_eq!(report.recommendation_summary.medium, 1);
    assert_eq!(report.recommendation_summary.total(), 2);
}

#[tokio::test]
async fn test_complete_analysis_matches_individual_operations() {
    let now = fixed_now();
    let service = service_with(email_send_scenario(now));
    let since = now - Duration::days(7);

    let report = service.complete_trend_analysis_at(now, 7).await.unwrap();

    let metrics = service.calculate_trend_metrics(since, now, None).await.unwrap();
    let anomalies = service.detect_anomalies_since(since).await.unwrap();
    let recommendations = service
        .generate_optimization_recommendations_since(since)
        .await
        .unwrap();

    assert_eq!(report.metrics, metrics);
    assert_eq!(report.anomalies, anomalies);
    assert_eq!(report.recommendations, recommendations);
}

#[tokio::test]
async fn test_report_json_shape() {
    let now = fixed_now();
    let service = service_with(email_send_scenario(now));

    let report = service.complete_trend_analysis_at(now, 30).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["timeWindowDays"], 30);
    assert_eq!(json["metrics"]["successRate"], 80.0);
    assert_eq!(json["anomalies"][0]["severity"], "high");
    assert_eq!(json["anomalies"][0]["isAnomaly"], true);
    assert_eq!(json["recommendations"][0]["priority"], "medium");
    assert_eq!(json["recommendations"][0]["estimatedImprovement"], 10.0);
    assert_eq!(json["recommendationSummary"]["high"], 1);
    assert_eq!(report.anomalies[0].severity, AnomalySeverity::High);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let service = TrendAnalysisService::with_defaults(Arc::new(FailingStore));
    let now = fixed_now();

    let err = service.complete_trend_analysis_at(now, 30).await.unwrap_err();
    assert!(err.is_database_error());

    assert!(service
        .calculate_trend_metrics(now - Duration::days(1), now, None)
        .await
        .is_err());
    assert!(service.detect_anomalies(30).await.is_err());
    assert!(service.generate_optimization_recommendations(30).await.is_err());
    assert!(service
        .compare_trend_periods(now, now, now, now)
        .await
        .is_err());
}
