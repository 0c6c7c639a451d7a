use std::sync::Arc;

use action_trends::models::{ActionExecutionLog, NewActionExecutionLog};
use action_trends::services::TrendAnalysisService;
use action_trends::store::{
    ExecutionLogStore, InMemoryExecutionLogStore, PgExecutionLogStore, TimeRange,
};
use chrono::Duration;
use sqlx::PgPool;

use crate::common::{email_send_scenario, executions, fixed_now};

async fn seed(store: &PgExecutionLogStore, logs: Vec<NewActionExecutionLog>) {
    for log in logs {
        store.append(log).await.unwrap();
    }
}

/// Numeric AVG and f64 division may differ in the last bits
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn mixed_fixture() -> Vec<NewActionExecutionLog> {
    let now = fixed_now();
    let mut logs = email_send_scenario(now);
    logs.extend(executions("report_generate", 12, 6, 7000, now - Duration::hours(3)));
    logs.push(NewActionExecutionLog::failed(
        "report_generate",
        15_000,
        None,
        now - Duration::minutes(5),
    ));
    logs
}

#[sqlx::test]
async fn test_append_and_find(pool: PgPool) -> sqlx::Result<()> {
    let store = PgExecutionLogStore::new(pool.clone());
    let now = fixed_now();

    let row = store
        .append(NewActionExecutionLog::failed("sms_send", 420, Some("carrier rejected"), now))
        .await
        .unwrap();

    assert_eq!(row.action_type, "sms_send");
    assert_eq!(row.status, "failed");
    assert_eq!(row.error_message.as_deref(), Some("carrier rejected"));

    let found = ActionExecutionLog::find_by_id(&pool, row.id).await?;
    assert_eq!(found, Some(row));

    Ok(())
}

#[sqlx::test]
async fn test_primitives_match_in_memory_store(pool: PgPool) -> sqlx::Result<()> {
    let pg = PgExecutionLogStore::new(pool);
    seed(&pg, mixed_fixture()).await;
    let memory = InMemoryExecutionLogStore::with_logs(mixed_fixture());

    let now = fixed_now();
    let since = now - Duration::days(30);
    let range = TimeRange::new(since, now);

    for action_type in [None, Some("email_send"), Some("report_generate")] {
        let (a, b) = (
            pg.execution_summary(&range, action_type).await.unwrap(),
            memory.execution_summary(&range, action_type).await.unwrap(),
        );
        assert_eq!(
            (a.total_actions, a.success_count, a.failure_count),
            (b.total_actions, b.success_count, b.failure_count)
        );
        assert!(close(a.average_duration.unwrap_or(0.0), b.average_duration.unwrap_or(0.0)));
        assert_eq!(
            pg.slowest_action(&range, action_type).await.unwrap(),
            memory.slowest_action(&range, action_type).await.unwrap()
        );
        assert_eq!(
            pg.most_failed_action(&range, action_type).await.unwrap(),
            memory.most_failed_action(&range, action_type).await.unwrap()
        );
    }

    let pg_baselines = pg.duration_baselines(since).await.unwrap();
    let memory_baselines = memory.duration_baselines(since).await.unwrap();
    assert_eq!(pg_baselines.len(), memory_baselines.len());
    for (a, b) in pg_baselines.iter().zip(&memory_baselines) {
        assert_eq!(a.action_type, b.action_type);
        assert_eq!(a.sample_count, b.sample_count);
        assert!(close(a.mean_duration, b.mean_duration));
        assert!(close(a.stddev_duration, b.stddev_duration));
    }

    assert_eq!(
        pg.recent_durations("email_send", since, 5).await.unwrap(),
        memory.recent_durations("email_send", since, 5).await.unwrap()
    );
    let pg_stats = pg.action_type_stats(since).await.unwrap();
    let memory_stats = memory.action_type_stats(since).await.unwrap();
    assert_eq!(pg_stats.len(), memory_stats.len());
    for (a, b) in pg_stats.iter().zip(&memory_stats) {
        assert_eq!(
            (&a.action_type, a.total_executions, a.failed_executions),
            (&b.action_type, b.total_executions, b.failed_executions)
        );
        assert!(close(a.average_duration, b.average_duration));
    }
    assert_eq!(
        pg.error_patterns(since, 5).await.unwrap(),
        memory.error_patterns(since, 5).await.unwrap()
    );

    Ok(())
}

#[sqlx::test]
async fn test_complete_analysis_against_postgres(pool: PgPool) -> sqlx::Result<()> {
    let store = PgExecutionLogStore::new(pool);
    let now = fixed_now();
    seed(&store, email_send_scenario(now)).await;
    let service = TrendAnalysisService::with_defaults(Arc::new(store));

    let report = service.complete_trend_analysis_at(now, 30).await.unwrap();

    assert_eq!(report.metrics.total_actions, 100);
    assert_eq!(report.metrics.success_rate, 80.0);
    assert_eq!(report.metrics.slowest_action.unwrap().duration, 9000);
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.anomalies[0].actual_duration, 9000);
    assert_eq!(report.recommendation_summary.total(), 2);

    Ok(())
}

#[sqlx::test]
async fn test_empty_table(pool: PgPool) -> sqlx::Result<()> {
    let service = TrendAnalysisService::with_defaults(Arc::new(PgExecutionLogStore::new(pool)));
    let now = fixed_now();

    let metrics = service
        .calculate_trend_metrics(now - Duration::days(7), now, None)
        .await
        .unwrap();
    assert!(metrics.is_empty());
    assert!(metrics.slowest_action.is_none());
    assert!(metrics.most_failed_action.is_none());

    assert!(service
        .detect_anomalies_since(now - Duration::days(7))
        .await
        .unwrap()
        .is_empty());

    Ok(())
}
