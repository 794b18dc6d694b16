//! Admission limiter behavior, both over HTTP and against the limiter directly.

use std::sync::Arc;

use todo_api::security::RateLimiter;

mod common;

#[tokio::test]
async fn burst_of_requests_is_throttled_over_http() {
    let mut config = common::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1.0;
    config.rate_limit.burst_size = 3.0;

    let app = common::spawn_app(config).await;

    let mut statuses = Vec::new();
    for _ in 0..4 {
        let response = app.client.get(app.url("/todos")).send().await.unwrap();
        statuses.push(response.status().as_u16());
    }

    assert_eq!(statuses, vec![200, 200, 200, 429]);
}

#[tokio::test]
async fn rejection_uses_the_json_envelope() {
    let mut config = common::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1.0;
    config.rate_limit.burst_size = 1.0;

    let app = common::spawn_app(config).await;

    let first = app.client.get(app.url("/todos")).send().await.unwrap();
    assert_eq!(first.status(), 200);

    let second = app.client.get(app.url("/todos")).send().await.unwrap();
    assert_eq!(second.status(), 429);
    let envelope: serde_json::Value = second.json().await.unwrap();
    assert_eq!(envelope["status"]["code"], 429);
    assert_eq!(envelope["status"]["error"], true);
    assert_eq!(
        envelope["status"]["error_message"],
        "too many requests, retry later"
    );
    assert_eq!(envelope["data"], serde_json::Value::Null);
}

#[test]
fn concurrent_admits_consume_exactly_the_burst() {
    // 16 threads race on one fresh identifier with burst 3: exactly 3 may
    // win, and the registry must end with a single bucket.
    let clock = Arc::new(todo_api::security::ManualClock::new());
    let limiter = Arc::new(RateLimiter::with_clock(1.0, 3.0, clock));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let limiter = limiter.clone();
            std::thread::spawn(move || limiter.admit("192.0.2.7"))
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|handle| handle.join().expect("admit thread"))
        .filter(|admitted| *admitted)
        .count();

    assert_eq!(admitted, 3);
    assert_eq!(limiter.bucket_count(), 1);
}

#[test]
fn distinct_clients_get_distinct_buckets() {
    let limiter = RateLimiter::new(1.0, 1.0);

    assert!(limiter.admit("192.0.2.1"));
    assert!(!limiter.admit("192.0.2.1"));
    assert!(limiter.admit("192.0.2.2"));
    assert_eq!(limiter.bucket_count(), 2);
}
