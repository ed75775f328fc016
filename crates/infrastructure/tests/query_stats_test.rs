use chrono::{Duration, TimeZone, Utc};
use ferrous_shield_application::ports::QueryStatsRepository;
use ferrous_shield_infrastructure::InMemoryQueryStats;
use std::sync::Arc;
use std::thread;

fn at(minutes: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

#[test]
fn test_unknown_domain_has_zero_count() {
    let stats = InMemoryQueryStats::new();
    assert_eq!(stats.query_count("never.com"), 0);
    assert!(stats.is_empty());
}

#[test]
fn test_record_query_accumulates_per_domain() {
    let stats = InMemoryQueryStats::new();
    stats.record_query("a.com", at(0));
    stats.record_query("a.com", at(1));
    stats.record_query("b.com", at(2));

    assert_eq!(stats.query_count("a.com"), 2);
    assert_eq!(stats.query_count("b.com"), 1);
    assert_eq!(stats.len(), 2);
}

#[test]
fn test_most_queried_orders_by_count_then_recency() {
    let stats = InMemoryQueryStats::new();
    for minute in 0..3 {
        stats.record_query("popular.com", at(minute));
    }
    stats.record_query("older.com", at(0));
    stats.record_query("newer.com", at(5));

    let top = stats.most_queried(10);
    let names: Vec<&str> = top.iter().map(|d| d.domain.as_str()).collect();

    assert_eq!(names, vec!["popular.com", "newer.com", "older.com"]);
    assert_eq!(top[0].count, 3);
    assert_eq!(top[0].last_queried, at(2));
}

#[test]
fn test_most_queried_respects_limit() {
    let stats = InMemoryQueryStats::new();
    for name in ["a.com", "b.com", "c.com"] {
        stats.record_query(name, at(0));
    }

    assert_eq!(stats.most_queried(2).len(), 2);
    assert!(stats.most_queried(0).is_empty());
}

#[test]
fn test_out_of_order_record_keeps_latest_timestamp() {
    let stats = InMemoryQueryStats::new();
    stats.record_query("a.com", at(10));
    stats.record_query("a.com", at(3));

    assert_eq!(stats.most_queried(1)[0].last_queried, at(10));
}

#[test]
fn test_remove_older_than_keeps_recent_counters() {
    let stats = InMemoryQueryStats::new();
    stats.record_query("stale.com", at(0));
    stats.record_query("fresh.com", at(0));
    stats.record_query("fresh.com", at(30));

    let removed = stats.remove_older_than(at(10));

    assert_eq!(removed, 1);
    assert_eq!(stats.query_count("stale.com"), 0);
    assert_eq!(stats.query_count("fresh.com"), 2);
}

#[test]
fn test_concurrent_recording_loses_no_queries() {
    let stats = Arc::new(InMemoryQueryStats::new());
    let mut handles = vec![];

    for _ in 0..8 {
        let stats = stats.clone();
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                stats.record_query("shared.com", Utc::now());
                stats.record_query(&format!("d{}.com", i % 10), Utc::now());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(stats.query_count("shared.com"), 4_000);
    assert_eq!(stats.len(), 11);
}
