//! Contract Test: Reconcile Idempotency & Paginated Discovery
//!
//! Constraints verified:
//! - Reconciling the same name twice creates once, then updates
//! - Zone discovery walks every page exactly once per provider
//! - Record lookup walks every page of a zone's listing
//! - Record listings are re-read after a successful write
//! - A provider without credentials never claims a name
//!
//! If this test fails, repeated runs can duplicate records.

mod common;

use common::*;
use ddns_core::{
    DnsProvider, Dispatcher, Error, ReconcileOutcome, RecordKind, UpdateRequest, ZoneReconciler,
};
use std::time::Duration;

fn request(name: &str, content: &str) -> UpdateRequest {
    UpdateRequest::new(name, content, Duration::ZERO)
}

#[tokio::test]
async fn reconciling_twice_creates_then_updates() {
    let log = CallLog::new();
    let api = PagedZoneApi::new(two_page_zones(), &log);
    let records = api.records_handle();
    let mut dispatcher = Dispatcher::new(vec![boxed(ZoneReconciler::new(api))]);

    let first = dispatcher
        .update_name(&request("home.example.com", "203.0.113.7"))
        .await
        .unwrap();
    let second = dispatcher
        .update_name(&request("home.example.com", "203.0.113.9"))
        .await
        .unwrap();

    assert!(matches!(
        first.outcome,
        ReconcileOutcome::Created { ref zone_id, ttl: 1, .. } if zone_id == "z-ex"
    ));
    match second.outcome {
        ReconcileOutcome::Updated {
            record_id,
            previous_content,
            content,
            ..
        } => {
            assert_eq!(record_id, "rec-1");
            assert_eq!(previous_content, "203.0.113.7");
            assert_eq!(content, "203.0.113.9");
        }
        other => panic!("expected an update, got {other:?}"),
    }

    assert_eq!(log.count_matching("create "), 1);
    assert_eq!(log.count_matching("update z-ex rec-1 203.0.113.9 ttl=1"), 1);
    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn zone_pages_are_fetched_once() {
    let log = CallLog::new();
    let mut provider = ZoneReconciler::new(PagedZoneApi::new(two_page_zones(), &log));

    let zones = provider.zones().await.unwrap();
    let names: Vec<_> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["a.com", "example.com", "other.org"]);

    assert!(provider.owns_record("www.other.org").await.unwrap());
    assert!(provider.owns_record("home.example.com").await.unwrap());
    assert!(!provider.owns_record("home.example.net").await.unwrap());

    assert_eq!(
        log.entries()
            .into_iter()
            .filter(|e| e.starts_with("list_zones"))
            .collect::<Vec<_>>(),
        vec!["list_zones 0", "list_zones 2"]
    );
}

#[tokio::test]
async fn zone_on_second_page_receives_the_record() {
    let log = CallLog::new();
    let mut dispatcher = Dispatcher::new(vec![boxed(ZoneReconciler::new(PagedZoneApi::new(
        two_page_zones(),
        &log,
    )))]);

    let report = dispatcher
        .update_name(&request("www.other.org", "2001:db8::1"))
        .await
        .unwrap();

    assert_eq!(report.kind, RecordKind::Aaaa);
    assert_eq!(log.count_matching("create z-other www.other.org AAAA 2001:db8::1"), 1);
}

#[tokio::test]
async fn record_on_second_page_is_updated_in_place() {
    let log = CallLog::new();
    let api = PagedZoneApi::new(two_page_zones(), &log)
        .with_record_page_size(2)
        .with_record(record("r-www", "www.example.com", RecordKind::A, "198.51.100.1", "z-ex"))
        .with_record(record("r-api", "api.example.com", RecordKind::A, "198.51.100.2", "z-ex"))
        .with_record(record("r-home", "home.example.com", RecordKind::A, "203.0.113.7", "z-ex"));
    let records = api.records_handle();
    let mut dispatcher = Dispatcher::new(vec![boxed(ZoneReconciler::new(api))]);

    for content in ["203.0.113.8", "203.0.113.9"] {
        let report = dispatcher
            .update_name(&request("home.example.com", content))
            .await
            .unwrap();
        assert!(matches!(
            report.outcome,
            ReconcileOutcome::Updated { ref record_id, .. } if record_id == "r-home"
        ));
    }

    assert_eq!(log.count_matching("create "), 0);
    assert_eq!(log.count_matching("update z-ex r-home 203.0.113.8"), 1);
    assert_eq!(log.count_matching("update z-ex r-home 203.0.113.9"), 1);
    assert_eq!(
        log.entries()
            .into_iter()
            .filter(|e| e.starts_with("list_records"))
            .collect::<Vec<_>>(),
        vec![
            "list_records z-ex 0",
            "list_records z-ex 2",
            "list_records z-ex 0",
            "list_records z-ex 2",
        ]
    );
    assert_eq!(records.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn existing_record_with_other_kind_is_not_touched() {
    let log = CallLog::new();
    let api = PagedZoneApi::new(two_page_zones(), &log).with_record(record(
        "r-v6",
        "home.example.com",
        RecordKind::Aaaa,
        "2001:db8::1",
        "z-ex",
    ));
    let mut dispatcher = Dispatcher::new(vec![boxed(ZoneReconciler::new(api))]);

    dispatcher
        .update_name(&request("home.example.com", "203.0.113.7"))
        .await
        .unwrap();

    assert_eq!(log.count_matching("update "), 0);
    assert_eq!(log.count_matching("create z-ex home.example.com A 203.0.113.7"), 1);
}

#[tokio::test]
async fn ttl_is_rounded_to_whole_seconds() {
    let log = CallLog::new();
    let mut dispatcher = Dispatcher::new(vec![boxed(ZoneReconciler::new(PagedZoneApi::new(
        two_page_zones(),
        &log,
    )))]);

    dispatcher
        .update_name(&UpdateRequest::new(
            "home.example.com",
            "203.0.113.7",
            Duration::from_millis(1500),
        ))
        .await
        .unwrap();

    assert_eq!(log.count_matching("create z-ex home.example.com A 203.0.113.7 ttl=2"), 1);
}

#[tokio::test]
async fn unconfigured_provider_is_skipped() {
    let log = CallLog::new();
    let unconfigured =
        ZoneReconciler::new(PagedZoneApi::new(two_page_zones(), &log).unconfigured());
    let fallback = MockDnsProvider::new("fallback", &log).owning("example.com");
    let mut dispatcher = Dispatcher::new(vec![boxed(unconfigured), fallback.boxed()]);

    let report = dispatcher
        .update_name(&request("home.example.com", "203.0.113.7"))
        .await
        .unwrap();

    assert_eq!(report.provider, "fallback");
    assert_eq!(log.count_matching("list_zones"), 0);
}

#[tokio::test]
async fn unconfigured_provider_refuses_direct_reconcile() {
    let log = CallLog::new();
    let mut provider =
        ZoneReconciler::new(PagedZoneApi::new(two_page_zones(), &log).unconfigured());

    let err = provider
        .reconcile("home.example.com", RecordKind::A, "203.0.113.7", Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unconfigured(_)));
    assert!(log.entries().is_empty());
}
