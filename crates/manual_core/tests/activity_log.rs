use manual_core::{format_entry, ActivityLog, LOG_CAPACITY};

#[test]
fn keeps_the_latest_entries_in_order() {
    let mut log = ActivityLog::new();
    for i in 0..(LOG_CAPACITY + 25) {
        log.push(format!("entry {i}"));
    }

    assert_eq!(log.len(), LOG_CAPACITY);
    let entries: Vec<_> = log.entries().collect();
    assert_eq!(entries.first().copied(), Some("entry 25"));
    assert_eq!(entries.last().copied(), Some("entry 224"));
    for (offset, entry) in entries.iter().enumerate() {
        assert_eq!(*entry, format!("entry {}", offset + 25));
    }
}

#[test]
fn restoring_an_oversized_list_truncates_oldest() {
    let stored: Vec<String> = (0..250).map(|i| format!("line {i}")).collect();
    let log = ActivityLog::from_entries(stored);

    let entries = log.into_entries();
    assert_eq!(entries.len(), 200);
    assert_eq!(entries[0], "line 50");
    assert_eq!(entries[199], "line 249");
}

#[test]
fn record_prefixes_timestamp_and_viewer_order_is_reversed() {
    let mut log = ActivityLog::new();
    log.record("2024-01-01T00:00:00+00:00", "first");
    log.record("2024-01-01T00:00:01+00:00", "second");

    assert_eq!(
        format_entry("2024-01-01T00:00:00+00:00", "first"),
        "[2024-01-01T00:00:00+00:00] first"
    );
    let latest: Vec<_> = log.latest_first().collect();
    assert_eq!(
        latest,
        vec![
            "[2024-01-01T00:00:01+00:00] second",
            "[2024-01-01T00:00:00+00:00] first",
        ]
    );

    log.clear();
    assert!(log.is_empty());
}
