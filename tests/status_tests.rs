use relquota::{QuotaSubject, QuotaTable, StatusReporter, UNLIMITED_BYTES};
use serde_json::json;

#[test]
fn test_status_reports_only_callers_namespace() {
    let table = QuotaTable::new(16);
    let lease1 = table.attach(1).unwrap();
    let lease2 = table.attach(2).unwrap();
    lease1.upsert_object(100, 1000, 500).unwrap();
    lease1.upsert_principal(7, UNLIMITED_BYTES, 9000).unwrap();
    lease2.upsert_object(100, 1000, 999).unwrap();

    let reporter = StatusReporter::new(table);
    let rows = reporter.namespace_status(1).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].subject, QuotaSubject::Object(100));
    assert_eq!(rows[0].used_bytes, 500);
    assert_eq!(rows[0].limit_bytes, Some(1000));
    assert_eq!(rows[1].subject, QuotaSubject::Principal(7));
    assert_eq!(rows[1].limit_bytes, None);
}

#[test]
fn test_status_rows_are_sorted() {
    let table = QuotaTable::new(16);
    let lease = table.attach(1).unwrap();
    lease.upsert_principal(3, 1000, 10).unwrap();
    lease.upsert_object(200, 1000, 10).unwrap();
    lease.upsert_object(100, 1000, 10).unwrap();

    let reporter = StatusReporter::new(table);
    let rows = reporter.namespace_status(1).unwrap();

    let subjects: Vec<QuotaSubject> = rows.iter().map(|row| row.subject).collect();
    assert_eq!(
        subjects,
        vec![
            QuotaSubject::Object(100),
            QuotaSubject::Object(200),
            QuotaSubject::Principal(3),
        ]
    );
}

#[test]
fn test_status_row_serializes_unlimited_as_null() {
    let table = QuotaTable::new(16);
    let lease = table.attach(1).unwrap();
    lease.upsert_object(100, UNLIMITED_BYTES, 500).unwrap();

    let reporter = StatusReporter::new(table);
    let rows = reporter.namespace_status(1).unwrap();

    let value = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(
        value,
        json!({
            "subject": { "kind": "object", "id": 100 },
            "used_bytes": 500,
            "limit_bytes": null,
        })
    );
}

#[test]
fn test_status_of_empty_namespace_is_empty() {
    let table = QuotaTable::new(16);
    let lease = table.attach(1).unwrap();
    lease.upsert_object(100, 1000, 500).unwrap();

    let reporter = StatusReporter::new(table);
    assert!(reporter.namespace_status(9).unwrap().is_empty());
}
