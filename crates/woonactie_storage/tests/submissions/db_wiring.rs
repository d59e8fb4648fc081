#![forbid(unsafe_code)]

use chrono::{TimeZone, Utc};
use woonactie_contracts::SubmissionInput;
use woonactie_storage::{MemorySubmissionStore, StoreError, SubmissionStore};

fn lead_input(full_name: &str, postcode: &str, solution: &str) -> SubmissionInput {
    SubmissionInput {
        postcode: postcode.to_string(),
        house_number: "12".to_string(),
        house_number_suffix: String::new(),
        solution: solution.to_string(),
        full_name: full_name.to_string(),
        email: "jan@example.nl".to_string(),
        phone: "0612345678".to_string(),
    }
}

#[test]
fn insert_assigns_server_id_and_timestamps() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let created_at = Utc.with_ymd_and_hms(2026, 8, 21, 9, 0, 0).unwrap();

    let record = store
        .insert_at(&lead_input("Jan de Vries", "1234AB", "warmtepomp"), created_at)
        .unwrap();

    assert!(record.id.as_str().starts_with("sub_000001_"));
    assert_eq!(record.created_at, created_at);
    assert_eq!(record.updated_at, created_at);
    assert_eq!(store.submission_count(), 1);
}

#[test]
fn identical_retries_create_distinct_records() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let created_at = Utc.with_ymd_and_hms(2026, 8, 21, 9, 0, 0).unwrap();
    let input = lead_input("Jan de Vries", "1234AB", "zonnepanelen");

    let first = store.insert_at(&input, created_at).unwrap();
    let second = store.insert_at(&input, created_at).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(store.submission_count(), 2);
}

#[test]
fn list_all_returns_newest_first() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 8, d, h, 0, 0).unwrap();

    store
        .insert_at(&lead_input("Eerste", "1111AA", "dakwerk"), day(19, 10))
        .unwrap();
    store
        .insert_at(&lead_input("Derde", "3333CC", "kozijnen"), day(21, 8))
        .unwrap();
    store
        .insert_at(&lead_input("Tweede", "2222BB", "warmtepomp"), day(20, 14))
        .unwrap();

    let rows = store.list_all().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["Derde", "Tweede", "Eerste"]);
}

#[test]
fn list_all_breaks_timestamp_ties_by_latest_insert() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let at = Utc.with_ymd_and_hms(2026, 8, 21, 12, 0, 0).unwrap();

    store
        .insert_at(&lead_input("Eerder", "1111AA", "thuisbatterij"), at)
        .unwrap();
    store
        .insert_at(&lead_input("Later", "2222BB", "alarmsysteem"), at)
        .unwrap();

    let rows = store.list_all().unwrap();
    assert_eq!(rows[0].full_name, "Later");
    assert_eq!(rows[1].full_name, "Eerder");
}

#[test]
fn insert_rejects_contract_violations_without_storing() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let mut input = lead_input("Jan", "1234AB", "warmtepomp");
    input.phone = String::new();

    let out = store.insert(&input);
    assert!(matches!(out, Err(StoreError::ContractViolation(_))));
    assert_eq!(store.submission_count(), 0);

    let mut input = lead_input("Jan", "1234AB", "warmtepomp");
    input.solution = "zonneboiler".to_string();
    let out = store.insert(&input);
    assert!(matches!(out, Err(StoreError::ContractViolation(_))));
    assert_eq!(store.submission_count(), 0);
}

#[test]
fn insert_preserves_raw_field_values() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let mut input = lead_input("  Jan de Vries  ", "1234 ab", "traprenovatie");
    input.house_number_suffix = "bis".to_string();

    let record = store.insert(&input).unwrap();
    assert_eq!(record.full_name, "  Jan de Vries  ");
    assert_eq!(record.postcode, "1234 ab");
    assert_eq!(record.address_line(), "1234 ab 12 bis");
}
