use parcel_core::db::migrations::latest_version;
use parcel_core::db::open_db_in_memory;
use parcel_core::{Parcel, ParcelRepository, ParcelStatus, RepoError, SqliteParcelStore};
use rusqlite::Connection;
use std::collections::HashMap;

const CREATED_AT: &str = "2024-01-01T00:00:00Z";

fn test_parcel() -> Parcel {
    Parcel::new(1000, "test", CREATED_AT)
}

#[test]
fn add_get_delete_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let mut parcel = test_parcel();
    let number = store.add(&parcel).unwrap();
    assert!(number > 0);
    parcel.number = number;

    let loaded = store.get(number).unwrap();
    assert_eq!(loaded, parcel);

    assert_eq!(store.delete(number).unwrap(), 1);

    let err = store.get(number).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == number));
}

#[test]
fn add_ignores_caller_supplied_number() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let mut parcel = test_parcel();
    parcel.number = 4242;
    let first = store.add(&parcel).unwrap();
    let second = store.add(&parcel).unwrap();

    assert_ne!(first, 4242);
    assert_ne!(first, second);
    assert!(matches!(store.get(4242), Err(RepoError::NotFound(4242))));
}

#[test]
fn numbers_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let first = store.add(&test_parcel()).unwrap();
    store.delete(first).unwrap();
    let second = store.add(&test_parcel()).unwrap();

    assert!(second > first);
}

#[test]
fn get_missing_parcel_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let err = store.get(7).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
    assert_eq!(err.to_string(), "parcel not found: 7");
}

#[test]
fn set_address_updates_registered_parcel() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&test_parcel()).unwrap();
    assert_eq!(store.set_address(number, "new test address").unwrap(), 1);

    let loaded = store.get(number).unwrap();
    assert_eq!(loaded.address, "new test address");
}

#[test]
fn set_address_is_silent_no_op_after_registration() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&test_parcel()).unwrap();
    store.set_status(number, ParcelStatus::Sent).unwrap();
    let before = store.get(number).unwrap();

    assert_eq!(store.set_address(number, "too late").unwrap(), 0);

    let after = store.get(number).unwrap();
    assert_eq!(after, before);
    assert_eq!(after.address, "test");
}

#[test]
fn set_status_is_unconditional() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&test_parcel()).unwrap();
    for status in [
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
        ParcelStatus::Registered,
        ParcelStatus::Delivered,
    ] {
        assert_eq!(store.set_status(number, status).unwrap(), 1);
        assert_eq!(store.get(number).unwrap().status, status);
    }
}

#[test]
fn delete_is_silent_no_op_after_registration() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&test_parcel()).unwrap();
    store.set_status(number, ParcelStatus::Delivered).unwrap();
    let before = store.get(number).unwrap();

    assert_eq!(store.delete(number).unwrap(), 0);
    assert_eq!(store.get(number).unwrap(), before);
}

#[test]
fn mutators_on_missing_parcel_affect_no_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    assert_eq!(store.set_status(99, ParcelStatus::Sent).unwrap(), 0);
    assert_eq!(store.set_address(99, "nowhere").unwrap(), 0);
    assert_eq!(store.delete(99).unwrap(), 0);
}

#[test]
fn get_by_client_returns_exactly_that_clients_parcels() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let client = 5_550_123;
    let mut added = HashMap::new();
    for address in ["first", "second", "third"] {
        let mut parcel = Parcel::new(client, address, CREATED_AT);
        parcel.number = store.add(&parcel).unwrap();
        added.insert(parcel.number, parcel);
    }
    store.add(&Parcel::new(client + 1, "other client", CREATED_AT)).unwrap();

    let stored = store.get_by_client(client).unwrap();
    assert_eq!(stored.len(), added.len());
    for parcel in &stored {
        assert_eq!(added.get(&parcel.number), Some(parcel));
    }

    let numbers: Vec<_> = stored.iter().map(|parcel| parcel.number).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(numbers, sorted);
}

#[test]
fn get_by_client_without_parcels_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    store.add(&test_parcel()).unwrap();
    assert!(store.get_by_client(1).unwrap().is_empty());
}

#[test]
fn unknown_persisted_status_is_reported_as_invalid_data() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE parcel (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            client INTEGER NOT NULL,
            status TEXT NOT NULL,
            address TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        INSERT INTO parcel (client, status, address, created_at)
        VALUES (1, 'lost', 'somewhere', '2024-01-01T00:00:00Z');",
    )
    .unwrap();
    let store = SqliteParcelStore::new(&conn);

    let err = store.get(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("lost")));
}

#[test]
fn store_errors_surface_as_db_errors() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE parcel;").unwrap();

    assert!(matches!(store.add(&test_parcel()), Err(RepoError::Db(_))));
    assert!(matches!(store.get(1), Err(RepoError::Db(_))));
    assert!(matches!(store.get_by_client(1000), Err(RepoError::Db(_))));
    assert!(matches!(
        store.set_status(1, ParcelStatus::Sent),
        Err(RepoError::Db(_))
    ));
    assert!(matches!(store.set_address(1, "x"), Err(RepoError::Db(_))));
    assert!(matches!(store.delete(1), Err(RepoError::Db(_))));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteParcelStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_parcel_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteParcelStore::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("parcel"))));
}

#[test]
fn store_rejects_parcel_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE parcel (
            number INTEGER PRIMARY KEY,
            client INTEGER NOT NULL,
            status TEXT NOT NULL,
            address TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteParcelStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "parcel",
            column: "created_at"
        })
    ));
}
