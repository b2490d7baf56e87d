//! End-to-end behaviour over a file-backed store.

use chrono::{Duration, NaiveDate, Utc};
use tempfile::TempDir;

use tracelink::app::{App, Page};
use tracelink::config::Config;
use tracelink::storage::KeyValueStore;
use tracelink::{
    viewer, Catalog, EntryDraft, EntryStore, Error, Storage, User, ViewOutcome,
};

fn abc_user() -> User {
    User {
        username: "abc".to_string(),
        password: "abc123".to_string(),
        company: "ABC Co".to_string(),
        address: "12 Market St".to_string(),
        packing_location: "Packing House 1".to_string(),
        packing_address: "7 River Rd".to_string(),
    }
}

fn catalog() -> Catalog {
    Catalog::new(
        vec![abc_user()],
        vec!["Xoài".to_string(), "Thanh long".to_string()],
        vec!["Tiền Giang".to_string(), "Bến Tre".to_string()],
    )
}

fn config_in(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.database_path = Some(dir.path().join("tracelink.db"));
    config
}

fn open_store(config: &Config) -> EntryStore<Storage> {
    let storage = Storage::open(config.database_path()).unwrap();
    EntryStore::from_config(storage, &config.storage)
}

fn open_app(config: &Config) -> App<Storage> {
    App::new(config.clone(), catalog(), open_store(config))
}

fn mango_draft() -> EntryDraft {
    EntryDraft::new(
        "Xoài",
        "Tiền Giang",
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
}

#[test]
fn created_entry_is_viewable_by_a_later_process() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let link = {
        let mut app = open_app(&config);
        app.login("abc", "abc123").unwrap();
        app.submit(mango_draft()).unwrap()
    };
    assert_eq!(link.id.len(), 6);
    assert!(tracelink::id::is_short_id(&link.id));

    // New store over the same file, nobody logged in
    let mut store = open_store(&config);
    let ViewOutcome::Found(record) = viewer::view(&mut store, &link.path).unwrap() else {
        panic!("record should be found at {}", link.path);
    };
    assert_eq!(record.company, "ABC Co");
    assert_eq!(record.address, "12 Market St");

    let text = record.to_string();
    assert!(text.contains("Xoài"));
    assert!(text.contains("Tiền Giang"));
    assert!(text.contains("2024-01-10"));
    assert!(text.contains("Packing House 1"));
    assert!(text.contains("7 River Rd"));
}

#[test]
fn sixteenth_entry_evicts_the_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let mut app = open_app(&config);
    app.login("abc", "abc123").unwrap();

    let ids: Vec<String> = (0..16)
        .map(|_| app.submit(mango_draft()).unwrap().id)
        .collect();

    let mut store = open_store(&config);
    assert_eq!(store.load().unwrap().len(), 15);
    assert!(store.find_by_id(&ids[0]).is_none());
    for id in &ids[1..] {
        assert!(store.find_by_id(id).is_some(), "missing {id}");
    }
    assert_eq!(store.entries()[0].id, ids[15]);
}

#[test]
fn entry_expires_without_further_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let created_at = Utc::now() - Duration::days(7) - Duration::minutes(1);

    let id = open_store(&config)
        .create_at(mango_draft(), &abc_user(), created_at)
        .unwrap()
        .id;

    let mut store = open_store(&config);
    let outcome = viewer::view(&mut store, &id).unwrap();
    assert_eq!(outcome, ViewOutcome::NotFound { id });
    assert!(store.is_empty());
}

#[test]
fn corrupted_store_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    {
        let mut storage = Storage::open(config.database_path()).unwrap();
        storage.set_item("entries", "[{\"id\": 42").unwrap();
    }

    let mut store = open_store(&config);
    assert!(store.get("abc123").unwrap().is_none());

    let mut app = open_app(&config);
    app.login("abc", "abc123").unwrap();
    let link = app.submit(mango_draft()).unwrap();
    assert_eq!(app.links().unwrap(), vec![link]);
}

#[test]
fn wrong_password_leaves_app_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&config_in(&dir));

    let err = app.login("abc", "abc124").unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
    assert_eq!(err.to_string(), "wrong username or password");
    assert!(!app.session().is_logged_in());
    assert_eq!(app.navigate("/").unwrap(), Page::Login);
    assert!(matches!(app.submit(mango_draft()), Err(Error::NotLoggedIn)));
}

#[test]
fn configured_limits_apply() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.storage.max_entries = 3;
    config.storage.entry_ttl_days = 1;

    let mut app = open_app(&config);
    app.login("abc", "abc123").unwrap();
    for _ in 0..5 {
        app.submit(mango_draft()).unwrap();
    }

    let mut store = open_store(&config);
    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 3);
    let ttl = entries[0].expiry - Utc::now();
    assert!(ttl <= Duration::days(1));
    assert!(ttl > Duration::hours(23));
}
