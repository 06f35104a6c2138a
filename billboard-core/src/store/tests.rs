//! Unit tests for the JSON item store.

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

struct StoreFixture {
    _dir: TempDir,
    store: FileItemStore,
}

#[fixture]
fn fixture() -> StoreFixture {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
    let store = FileItemStore::open(root.join("items")).expect("open store");
    StoreFixture { _dir: dir, store }
}

fn id(raw: &str) -> ItemId {
    ItemId::new(raw).expect("valid id")
}

#[rstest]
fn get_or_create_starts_from_defaults(fixture: StoreFixture) {
    let item = fixture
        .store
        .get_or_create(&id("v1"), Some("Song"))
        .expect("create");

    assert_eq!(item.title(), Some("Song"));
    assert_eq!(item.times_requested(), 0);
    assert_eq!(item.position_this_period(), None);
    assert!(fixture.store.load(&id("v1")).expect("load").is_none());
}

#[rstest]
fn persisted_item_reloads_equal(fixture: StoreFixture) {
    let mut item = Item::new(id("v1"), Some(String::from("Song"))).with_times_requested(4);
    item.record_chart_position(2);
    item.record_chart_position(1);

    fixture.store.persist(&item).expect("persist");
    let reloaded = fixture.store.load(&id("v1")).expect("load");

    assert_eq!(reloaded, Some(item));
}

#[rstest]
fn stored_title_survives_later_fallback(fixture: StoreFixture) {
    let first = fixture
        .store
        .get_or_create(&id("v1"), Some("Original"))
        .expect("create");
    fixture.store.persist(&first).expect("persist");

    let again = fixture
        .store
        .get_or_create(&id("v1"), Some("Renamed"))
        .expect("reload");

    assert_eq!(again.title(), Some("Original"));
}

#[rstest]
fn legacy_records_load_with_sentinels(fixture: StoreFixture) {
    let legacy = r#"{
        "title": "null",
        "times_queued": 7,
        "number_of_weeks_on_chart": -1,
        "position_this_week": -1,
        "position_last_week": -1,
        "peak_position": -1
    }"#;
    billboard_fs::write_atomic(&fixture.store.record_path(&id("old")), legacy.as_bytes())
        .expect("seed legacy record");

    let item = fixture
        .store
        .get_or_create(&id("old"), Some("Recovered"))
        .expect("load legacy");

    assert_eq!(item.times_requested(), 7);
    assert_eq!(item.weeks_on_chart(), None);
    assert_eq!(item.peak_position(), None);
    assert_eq!(item.title(), Some("Recovered"));
}

#[rstest]
fn per_item_directories_are_not_records(fixture: StoreFixture) {
    let nested = fixture.store.dir().join("old").join("info.json");
    billboard_fs::write_atomic(&nested, br#"{"times_queued": 7}"#).expect("seed nested record");

    assert!(fixture.store.list_all().expect("list").is_empty());
    assert!(fixture.store.load(&id("old")).expect("load").is_none());
}

#[rstest]
fn list_all_is_ordered_by_id_and_skips_invalid_names(fixture: StoreFixture) {
    for raw in ["b", "a", "c"] {
        fixture
            .store
            .persist(&Item::new(id(raw), None))
            .expect("persist");
    }
    billboard_fs::write_atomic(&fixture.store.dir().join(".hidden.json"), b"{}")
        .expect("seed hidden");

    let ids: Vec<String> = fixture
        .store
        .list_all()
        .expect("list")
        .iter()
        .map(|item| item.id().to_string())
        .collect();

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[rstest]
fn corrupt_record_is_reported(fixture: StoreFixture) {
    billboard_fs::write_atomic(&fixture.store.record_path(&id("bad")), b"not json")
        .expect("seed corrupt");

    let err = fixture.store.load(&id("bad")).expect_err("decode fails");

    assert!(matches!(err, ItemStoreError::Decode { .. }));
}
