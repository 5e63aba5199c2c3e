//! Unit tests for the disk and memory stores.

use super::{DiskStore, DraftStore, DraftStoreExt, MemoryStore};
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Probe {
    name: String,
    age: u32,
}

#[test]
fn disk_round_trip() {
    let tmp = tempdir().unwrap();
    let store = DiskStore::open_at(tmp.path().to_path_buf()).unwrap();

    assert_eq!(store.load("patientFormData"), None);
    store.save("patientFormData", "{\"name\":\"张三\"}");
    assert_eq!(
        store.load("patientFormData").as_deref(),
        Some("{\"name\":\"张三\"}")
    );

    store.remove("patientFormData");
    assert_eq!(store.load("patientFormData"), None);
    // removing again is a no-op
    store.remove("patientFormData");
}

#[test]
fn disk_keys_do_not_collide_after_sanitization() {
    let tmp = tempdir().unwrap();
    let store = DiskStore::open_at(tmp.path().to_path_buf()).unwrap();

    store.save("localImg", "a");
    store.save("tongueResponseData", "b");
    assert_eq!(store.load("localImg").as_deref(), Some("a"));
    assert_eq!(store.load("tongueResponseData").as_deref(), Some("b"));
}

#[test]
fn corrupt_json_reads_as_absent() {
    let store = MemoryStore::new();
    store.save("constitutionTestData", "{not json");
    assert_eq!(store.load_json::<Probe>("constitutionTestData"), None);

    store.save_json("constitutionTestData", &Probe {
        name: "张三".into(),
        age: 30,
    });
    assert_eq!(
        store.load_json::<Probe>("constitutionTestData"),
        Some(Probe {
            name: "张三".into(),
            age: 30
        })
    );
}

#[test]
fn save_overwrites_unconditionally() {
    let store = MemoryStore::new();
    store.save("responselocaldata", "old");
    store.save("responselocaldata", "new");
    assert_eq!(store.load("responselocaldata").as_deref(), Some("new"));
    assert_eq!(store.len(), 1);
}
