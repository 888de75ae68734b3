//! Compatibility tests for the stored JSON blob.
//!
//! A blob written by the browser version of the checklist tool must load,
//! and what we write back must keep the same keys.

use pretty_assertions::assert_eq;
use qalist::io::workspace_io::{load_store, save_store};
use qalist::model::entity::Category;
use qalist::ops::progress::Progress;
use std::fs;

const BROWSER_BLOB: &str = r#"{
  "task_1718000000000": {
    "id": "task_1718000000000",
    "name": "Login Flow",
    "projectId": "wts",
    "created": "2024-06-10T06:13:20.000Z",
    "categories": {
      "uiux": [
        { "id": "item_1718000000000_uiux_0", "label": "Proper spacing and alignment", "checked": true, "isPredefined": true },
        { "id": "custom_1718000100000", "label": "Logo is crisp", "checked": false, "isPredefined": false }
      ],
      "functionality": [
        { "id": "item_1718000000000_functionality_0", "label": "Forms submit", "checked": false, "isPredefined": true }
      ],
      "responsive": []
    }
  },
  "task_1718000500000": {
    "id": "task_1718000500000",
    "name": "Donations",
    "created": "2024-06-10T06:21:40.000Z",
    "categories": { "uiux": [], "functionality": [], "responsive": [] }
  }
}"#;

#[test]
fn browser_blob_loads() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), BROWSER_BLOB).unwrap();

    let store = load_store(tmp.path(), "tasks.json");
    assert_eq!(store.len(), 2);

    let ids: Vec<&str> = store.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["task_1718000000000", "task_1718000500000"]);

    let login = store.get("task_1718000000000").unwrap();
    assert_eq!(login.catalog_id.as_deref(), Some("wts"));
    let uiux = login.items(Category::Uiux);
    assert!(uiux[0].checked && uiux[0].is_predefined);
    assert!(!uiux[1].is_predefined);
    assert_eq!(
        Progress::overall(login),
        Progress {
            completed: 1,
            total: 3
        }
    );

    let donations = store.get("task_1718000500000").unwrap();
    assert_eq!(donations.catalog_id, None);
}

#[test]
fn written_blob_keeps_browser_keys() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), BROWSER_BLOB).unwrap();
    let store = load_store(tmp.path(), "tasks.json");

    save_store(tmp.path(), "out.json", &store).unwrap();
    let text = fs::read_to_string(tmp.path().join("out.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let login = &value["task_1718000000000"];
    let mut keys: Vec<&str> = login.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["categories", "created", "id", "name", "projectId"]);

    let item = &login["categories"]["uiux"][1];
    let mut item_keys: Vec<&str> = item.as_object().unwrap().keys().map(String::as_str).collect();
    item_keys.sort_unstable();
    assert_eq!(item_keys, vec!["checked", "id", "isPredefined", "label"]);

    // No projectId key when there is no association
    assert!(value["task_1718000500000"].get("projectId").is_none());

    // And it loads back to the same store
    assert_eq!(load_store(tmp.path(), "out.json"), store);
}

#[test]
fn missing_category_key_loads_as_empty_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tasks.json"),
        r#"{"task_1":{"id":"task_1","name":"Old","created":"2024-01-01T00:00:00Z","categories":{"uiux":[]}}}"#,
    )
    .unwrap();
    let store = load_store(tmp.path(), "tasks.json");
    let entity = store.get("task_1").unwrap();
    assert!(entity.items(Category::Responsive).is_empty());
    assert!(entity.items(Category::Functionality).is_empty());
}

#[test]
fn malformed_blob_is_empty_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), "[1, 2").unwrap();
    let store = load_store(tmp.path(), "tasks.json");
    assert!(store.is_empty());
}
