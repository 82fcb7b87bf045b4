use super::*;

const DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

fn store() -> (tempfile::TempDir, LocalAssetStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalAssetStore::new(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn empty_collection_lists_nothing() {
    let (_dir, store) = store();
    assert!(store.list(AssetKind::Frame).unwrap().is_empty());
    assert!(store.list(AssetKind::Badge).unwrap().is_empty());
}

#[test]
fn save_list_delete_round_trip() {
    let (_dir, mut store) = store();

    let saved = store.save(AssetKind::Frame, "gold ring", DATA_URI).unwrap();
    assert_eq!(saved.id, "frame-1");
    assert_eq!(saved.name, "gold ring");

    let listed = store.list(AssetKind::Frame).unwrap();
    assert_eq!(listed, vec![saved.clone()]);
    // Collections are independent.
    assert!(store.list(AssetKind::Badge).unwrap().is_empty());

    store.delete(AssetKind::Frame, &saved.id).unwrap();
    assert!(store.list(AssetKind::Frame).unwrap().is_empty());
}

#[test]
fn ids_keep_incrementing_after_delete() {
    let (_dir, mut store) = store();
    let a = store.save(AssetKind::Badge, "a", DATA_URI).unwrap();
    let b = store.save(AssetKind::Badge, "b", DATA_URI).unwrap();
    assert_eq!(a.id, "badge-1");
    assert_eq!(b.id, "badge-2");

    store.delete(AssetKind::Badge, &a.id).unwrap();
    let c = store.save(AssetKind::Badge, "c", DATA_URI).unwrap();
    assert_eq!(c.id, "badge-3");
}

#[test]
fn save_validates_name_and_payload() {
    let (_dir, mut store) = store();
    assert!(matches!(
        store.save(AssetKind::Frame, "   ", DATA_URI),
        Err(PurikuraError::Validation(_))
    ));
    assert!(matches!(
        store.save(AssetKind::Frame, "ok", "https://example.com/x.png"),
        Err(PurikuraError::Validation(_))
    ));
}

#[test]
fn delete_unknown_id_is_an_error() {
    let (_dir, mut store) = store();
    assert!(matches!(
        store.delete(AssetKind::Frame, "frame-99"),
        Err(PurikuraError::Persistence(_))
    ));
}

#[test]
fn wire_format_uses_camel_case_image_data() {
    let asset = SavedAsset {
        id: "frame-1".to_string(),
        name: "n".to_string(),
        image_data: DATA_URI.to_string(),
    };
    let json = serde_json::to_value(&asset).unwrap();
    assert!(json.get("imageData").is_some());
    assert!(json.get("image_data").is_none());
}

#[test]
fn persisted_file_lives_under_storage_key() {
    let (dir, mut store) = store();
    store.save(AssetKind::Frame, "n", DATA_URI).unwrap();
    assert!(dir.path().join("customFrames.json").is_file());
}

#[test]
fn fallback_store_survives_unreachable_service() {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalAssetStore::new(dir.path()).unwrap();
    // Nothing listens here; every remote call fails and falls back.
    let remote = RemoteAssetStore::new("http://127.0.0.1:9/prod", "test-key");
    let mut fallback = FallbackStore::new(remote, local);

    let saved = fallback.save(AssetKind::Frame, "offline", DATA_URI).unwrap();
    let listed = fallback.list(AssetKind::Frame).unwrap();
    assert_eq!(listed, vec![saved.clone()]);
    fallback.delete(AssetKind::Frame, &saved.id).unwrap();
    assert!(fallback.list(AssetKind::Frame).unwrap().is_empty());
}

#[test]
fn fallback_store_does_not_mask_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalAssetStore::new(dir.path()).unwrap();
    let remote = RemoteAssetStore::new("http://127.0.0.1:9/prod", "test-key");
    let mut fallback = FallbackStore::new(remote, local);

    assert!(matches!(
        fallback.save(AssetKind::Frame, "", DATA_URI),
        Err(PurikuraError::Validation(_))
    ));
}
