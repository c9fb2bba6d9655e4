use serde_json::json;

use news_core::{CacheEntry, CacheStore, NewsPage};

async fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "readnews_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    ));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    dir
}

fn sample_page(total_items: u64) -> NewsPage {
    let mut page = NewsPage::empty(1, 10);
    page.total_items = total_items;
    page.total_pages = total_items.div_ceil(10);
    page
}

#[tokio::test]
async fn in_memory_store_round_trips_and_overwrites() {
    let store = CacheStore::in_memory();
    assert!(store.get("latest").await.is_none());

    let first = CacheEntry::new(sample_page(5));
    store.set("latest", first.clone()).await;
    assert_eq!(store.get("latest").await.unwrap(), first);

    let second = CacheEntry::new(sample_page(8));
    store.set("latest", second.clone()).await;
    assert_eq!(store.get("latest").await.unwrap(), second);
}

#[tokio::test]
async fn file_backed_store_survives_reload() {
    let dir = temp_dir("store").await;
    let path = dir.join("news_cache.json");

    let store = CacheStore::load_from(&path).await;
    let entry = CacheEntry::new(sample_page(12));
    store.set("latest", entry.clone()).await;

    // Fresh store on the same path sees the persisted entry
    let reloaded = CacheStore::load_from(&path).await;
    assert_eq!(reloaded.get("latest").await.unwrap(), entry);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn load_uses_tmp_fallback_on_corrupted_json() {
    let dir = temp_dir("corrupt").await;
    let path = dir.join("news_cache.json");
    tokio::fs::write(&path, b"{ this is not json ").await.unwrap();

    let entry = CacheEntry::new(sample_page(3));
    let tmp_body = json!({ "entries": { "latest": entry } });
    tokio::fs::write(
        dir.join("news_cache.json.tmp"),
        serde_json::to_vec(&tmp_body).unwrap(),
    )
    .await
    .unwrap();

    let store = CacheStore::load_from(&path).await;
    let recovered = store
        .get("latest")
        .await
        .expect("should fall back to tmp file when main is corrupted");
    assert_eq!(recovered, entry);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn missing_file_starts_empty() {
    let dir = temp_dir("missing").await;
    let store = CacheStore::load_from(dir.join("news_cache.json")).await;
    assert!(store.get("latest").await.is_none());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
