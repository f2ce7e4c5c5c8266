//! Concurrent writers against one store.

use archivist::{KnowledgeStore, MetadataCatalog, ServerConfig};
use serde_json::Value;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_parallel_writes_keep_every_record() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::with_store_path(dir.path());
    let catalog = Arc::new(MetadataCatalog::open(&config).unwrap());
    let store = Arc::new(KnowledgeStore::new(&config, catalog).unwrap());

    const THREADS: usize = 8;
    const FILES_PER_THREAD: usize = 10;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..FILES_PER_THREAD {
                    let name = format!("t{t}/file-{i}.txt");
                    store.write_file(&name, &format!("thread {t} file {i}")).unwrap();
                    store.read_file(&name).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.catalog().len(), THREADS * FILES_PER_THREAD);

    let raw = std::fs::read_to_string(dir.path().join("file-metadata.json")).unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    let records = document.as_object().unwrap();
    assert_eq!(records.len(), THREADS * FILES_PER_THREAD);
    for t in 0..THREADS {
        for i in 0..FILES_PER_THREAD {
            let key = format!("t{t}/file-{i}.txt");
            assert!(records.contains_key(&key), "missing {key}");
            assert!(records[&key]["lastAccessed"].is_string());
        }
    }

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
        .collect();
    assert!(leftovers.is_empty());
}
