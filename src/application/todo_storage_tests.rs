#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::{TimeZone, Utc};

    use crate::application::{
        test_support::FailingStore,
        todo_storage::{StorageError, TodoStorage, DEFAULT_STORAGE_KEY},
        todo_store::TodoStore,
    };
    use crate::infrastructure::memory_kv::MemoryKeyValueStore;

    #[tokio::test]
    async fn unit_load_from_empty_store_is_empty_not_error() {
        let storage = TodoStorage::new(MemoryKeyValueStore::new());
        let report = storage.load().await;
        assert!(report.todos.is_empty());
        assert!(!report.failed);
    }

    #[tokio::test]
    async fn unit_save_then_load_round_trips_every_field() {
        let kv = MemoryKeyValueStore::new();
        let storage = TodoStorage::new(kv.clone());

        let mut store = TodoStore::new();
        store.add("open").unwrap();
        let done = store.add("done").unwrap().id.clone();
        store.toggle(&done);

        storage.save(store.todos()).await;
        assert!(kv.snapshot(DEFAULT_STORAGE_KEY).is_some());

        let loaded = storage.try_load().await.unwrap();
        assert_eq!(loaded, store.todos());
        for todo in &loaded {
            assert_eq!(todo.completed_at.is_some(), todo.completed);
        }
    }

    #[tokio::test]
    async fn unit_saved_json_omits_absent_completed_at() {
        let kv = MemoryKeyValueStore::new();
        let storage = TodoStorage::new(kv.clone());
        let mut store = TodoStore::new();
        store.add("open").unwrap();
        storage.save(store.todos()).await;

        let json: serde_json::Value = serde_json::from_str(&kv.snapshot(DEFAULT_STORAGE_KEY).unwrap()).unwrap();
        let record = &json.as_array().unwrap()[0];
        assert_eq!(record["text"], "open");
        assert!(record["createdAt"].is_string());
        assert!(record.get("completedAt").is_none());
    }

    #[tokio::test]
    async fn unit_load_revives_millisecond_timestamps_and_legacy_ids() {
        let stored = r#"[
            {"id":"1700000000000k3j9x2abc","text":"Water plants","completed":true,
             "createdAt":"2024-03-01T09:15:00.000Z","completedAt":"2024-03-02T18:30:00.250Z"},
            {"id":"1699999999999qwe","text":"Call mom","completed":false,
             "createdAt":"2024-02-28T07:00:00.000Z"}
        ]"#;
        let storage = TodoStorage::new(MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, stored));

        let todos = storage.try_load().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].id.as_str(), "1700000000000k3j9x2abc");
        assert_eq!(todos[0].created_at, Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap());
        assert_eq!(
            todos[0].completed_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 18, 30, 0).unwrap() + chrono::Duration::milliseconds(250))
        );
        assert_eq!(todos[1].completed_at, None);
    }

    #[tokio::test]
    async fn unit_load_drops_stray_completion_and_keeps_missing_one_absent() {
        let stored = r#"[
            {"id":"a","text":"open","completed":false,
             "createdAt":"2024-01-01T00:00:00Z","completedAt":"2024-01-02T00:00:00Z"},
            {"id":"b","text":"done","completed":true,"createdAt":"2024-01-03T00:00:00Z"}
        ]"#;
        let storage = TodoStorage::new(MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, stored));

        let todos = storage.try_load().await.unwrap();
        assert_eq!(todos[0].completed_at, None);
        assert!(todos[1].completed);
        assert_eq!(todos[1].completed_at, None);
        assert_eq!(todos[1].display_time(), todos[1].created_at);
    }

    #[tokio::test]
    async fn unit_corrupt_value_loads_as_empty_and_reports_failure() {
        let storage = TodoStorage::new(MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, "{not json"));

        assert!(matches!(storage.try_load().await, Err(StorageError::Corrupt(_))));
        let report = storage.load().await;
        assert!(report.failed);
        assert!(report.todos.is_empty());
    }

    #[tokio::test]
    async fn unit_backend_failures_are_swallowed() {
        let storage = TodoStorage::new(FailingStore::default());

        assert!(matches!(storage.try_load().await, Err(StorageError::Backend(_))));
        assert!(storage.load().await.failed);

        let mut store = TodoStore::new();
        store.add("x").unwrap();
        storage.save(store.todos()).await;
        storage.clear_all().await;
    }

    #[tokio::test]
    async fn unit_clear_all_removes_value_under_custom_key() {
        let kv = MemoryKeyValueStore::with_entry("work", "[]");
        let storage = TodoStorage::with_key(kv.clone(), "work");
        assert_eq!(storage.key(), "work");

        storage.clear_all().await;
        assert_eq!(kv.snapshot("work"), None);
        assert!(storage.try_load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unit_failing_store_still_sees_each_write_attempt() {
        let kv = FailingStore::default();
        let storage = TodoStorage::new(kv.clone());
        storage.save(&[]).await;
        storage.clear_all().await;
        assert_eq!(kv.sets.load(Ordering::SeqCst), 1);
        assert_eq!(kv.removes.load(Ordering::SeqCst), 1);
    }
}
