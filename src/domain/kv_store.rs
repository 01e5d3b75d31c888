use async_trait::async_trait;

/// Asynchronous string store addressed by key. Every call may fail with an
/// I/O or quota error reported by the backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()> { Ok(()) }
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
