use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{kv_store::KeyValueStore, todo::Todo};

use super::todo_storage::TodoStorage;

enum Job {
    Save(Vec<Todo>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Applies storage writes one at a time, in the order they were submitted.
///
/// Callers never wait on a write, but two writes can no longer race each
/// other: the stored value is always the last list handed to [`SaveQueue::save`].
/// Snapshots still waiting when a newer one arrives are skipped.
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<Job>,
    worker: JoinHandle<()>,
}

impl SaveQueue {
    /// Starts the worker task. Must be called from within a tokio runtime.
    pub fn spawn<S: KeyValueStore>(storage: TodoStorage<S>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            let mut held = None;
            loop {
                let job = match held.take() {
                    Some(job) => job,
                    None => match rx.recv().await {
                        Some(job) => job,
                        None => break,
                    },
                };
                match job {
                    Job::Save(mut todos) => {
                        // A newer snapshot already queued replaces this one; barriers keep their place.
                        while let Ok(next) = rx.try_recv() {
                            match next {
                                Job::Save(newer) => todos = newer,
                                other => {
                                    held = Some(other);
                                    break;
                                }
                            }
                        }
                        storage.save(&todos).await;
                    }
                    Job::Clear => storage.clear_all().await,
                    Job::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("save queue drained");
        });
        Self { tx, worker }
    }

    pub fn save(&self, todos: Vec<Todo>) { self.submit(Job::Save(todos)); }

    pub fn clear(&self) { self.submit(Job::Clear); }

    /// Resolves once every write submitted before this call has been applied.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.submit(Job::Flush(done));
        let _ = wait.await;
    }

    /// Stops accepting work and waits for pending writes to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.worker.await {
            tracing::error!(error = %err, "save worker stopped abnormally");
        }
    }

    fn submit(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::error!("save worker is gone, dropping storage write");
        }
    }
}
