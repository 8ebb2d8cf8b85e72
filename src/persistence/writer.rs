//! Ordered, fire-and-forget snapshot writes
//!
//! `PersistQueue` is the producer side held by the container: every mutation
//! encodes the items right away and queues the JSON. `PersistWorker` is the
//! single consumer; the composition root spawns `worker.run()` on whatever
//! executor the host has.
//!
//! One consumer draining a FIFO channel means a snapshot queued later is
//! always written later (last writer wins). When several snapshots are
//! already waiting only the newest is written; the older ones are superseded.

use tokio::sync::{mpsc, oneshot};

use super::envelope;
use super::storage::KeyValueStore;
use crate::error::{PersistError, Result};
use crate::list::Item;

enum WriteCommand {
    Save(String),
    /// Acknowledged once everything queued before it has been written.
    /// Carries the error message of the last failed write, if any.
    Flush(oneshot::Sender<std::result::Result<(), String>>),
}

/// Producer handle owned by the container
#[derive(Debug, Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<WriteCommand>,
    key: String,
}

impl std::fmt::Debug for WriteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteCommand::Save(json) => write!(f, "Save({} bytes)", json.len()),
            WriteCommand::Flush(_) => f.write_str("Flush"),
        }
    }
}

/// Consumer that owns the store and performs the writes
pub struct PersistWorker<S> {
    rx: mpsc::UnboundedReceiver<WriteCommand>,
    store: S,
    key: String,
}

/// Create a connected queue/worker pair writing under `key`
pub fn persist_queue<S: KeyValueStore>(store: S, key: &str) -> (PersistQueue, PersistWorker<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        PersistQueue {
            tx,
            key: key.to_string(),
        },
        PersistWorker {
            rx,
            store,
            key: key.to_string(),
        },
    )
}

impl PersistQueue {
    /// Snapshot `items` now and queue the write. Never blocks.
    pub fn enqueue(&self, items: &[Item]) -> Result<()> {
        let json = envelope::encode(items)?;
        self.tx
            .send(WriteCommand::Save(json))
            .map_err(|_| PersistError::WriterClosed)
    }

    /// Wait until every snapshot queued so far has been written
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(ack_tx))
            .map_err(|_| PersistError::WriterClosed)?;
        match ack_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => Err(PersistError::storage(&self.key, message)),
            Err(_) => Err(PersistError::WriterClosed),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KeyValueStore> PersistWorker<S> {
    /// Drain the queue until every `PersistQueue` clone is dropped
    pub async fn run(mut self) {
        log::debug!("Persistence writer started for '{}'", self.key);
        let mut last_error: Option<String> = None;

        while let Some(first) = self.rx.recv().await {
            let mut latest = None;
            let mut acks = Vec::new();
            let mut superseded = 0usize;

            let mut next = Some(first);
            while let Some(command) = next {
                match command {
                    WriteCommand::Save(json) => {
                        if latest.replace(json).is_some() {
                            superseded += 1;
                        }
                    }
                    WriteCommand::Flush(ack) => acks.push(ack),
                }
                next = self.rx.try_recv().ok();
            }

            if superseded > 0 {
                log::debug!("Skipped {} superseded snapshot(s)", superseded);
            }
            if let Some(json) = latest {
                match self.store.set(&self.key, &json) {
                    Ok(()) => {
                        log::debug!("Saved '{}' ({} bytes)", self.key, json.len());
                        last_error = None;
                    }
                    Err(err) => {
                        log::warn!("Failed to save shopping list: {}", err);
                        last_error = Some(err.to_string());
                    }
                }
            }
            for ack in acks {
                let _ = ack.send(last_error.clone().map_or(Ok(()), Err));
            }
        }

        log::debug!("Persistence writer for '{}' stopped", self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ItemId;
    use crate::persistence::MemoryStore;
    use std::sync::{Arc, Mutex};

    fn item(name: &str) -> Item {
        Item {
            id: ItemId::new(name),
            name: name.to_string(),
            quantity: 1,
            purchased: false,
            created_at: 0,
        }
    }

    /// Records every write so ordering can be checked
    #[derive(Clone, Default)]
    struct RecordingStore {
        writes: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.writes.lock().unwrap().last().cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail {
                return Err(PersistError::storage(key, "disk full"));
            }
            self.writes.lock().unwrap().push(value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let store = RecordingStore::default();
        let (queue, worker) = persist_queue(store.clone(), "list");

        // Queue everything before the worker runs so it has to coalesce
        queue.enqueue(&[item("a")]).unwrap();
        queue.enqueue(&[item("b"), item("a")]).unwrap();
        queue.enqueue(&[item("c"), item("b"), item("a")]).unwrap();
        let handle = tokio::spawn(worker.run());
        queue.flush().await.unwrap();

        let writes = store.writes.lock().unwrap().clone();
        assert_eq!(writes.len(), 1);
        let items = envelope::decode(writes.last().unwrap()).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "c");

        drop(queue);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_writes_follow_enqueue_order() {
        let store = MemoryStore::new();
        let (queue, worker) = persist_queue(store.clone(), "list");
        tokio::spawn(worker.run());

        for n in 0..20 {
            let items: Vec<Item> = (0..=n).map(|i| item(&format!("item{i}"))).collect();
            queue.enqueue(&items).unwrap();
            if n % 3 == 0 {
                tokio::task::yield_now().await;
            }
        }
        queue.flush().await.unwrap();

        let stored = envelope::decode(&store.get("list").unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 20);
    }

    #[tokio::test]
    async fn test_failed_write_reported_on_flush() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let (queue, worker) = persist_queue(store, "list");
        tokio::spawn(worker.run());

        queue.enqueue(&[item("a")]).unwrap();
        let err = queue.flush().await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_dropped() {
        let (queue, worker) = persist_queue(MemoryStore::new(), "list");
        drop(worker);
        assert!(matches!(queue.enqueue(&[]), Err(PersistError::WriterClosed)));
        assert!(matches!(queue.flush().await, Err(PersistError::WriterClosed)));
    }
}
