//! # Change Feed
//!
//! Per-table change notifications over tokio broadcast channels.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Change Feed Flow                                 │
//! │                                                                         │
//! │  Repository write (insert/update)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ChangeFeed::publish("produtos", ...)                                  │
//! │       │                                                                 │
//! │       ├──► Subscription A (product list screen)                        │
//! │       └──► Subscription B (stock dashboard)                            │
//! │                                                                         │
//! │  Subscriptions are explicit: subscribe() hands back a Subscription     │
//! │  and dropping it unsubscribes. There is no global always-on listener.  │
//! │                                                                         │
//! │  Lagging subscribers lose the oldest events (broadcast semantics);     │
//! │  a consumer that falls behind should re-query the table.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per table channel before old events are dropped.
const CHANNEL_CAPACITY: usize = 64;

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single change notification.
///
/// Carries only the table and row id; consumers re-query for the row data,
/// which keeps the feed cheap and avoids stale payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableChange {
    pub table: String,
    pub kind: ChangeKind,
    pub row_id: String,
}

/// One active subscription to a table's changes.
///
/// Dropping the subscription unsubscribes; no explicit cleanup call exists.
pub struct Subscription {
    receiver: broadcast::Receiver<TableChange>,
}

impl Subscription {
    /// Waits for the next change.
    ///
    /// Returns `None` when the feed was closed or this subscriber lagged so
    /// far behind that resuming would skip events silently.
    pub async fn next(&mut self) -> Option<TableChange> {
        match self.receiver.recv().await {
            Ok(change) => Some(change),
            Err(broadcast::error::RecvError::Closed) => None,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "change feed subscriber lagged");
                None
            }
        }
    }

    /// Non-blocking poll for a pending change.
    pub fn try_next(&mut self) -> Option<TableChange> {
        self.receiver.try_recv().ok()
    }
}

/// Hub of per-table broadcast channels.
///
/// Cloning is cheap; all clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct ChangeFeed {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<TableChange>>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        ChangeFeed::default()
    }

    /// Subscribes to changes on one table.
    pub fn subscribe(&self, table: &str) -> Subscription {
        let mut channels = self.channels.lock().unwrap();
        let sender = channels
            .entry(table.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        Subscription {
            receiver: sender.subscribe(),
        }
    }

    /// Publishes a change. A table with no subscribers is a no-op.
    pub fn publish(&self, table: &str, kind: ChangeKind, row_id: &str) {
        let channels = self.channels.lock().unwrap();
        if let Some(sender) = channels.get(table) {
            // send() only fails when every receiver is gone, which is fine.
            let _ = sender.send(TableChange {
                table: table.to_string(),
                kind,
                row_id: row_id.to_string(),
            });
        }
    }

    /// Number of live subscribers for a table.
    pub fn subscriber_count(&self, table: &str) -> usize {
        let channels = self.channels.lock().unwrap();
        channels
            .get(table)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_receives_published_change() {
        let feed = ChangeFeed::new();
        let mut sub = feed.subscribe("produtos");

        feed.publish("produtos", ChangeKind::Insert, "p-1");

        let change = sub.next().await.unwrap();
        assert_eq!(change.table, "produtos");
        assert_eq!(change.kind, ChangeKind::Insert);
        assert_eq!(change.row_id, "p-1");
    }

    #[tokio::test]
    async fn test_changes_are_scoped_per_table() {
        let feed = ChangeFeed::new();
        let mut vendas = feed.subscribe("vendas");

        feed.publish("produtos", ChangeKind::Update, "p-1");
        feed.publish("vendas", ChangeKind::Insert, "v-1");

        let change = vendas.next().await.unwrap();
        assert_eq!(change.row_id, "v-1");
        assert!(vendas.try_next().is_none());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let feed = ChangeFeed::new();
        let sub = feed.subscribe("produtos");
        assert_eq!(feed.subscriber_count("produtos"), 1);

        drop(sub);
        assert_eq!(feed.subscriber_count("produtos"), 0);

        // Publishing with no subscribers must not panic.
        feed.publish("produtos", ChangeKind::Delete, "p-1");
    }
}
