//! Client-observed selection state: which object is selected and where its
//! metadata fetch stands.
//!
//! Selecting a new key while a previous fetch is outstanding must not let
//! the stale result overwrite the new selection. Each `select` bumps a
//! request generation and tags its fetch with it; a completion is applied
//! only while its generation is still current. The abandoned fetch is not
//! cancelled on the wire — its result is simply discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::access::{AccessGrant, Disposition};
use crate::services::access::AccessBroker;

/// Lifecycle of the current selection: `Idle → Loading → Ready | Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Loading {
        key: String,
    },
    Ready(AccessGrant),
    Failed {
        key: String,
        reason: String,
    },
}

/// Tracks the selected object and enforces last-selection-wins.
pub struct AccessSession {
    broker: AccessBroker,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<SelectionState>>,
}

impl AccessSession {
    pub fn new(broker: AccessBroker) -> Self {
        let (state, _) = watch::channel(SelectionState::Idle);
        Self {
            broker,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Observe selection state changes.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SelectionState {
        self.state.borrow().clone()
    }

    /// Select `key` and fetch its grant in the background.
    ///
    /// Returns the fetch task handle; awaiting it is only needed when the
    /// caller wants to observe settling (tests do).
    pub fn select(&self, key: impl Into<String>, disposition: Disposition) -> JoinHandle<()> {
        let key = key.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state
            .send_replace(SelectionState::Loading { key: key.clone() });

        let broker = self.broker.clone();
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = broker.grant(&key, disposition).await;

            state.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation {
                    debug!(key = %key, "discarding stale selection result");
                    return false;
                }
                *slot = match outcome {
                    Ok(grant) => SelectionState::Ready(grant),
                    Err(err) => SelectionState::Failed {
                        key: key.clone(),
                        reason: err.to_string(),
                    },
                };
                true
            });
        })
    }

    /// Drop the selection. Any in-flight fetch is invalidated and its
    /// result discarded when it lands.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SelectionState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::services::store::testing::MockStore;
    use crate::services::store::{ObjectHead, ObjectStore};

    fn head(content_type: &str) -> ObjectHead {
        ObjectHead {
            content_type: Some(content_type.to_string()),
            content_length: 10,
            last_modified: None,
            etag: None,
        }
    }

    fn session(store: Arc<MockStore>) -> AccessSession {
        AccessSession::new(AccessBroker::new(store as Arc<dyn ObjectStore>))
    }

    #[tokio::test]
    async fn last_selection_wins_over_a_slow_earlier_fetch() {
        let mut mock = MockStore::default();
        mock.heads.insert("slow.bin".to_string(), head("video/mp4"));
        mock.heads.insert("fast.txt".to_string(), head("text/plain"));
        mock.head_delays
            .insert("slow.bin".to_string(), Duration::from_millis(80));
        let session = session(Arc::new(mock));

        let slow = session.select("slow.bin", Disposition::Inline);
        assert_eq!(
            session.current(),
            SelectionState::Loading {
                key: "slow.bin".to_string()
            }
        );

        let fast = session.select("fast.txt", Disposition::Inline);
        fast.await.unwrap();
        slow.await.unwrap();

        // The slow fetch resolved last, but the later selection stands.
        match session.current() {
            SelectionState::Ready(grant) => assert_eq!(grant.key, "fast.txt"),
            other => panic!("expected Ready for fast.txt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn observers_see_loading_then_ready() {
        let mut mock = MockStore::default();
        mock.heads.insert("a.txt".to_string(), head("text/plain"));
        let session = session(Arc::new(mock));
        let mut rx = session.subscribe();

        let task = session.select("a.txt", Disposition::Inline);
        rx.changed().await.unwrap();
        assert!(matches!(&*rx.borrow(), SelectionState::Loading { key } if key == "a.txt"));

        task.await.unwrap();
        rx.changed().await.unwrap();
        assert!(matches!(&*rx.borrow(), SelectionState::Ready(_)));
    }

    #[tokio::test]
    async fn fetch_failure_lands_in_failed() {
        let session = session(Arc::new(MockStore::default()));

        session
            .select("missing.txt", Disposition::Inline)
            .await
            .unwrap();

        match session.current() {
            SelectionState::Failed { key, reason } => {
                assert_eq!(key, "missing.txt");
                assert!(reason.contains("not found"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn clear_invalidates_an_inflight_fetch() {
        let mut mock = MockStore::default();
        mock.heads.insert("slow.bin".to_string(), head("video/mp4"));
        mock.head_delays
            .insert("slow.bin".to_string(), Duration::from_millis(50));
        let session = session(Arc::new(mock));

        let task = session.select("slow.bin", Disposition::Inline);
        session.clear();
        task.await.unwrap();

        assert_eq!(session.current(), SelectionState::Idle);
    }
}
