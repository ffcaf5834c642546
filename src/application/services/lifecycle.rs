use crate::application::services::MutationService;
use crate::domain::entities::SyncReport;
use crate::shared::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// External events the coordinator reacts to. Hosts translate their own
/// signals (network watchers, window teardown) into these and call
/// [`SyncLifecycle::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Connectivity came back; the offline queue should be replayed.
    ConnectivityRestored,
    /// The host is shutting down; leftover speculative state must go.
    ShutdownRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Draining,
    ShutDown,
}

/// Explicit state machine around the coordinator's queue drain and shutdown
/// cleanup. Restore events that arrive while a drain is already running are
/// coalesced into it, and nothing runs after shutdown.
pub struct SyncLifecycle {
    coordinator: Arc<MutationService>,
    state: RwLock<LifecycleState>,
}

impl SyncLifecycle {
    pub fn new(coordinator: Arc<MutationService>) -> Self {
        Self {
            coordinator,
            state: RwLock::new(LifecycleState::Idle),
        }
    }

    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    /// Returns the drain report when the event triggered a drain, `None`
    /// when it was coalesced or ignored.
    pub async fn handle(&self, event: LifecycleEvent) -> Result<Option<SyncReport>> {
        match event {
            LifecycleEvent::ConnectivityRestored => {
                {
                    let mut state = self.state.write().await;
                    match *state {
                        LifecycleState::ShutDown => {
                            tracing::debug!("connectivity event ignored after shutdown");
                            return Ok(None);
                        }
                        LifecycleState::Draining => {
                            tracing::debug!("drain already running; event coalesced");
                            return Ok(None);
                        }
                        LifecycleState::Idle => *state = LifecycleState::Draining,
                    }
                }

                let result = self.coordinator.drain_offline_queue().await;

                let mut state = self.state.write().await;
                if *state == LifecycleState::Draining {
                    *state = LifecycleState::Idle;
                }
                result.map(Some)
            }
            LifecycleEvent::ShutdownRequested => {
                {
                    let mut state = self.state.write().await;
                    if *state == LifecycleState::ShutDown {
                        return Ok(None);
                    }
                    *state = LifecycleState::ShutDown;
                }
                let removed = self.coordinator.cleanup_optimistic().await?;
                tracing::info!(removed, "lifecycle shutdown cleanup finished");
                Ok(None)
            }
        }
    }
}
