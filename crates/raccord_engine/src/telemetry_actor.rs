//! Telemetry actor for serialized counter writes using Ractor.
//!
//! The telemetry store is shared across concurrent engine runs; this actor
//! gives it a single-writer discipline. All counter mutations flow through
//! the actor mailbox in arrival order, so two runs reporting outcomes for
//! the same element can never lose updates. Reads may bypass the actor and
//! hit the store directly for snapshot semantics.

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use raccord_core::{ContinuityState, ManifestationScore};
use raccord_error::{EngineError, EngineErrorKind, RaccordResult};
use raccord_interface::TelemetryStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Actor wrapping a shared telemetry store.
pub struct TelemetryActor {
    store: Arc<dyn TelemetryStore>,
}

impl TelemetryActor {
    /// Create a new actor over a shared store.
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }
}

/// Messages the telemetry actor can handle.
pub enum TelemetryMessage {
    /// Record one generation outcome for an element.
    RecordOutcome {
        /// The tracked element name.
        element: String,
        /// Whether the element appeared in generated output.
        appeared: bool,
        /// Reply port for RPC response.
        reply: RpcReplyPort<RaccordResult<()>>,
    },
    /// Persist a completed run's continuity state.
    SaveState {
        /// The state to persist.
        state: ContinuityState,
        /// Reply port for RPC response.
        reply: RpcReplyPort<RaccordResult<()>>,
    },
    /// Snapshot the lifetime manifestation counters.
    SnapshotScores {
        /// Reply port for RPC response.
        reply: RpcReplyPort<RaccordResult<BTreeMap<String, ManifestationScore>>>,
    },
    /// Remove all persisted state and counters.
    Clear {
        /// Reply port for RPC response.
        reply: RpcReplyPort<RaccordResult<()>>,
    },
}

/// State is unit type since the store lives in the actor struct.
pub struct TelemetryActorState;

#[async_trait]
impl Actor for TelemetryActor {
    type Msg = TelemetryMessage;
    type State = TelemetryActorState;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        _args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("TelemetryActor started");
        Ok(TelemetryActorState)
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        _state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        tracing::info!("TelemetryActor stopped");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        _state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            TelemetryMessage::RecordOutcome {
                element,
                appeared,
                reply,
            } => {
                let result = self.store.record_manifestation(&element, appeared).await;
                if let Err(e) = &result {
                    tracing::warn!(element = %element, error = %e, "Failed to record outcome");
                }
                let _ = reply.send(result);
            }
            TelemetryMessage::SaveState { state, reply } => {
                let result = self.store.save_state(&state).await;
                let _ = reply.send(result);
            }
            TelemetryMessage::SnapshotScores { reply } => {
                let result = self.store.load_manifestation_scores().await;
                let _ = reply.send(result);
            }
            TelemetryMessage::Clear { reply } => {
                let result = self.store.clear().await;
                let _ = reply.send(result);
            }
        }
        Ok(())
    }
}

/// Convenience RPC wrapper: record a generation outcome through the actor.
pub async fn record_outcome(
    actor: &ActorRef<TelemetryMessage>,
    element: impl Into<String>,
    appeared: bool,
) -> RaccordResult<()> {
    let element = element.into();
    let outcome = actor
        .call(
            |reply| TelemetryMessage::RecordOutcome {
                element,
                appeared,
                reply,
            },
            None,
        )
        .await
        .map_err(|e| EngineError::new(EngineErrorKind::ActorUnavailable(e.to_string())))?;
    unwrap_call(outcome)
}

/// Convenience RPC wrapper: snapshot counters through the actor.
pub async fn snapshot_scores(
    actor: &ActorRef<TelemetryMessage>,
) -> RaccordResult<BTreeMap<String, ManifestationScore>> {
    let outcome = actor
        .call(|reply| TelemetryMessage::SnapshotScores { reply }, None)
        .await
        .map_err(|e| EngineError::new(EngineErrorKind::ActorUnavailable(e.to_string())))?;
    unwrap_call(outcome)
}

fn unwrap_call<T>(outcome: ractor::rpc::CallResult<RaccordResult<T>>) -> RaccordResult<T> {
    match outcome {
        ractor::rpc::CallResult::Success(result) => result,
        ractor::rpc::CallResult::Timeout => Err(EngineError::new(
            EngineErrorKind::ActorUnavailable("rpc timed out".to_string()),
        ))?,
        ractor::rpc::CallResult::SenderError => Err(EngineError::new(
            EngineErrorKind::ActorUnavailable("reply channel dropped".to_string()),
        ))?,
    }
}
