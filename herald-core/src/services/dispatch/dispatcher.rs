// herald-core/src/services/dispatch/dispatcher.rs
//
// Core engine: match a fired event against the action store, resolve each
// action's destination, run each operation, and report per-action outcomes.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use herald_common::error::Error;
use herald_common::models::action::Action;
use herald_common::models::event::ChannelEvent;
use herald_common::traits::repository_traits::ActionRepository;

use crate::platforms::{ChatTransport, TransportError};
use crate::services::dispatch::executors;
use crate::services::dispatch::resolver::DestinationResolver;

/// Why one action's processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The stored destination could not be resolved to an addressable
    /// channel or thread.
    DestinationUnavailable,
    /// The destination resolved, but the remote operation was refused or
    /// never completed.
    RemoteOperationFailed,
    /// The stored payload does not carry what its operation kind requires.
    MalformedAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success,
    Failed { kind: FailureKind, message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success)
    }
}

/// One entry per matching action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub action_id: Uuid,
    pub outcome: DispatchOutcome,
}

/// Per-action outcomes for one fired event, in store return order.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<ActionOutcome>,
}

impl DispatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.is_success())
    }
}

pub struct ActionDispatcher {
    actions: Arc<dyn ActionRepository>,
    resolver: Arc<dyn DestinationResolver>,
    transport: Arc<dyn ChatTransport>,
}

impl ActionDispatcher {
    pub fn new(
        actions: Arc<dyn ActionRepository>,
        resolver: Arc<dyn DestinationResolver>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            actions,
            resolver,
            transport,
        }
    }

    /// Dispatch one fired event.
    ///
    /// The only fallible step is the action-store lookup, which precedes any
    /// per-action work. From there, every matching action is processed in
    /// isolation: failures are classified, logged, and recorded in the
    /// report, and siblings are unaffected. No remote call is made when
    /// nothing matches.
    pub async fn dispatch(&self, event: &ChannelEvent) -> Result<DispatchReport, Error> {
        let matching = self
            .actions
            .find_matching(event.platform, event.kind, &event.channel_id)
            .await?;

        if matching.is_empty() {
            debug!(
                "ActionDispatcher: no actions for {} {} on channel {}",
                event.platform, event.kind, event.channel_id
            );
            return Ok(DispatchReport::default());
        }

        info!(
            "ActionDispatcher: dispatching {} action(s) for {} {} on channel {}",
            matching.len(),
            event.platform,
            event.kind,
            event.channel_id
        );

        // All actions for one event run concurrently; the report keeps the
        // store's return order.
        let outcomes =
            join_all(matching.iter().map(|action| self.run_action(action, event))).await;

        Ok(DispatchReport { outcomes })
    }

    async fn run_action(&self, action: &Action, event: &ChannelEvent) -> ActionOutcome {
        let operation = match action.operation() {
            Ok(op) => op,
            Err(e) => {
                // Stored-data defect, not remote flakiness; always error-level.
                error!(
                    "ActionDispatcher: action {} has a malformed payload: {}",
                    action.action_id, e
                );
                return ActionOutcome {
                    action_id: action.action_id,
                    outcome: DispatchOutcome::Failed {
                        kind: FailureKind::MalformedAction,
                        message: e.to_string(),
                    },
                };
            }
        };

        let destination = match self
            .resolver
            .resolve(
                &action.discord_channel_id,
                action.discord_thread_id.as_deref(),
            )
            .await
        {
            Ok(dest) => dest,
            Err(e) => {
                log_transport_error(action.action_id, "destination resolution", &e);
                return ActionOutcome {
                    action_id: action.action_id,
                    outcome: DispatchOutcome::Failed {
                        kind: FailureKind::DestinationUnavailable,
                        message: e.to_string(),
                    },
                };
            }
        };

        match executors::run(self.transport.as_ref(), &destination, &operation, event).await {
            Ok(()) => ActionOutcome {
                action_id: action.action_id,
                outcome: DispatchOutcome::Success,
            },
            Err(e) => {
                log_transport_error(
                    action.action_id,
                    &format!("{} operation", operation.kind()),
                    &e,
                );
                ActionOutcome {
                    action_id: action.action_id,
                    outcome: DispatchOutcome::Failed {
                        kind: FailureKind::RemoteOperationFailed,
                        message: e.to_string(),
                    },
                }
            }
        }
    }
}

/// The chat platform's own error family is expected operational noise;
/// anything else suggests a defect and is logged accordingly.
fn log_transport_error(action_id: Uuid, stage: &str, err: &TransportError) {
    if err.is_api_rejection() {
        warn!("ActionDispatcher: action {action_id} {stage} failed: {err}");
    } else {
        error!("ActionDispatcher: action {action_id} {stage} failed: {err}");
    }
}
