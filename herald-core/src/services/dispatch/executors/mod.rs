// File: src/services/dispatch/executors/mod.rs
//
// One executor per operation kind. Each performs exactly one remote
// mutation through the ChatTransport, never retries, and keeps no state.

pub mod echo;
pub mod lock;
pub mod notify;
pub mod rename;

use herald_common::models::action::Operation;
use herald_common::models::event::ChannelEvent;

use crate::platforms::{ChatTransport, Destination, TransportError};

/// Run one action's operation against its resolved destination.
pub async fn run(
    transport: &dyn ChatTransport,
    destination: &Destination,
    operation: &Operation,
    event: &ChannelEvent,
) -> Result<(), TransportError> {
    match operation {
        Operation::Lock { mode } => lock::run(transport, destination, *mode).await,
        Operation::Rename { name } => rename::run(transport, destination, name).await,
        Operation::Echo { message } => echo::run(transport, destination, message, event).await,
        Operation::Notify { message } => notify::run(transport, destination, message, event).await,
    }
}
