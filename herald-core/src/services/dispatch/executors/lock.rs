// File: src/services/dispatch/executors/lock.rs

use tracing::debug;

use herald_common::models::action::LockMode;

use crate::platforms::{ChatTransport, Destination, TransportError};

/// Open or close the destination for ordinary members' messages.
pub async fn run(
    transport: &dyn ChatTransport,
    destination: &Destination,
    mode: LockMode,
) -> Result<(), TransportError> {
    let locked = matches!(mode, LockMode::Lock);
    debug!(
        "LockExecutor: {} {}",
        if locked { "locking" } else { "unlocking" },
        destination.surface_id()
    );
    transport.set_locked(destination, locked).await
}
