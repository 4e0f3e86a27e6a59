// File: src/services/dispatch/executors/rename.rs

use tracing::debug;

use crate::platforms::{ChatTransport, Destination, TransportError};

/// Rename the destination channel or thread. The name is used as stored;
/// whether it is acceptable is the remote platform's call.
pub async fn run(
    transport: &dyn ChatTransport,
    destination: &Destination,
    name: &str,
) -> Result<(), TransportError> {
    debug!(
        "RenameExecutor: renaming {} to {:?}",
        destination.surface_id(),
        name
    );
    transport.set_name(destination, name).await
}
