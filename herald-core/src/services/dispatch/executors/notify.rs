// File: src/services/dispatch/executors/notify.rs

use tracing::debug;

use herald_common::models::event::ChannelEvent;
use herald_common::models::message::OutboundMessage;

use crate::platforms::{ChatTransport, Destination, TransportError};
use crate::services::dispatch::template::interpolate;

/// Echo with a broad mention: same template rendering and embed
/// pass-through, but the post is flagged to address the whole community.
pub async fn run(
    transport: &dyn ChatTransport,
    destination: &Destination,
    message: &str,
    event: &ChannelEvent,
) -> Result<(), TransportError> {
    let text = interpolate(message, &event.template_vars());
    debug!(
        "NotifyExecutor: notifying {} ({} chars)",
        destination.surface_id(),
        text.len()
    );
    let outbound = OutboundMessage {
        content: if text.is_empty() { None } else { Some(text) },
        embed: event.embed.clone(),
        mention_everyone: true,
    };
    transport.post_message(destination, &outbound).await
}
