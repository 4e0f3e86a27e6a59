// File: src/services/dispatch/executors/echo.rs

use tracing::debug;

use herald_common::models::event::ChannelEvent;
use herald_common::models::message::OutboundMessage;

use crate::platforms::{ChatTransport, Destination, TransportError};
use crate::services::dispatch::template::interpolate;

/// Render the message template with the event's variables and post it. The
/// event's pre-rendered embed, if any, rides along verbatim; an empty
/// rendering with an embed delivers the embed alone.
pub async fn run(
    transport: &dyn ChatTransport,
    destination: &Destination,
    message: &str,
    event: &ChannelEvent,
) -> Result<(), TransportError> {
    let text = interpolate(message, &event.template_vars());
    debug!(
        "EchoExecutor: posting to {} ({} chars)",
        destination.surface_id(),
        text.len()
    );
    let outbound = OutboundMessage {
        content: if text.is_empty() { None } else { Some(text) },
        embed: event.embed.clone(),
        mention_everyone: false,
    };
    transport.post_message(destination, &outbound).await
}
