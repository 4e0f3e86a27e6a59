// File: herald-common/src/models/event.rs

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::models::message::Embed;
use crate::models::platform::{EventKind, Platform};

/// A fired platform event: "this watched channel just did this".
///
/// Produced by the detection layer, matched against stored actions, then
/// discarded. Nothing here is persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChannelEvent {
    pub platform: Platform,
    pub kind: EventKind,
    /// Platform-side id of the channel the event is about.
    pub channel_id: String,
    /// Canonical link to the subject (video, stream, post).
    pub url: String,
    /// Display name of the channel, when the detection layer knows it.
    pub channel_name: Option<String>,
    /// Pre-rendered rich content attached verbatim by echo/notify.
    pub embed: Option<Embed>,
}

impl ChannelEvent {
    pub fn new(platform: Platform, kind: EventKind, channel_id: &str, url: &str) -> Self {
        Self {
            platform,
            kind,
            channel_id: channel_id.to_string(),
            url: url.to_string(),
            channel_name: None,
            embed: None,
        }
    }

    pub fn with_channel_name(mut self, name: &str) -> Self {
        self.channel_name = Some(name.to_string());
        self
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Variables available to message templates for this event.
    pub fn template_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("url".to_string(), self.url.clone());
        vars.insert(
            "platform.name".to_string(),
            self.platform.display_name().to_string(),
        );
        vars.insert(
            "event.name".to_string(),
            self.kind.display_name().to_string(),
        );
        vars.insert("channel.id".to_string(), self.channel_id.clone());
        if let Some(name) = &self.channel_name {
            vars.insert("channel.name".to_string(), name.clone());
        }
        vars
    }
}
