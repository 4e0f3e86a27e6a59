// File: herald-common/src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor-neutral rich embed, rendered upstream by whatever detected the
/// event. The dispatch engine never edits one; it only hands it to the
/// transport, which converts it to the wire shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: Option<EmbedAuthor>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// What echo/notify hand the transport for delivery.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutboundMessage {
    /// None when the rendered template came out empty; the embed (if any)
    /// is then delivered alone.
    pub content: Option<String>,
    pub embed: Option<Embed>,
    /// Notify's broad mention. Echo never sets it.
    pub mention_everyone: bool,
}
