// File: src/platforms/mod.rs

use async_trait::async_trait;
use thiserror::Error;

use herald_common::models::message::OutboundMessage;

pub mod discord;

/// Chat-surface failures, classified at the boundary so callers never
/// inspect vendor error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other well-formed rejection from the chat platform's API.
    #[error("rejected by platform: {0}")]
    Rejected(String),

    /// The request never got a well-formed answer: connection faults,
    /// timeouts, unparseable responses, server-side breakage.
    #[error("transport failure: {0}")]
    Network(String),
}

impl TransportError {
    /// Classify a response by HTTP status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => TransportError::NotFound(message),
            401 | 403 => TransportError::PermissionDenied(message),
            429 => TransportError::RateLimited(message),
            400..=499 => TransportError::Rejected(message),
            _ => TransportError::Network(message),
        }
    }

    /// True for the chat platform's own error family (expected operational
    /// flakiness, logged at warn). Network faults are the exception and get
    /// error-level treatment.
    pub fn is_api_rejection(&self) -> bool {
        !matches!(self, TransportError::Network(_))
    }
}

/// What a channel fetch reports back, shorn of vendor detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub guild_id: Option<String>,
    /// For threads, the channel they hang under.
    pub parent_id: Option<String>,
    pub name: Option<String>,
    pub is_thread: bool,
}

/// A resolved, addressable target for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Channel(ChannelRef),
    Thread(ThreadRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub guild_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    pub id: String,
    pub parent_id: String,
    pub guild_id: Option<String>,
    pub name: Option<String>,
}

impl Destination {
    /// The id remote mutations act on: the thread's own id for threads,
    /// the channel id otherwise.
    pub fn surface_id(&self) -> &str {
        match self {
            Destination::Channel(c) => &c.id,
            Destination::Thread(t) => &t.id,
        }
    }

    pub fn is_thread(&self) -> bool {
        matches!(self, Destination::Thread(_))
    }
}

/// Remote chat-surface operations the dispatch engine needs. One
/// implementation speaks to Discord; tests substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelInfo, TransportError>;

    /// Fetch a thread under the given parent. A thread that is gone, or not
    /// actually under that parent, is `NotFound`.
    async fn fetch_thread(
        &self,
        parent_channel_id: &str,
        thread_id: &str,
    ) -> Result<ChannelInfo, TransportError>;

    /// Set whether ordinary members may write to the destination.
    async fn set_locked(
        &self,
        destination: &Destination,
        locked: bool,
    ) -> Result<(), TransportError>;

    async fn set_name(
        &self,
        destination: &Destination,
        name: &str,
    ) -> Result<(), TransportError>;

    async fn post_message(
        &self,
        destination: &Destination,
        message: &OutboundMessage,
    ) -> Result<(), TransportError>;
}
