// herald-core/src/services/dispatch/resolver.rs
//
// Turns an action's stored destination (channel id + optional thread id)
// into an addressable Destination. Two implementations: one always asks the
// remote API, one consults the embedding runtime's gateway cache first and
// falls back to the API on a miss.
//
// A thread that is gone, or that is not under its registered parent, is a
// NotFound. It never degrades to the parent channel; a lock or rename meant
// for a thread must not hit the channel above it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use crate::platforms::{ChannelInfo, ChannelRef, ChatTransport, Destination, ThreadRef, TransportError};

#[async_trait]
pub trait DestinationResolver: Send + Sync {
    async fn resolve(
        &self,
        channel_id: &str,
        thread_id: Option<&str>,
    ) -> Result<Destination, TransportError>;
}

/// Snowflakes come back from the API in canonical form; normalize the stored
/// id the same way so string comparison is meaningful.
fn canonical_id(raw: &str) -> String {
    raw.parse::<u64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn channel_destination(
    channel_id: &str,
    info: ChannelInfo,
) -> Result<Destination, TransportError> {
    if info.is_thread {
        return Err(TransportError::NotFound(format!(
            "channel {channel_id} is a thread"
        )));
    }
    Ok(Destination::Channel(ChannelRef {
        id: info.id,
        guild_id: info.guild_id,
        name: info.name,
    }))
}

fn thread_destination(
    parent_channel_id: &str,
    info: ChannelInfo,
) -> Result<Destination, TransportError> {
    let expected = canonical_id(parent_channel_id);
    if !info.is_thread || info.parent_id.as_deref() != Some(expected.as_str()) {
        return Err(TransportError::NotFound(format!(
            "thread {} not found under channel {}",
            info.id, parent_channel_id
        )));
    }
    Ok(Destination::Thread(ThreadRef {
        id: info.id,
        parent_id: expected,
        guild_id: info.guild_id,
        name: info.name,
    }))
}

/// Resolves every destination against the remote API. Safe after long idle
/// periods, at the cost of a fetch per action.
pub struct DirectDestinationResolver {
    transport: Arc<dyn ChatTransport>,
}

impl DirectDestinationResolver {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DestinationResolver for DirectDestinationResolver {
    async fn resolve(
        &self,
        channel_id: &str,
        thread_id: Option<&str>,
    ) -> Result<Destination, TransportError> {
        match thread_id {
            None => {
                let info = self.transport.fetch_channel(channel_id).await?;
                channel_destination(channel_id, info)
            }
            Some(tid) => {
                let info = self.transport.fetch_thread(channel_id, tid).await?;
                thread_destination(channel_id, info)
            }
        }
    }
}

/// Resolves against the gateway-fed in-memory cache first, falling back to
/// the remote API on a miss. Cache hits get the same shape checks as remote
/// answers: a cached thread under the wrong parent is still NotFound.
pub struct CachedDestinationResolver {
    cache: Arc<DefaultInMemoryCache>,
    transport: Arc<dyn ChatTransport>,
}

impl CachedDestinationResolver {
    pub fn new(cache: Arc<DefaultInMemoryCache>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { cache, transport }
    }

    fn cached_info(&self, raw_id: &str) -> Option<ChannelInfo> {
        let id = raw_id
            .parse::<u64>()
            .ok()
            .and_then(Id::<ChannelMarker>::new_checked)?;
        let channel = self.cache.channel(id)?;
        Some(ChannelInfo {
            id: channel.id.to_string(),
            guild_id: channel.guild_id.map(|g| g.to_string()),
            parent_id: channel.parent_id.map(|p| p.to_string()),
            name: channel.name.clone(),
            is_thread: channel.kind.is_thread(),
        })
    }
}

#[async_trait]
impl DestinationResolver for CachedDestinationResolver {
    async fn resolve(
        &self,
        channel_id: &str,
        thread_id: Option<&str>,
    ) -> Result<Destination, TransportError> {
        match thread_id {
            None => {
                if let Some(info) = self.cached_info(channel_id) {
                    debug!("DestinationResolver: cache hit for channel {channel_id}");
                    return channel_destination(channel_id, info);
                }
                let info = self.transport.fetch_channel(channel_id).await?;
                channel_destination(channel_id, info)
            }
            Some(tid) => {
                if let Some(info) = self.cached_info(tid) {
                    debug!("DestinationResolver: cache hit for thread {tid}");
                    return thread_destination(channel_id, info);
                }
                let info = self.transport.fetch_thread(channel_id, tid).await?;
                thread_destination(channel_id, info)
            }
        }
    }
}
