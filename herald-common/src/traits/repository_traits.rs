// File: herald-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::action::Action;
use crate::models::platform::{EventKind, Platform};

/// Storage contract for dispatch actions.
///
/// Matching is on exactly (platform, event, source channel); the owning guild
/// never participates, since one platform channel may be watched from many
/// guilds.
#[async_trait]
pub trait ActionRepository: Send + Sync {
    /// All actions registered for this (platform, event, source channel)
    /// triple, oldest first.
    async fn find_matching(
        &self,
        platform: Platform,
        event: EventKind,
        source_channel_id: &str,
    ) -> Result<Vec<Action>, Error>;

    async fn save(&self, action: &Action) -> Result<Action, Error>;

    /// Delete by id. Returns false when no such action existed; absence is
    /// caller-visible but never an error.
    async fn remove(&self, action_id: Uuid) -> Result<bool, Error>;

    async fn get(&self, action_id: Uuid) -> Result<Option<Action>, Error>;

    /// Every action owned by the guild, oldest first. Audit/list surface for
    /// the command layer.
    async fn list_for_guild(&self, guild_id: &str) -> Result<Vec<Action>, Error>;
}
