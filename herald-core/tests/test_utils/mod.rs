// File: herald-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::sync::Notify;
use tokio::time::timeout;
use uuid::Uuid;

use herald_core::models::{Action, EventKind, OutboundMessage, Platform};
use herald_core::platforms::{ChannelInfo, ChatTransport, Destination, TransportError};
use herald_core::services::dispatch::{ActionDispatcher, DirectDestinationResolver};
use herald_core::traits::repository_traits::ActionRepository;
use herald_core::{Database, Error};

/// Create a connection pool to the test DB. Looks for `TEST_DATABASE_URL`
/// in the env, else uses `postgres://herald@localhost/herald_test`.
pub async fn create_test_db_pool() -> Result<Pool<Postgres>, Error> {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://herald@localhost/herald_test".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query("TRUNCATE TABLE actions RESTART IDENTITY CASCADE;")
        .execute(pool)
        .await?;
    Ok(())
}

/// Convenience: a fully migrated, empty test Database.
pub async fn setup_test_database() -> Result<Database, Error> {
    let pool = create_test_db_pool().await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;
    Ok(db)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// In-memory ActionRepository keeping insertion order, so report order
/// assertions are meaningful.
#[derive(Default)]
pub struct InMemoryActionRepository {
    actions: Mutex<Vec<Action>>,
}

impl InMemoryActionRepository {
    pub fn with_actions(actions: Vec<Action>) -> Self {
        Self {
            actions: Mutex::new(actions),
        }
    }
}

#[async_trait]
impl ActionRepository for InMemoryActionRepository {
    async fn find_matching(
        &self,
        platform: Platform,
        event: EventKind,
        source_channel_id: &str,
    ) -> Result<Vec<Action>, Error> {
        let actions = self.actions.lock().unwrap();
        Ok(actions
            .iter()
            .filter(|a| {
                a.platform == platform
                    && a.on_event == event
                    && a.source_channel_id == source_channel_id
            })
            .cloned()
            .collect())
    }

    async fn save(&self, action: &Action) -> Result<Action, Error> {
        self.actions.lock().unwrap().push(action.clone());
        Ok(action.clone())
    }

    async fn remove(&self, action_id: Uuid) -> Result<bool, Error> {
        let mut actions = self.actions.lock().unwrap();
        let before = actions.len();
        actions.retain(|a| a.action_id != action_id);
        Ok(actions.len() < before)
    }

    async fn get(&self, action_id: Uuid) -> Result<Option<Action>, Error> {
        Ok(self
            .actions
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.action_id == action_id)
            .cloned())
    }

    async fn list_for_guild(&self, guild_id: &str) -> Result<Vec<Action>, Error> {
        Ok(self
            .actions
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.guild_id == guild_id)
            .cloned()
            .collect())
    }
}

/// An ActionRepository whose store is unreachable.
pub struct FailingActionRepository;

#[async_trait]
impl ActionRepository for FailingActionRepository {
    async fn find_matching(
        &self,
        _platform: Platform,
        _event: EventKind,
        _source_channel_id: &str,
    ) -> Result<Vec<Action>, Error> {
        Err(Error::Platform("action store offline".to_string()))
    }

    async fn save(&self, _action: &Action) -> Result<Action, Error> {
        Err(Error::Platform("action store offline".to_string()))
    }

    async fn remove(&self, _action_id: Uuid) -> Result<bool, Error> {
        Err(Error::Platform("action store offline".to_string()))
    }

    async fn get(&self, _action_id: Uuid) -> Result<Option<Action>, Error> {
        Err(Error::Platform("action store offline".to_string()))
    }

    async fn list_for_guild(&self, _guild_id: &str) -> Result<Vec<Action>, Error> {
        Err(Error::Platform("action store offline".to_string()))
    }
}

/// Every remote interaction the fake saw, in the order it was attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    FetchChannel {
        id: String,
    },
    FetchThread {
        parent: String,
        thread: String,
    },
    SetLocked {
        surface: String,
        locked: bool,
    },
    SetName {
        surface: String,
        name: String,
    },
    Post {
        surface: String,
        content: Option<String>,
        mention_everyone: bool,
        has_embed: bool,
    },
}

/// Blocks posts to `wait_on` until a post to `released_by` has happened.
/// Lets tests prove that sibling actions proceed concurrently.
#[derive(Clone)]
pub struct PostGate {
    pub wait_on: String,
    pub released_by: String,
    pub notify: Arc<Notify>,
}

impl PostGate {
    pub fn new(wait_on: &str, released_by: &str) -> Self {
        Self {
            wait_on: wait_on.to_string(),
            released_by: released_by.to_string(),
            notify: Arc::new(Notify::new()),
        }
    }
}

/// A stand-in Discord: a map of known channels/threads plus a recording of
/// every attempted remote call.
#[derive(Default)]
pub struct FakeDiscord {
    channels: Mutex<HashMap<String, ChannelInfo>>,
    calls: Mutex<Vec<TransportCall>>,
    post_failures: Mutex<HashMap<String, TransportError>>,
    post_delay: Mutex<Option<Duration>>,
    gate: Mutex<Option<PostGate>>,
}

impl FakeDiscord {
    pub fn add_channel(&self, id: &str, guild: &str, name: &str) {
        self.channels.lock().unwrap().insert(
            id.to_string(),
            ChannelInfo {
                id: id.to_string(),
                guild_id: Some(guild.to_string()),
                parent_id: None,
                name: Some(name.to_string()),
                is_thread: false,
            },
        );
    }

    pub fn add_thread(&self, id: &str, parent: &str, guild: &str, name: &str) {
        self.channels.lock().unwrap().insert(
            id.to_string(),
            ChannelInfo {
                id: id.to_string(),
                guild_id: Some(guild.to_string()),
                parent_id: Some(parent.to_string()),
                name: Some(name.to_string()),
                is_thread: true,
            },
        );
    }

    pub fn fail_posts_to(&self, surface: &str, err: TransportError) {
        self.post_failures
            .lock()
            .unwrap()
            .insert(surface.to_string(), err);
    }

    pub fn delay_posts(&self, delay: Duration) {
        *self.post_delay.lock().unwrap() = Some(delay);
    }

    pub fn gate_posts(&self, gate: PostGate) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, TransportCall::Post { .. }))
            .cloned()
            .collect()
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatTransport for FakeDiscord {
    async fn fetch_channel(&self, channel_id: &str) -> Result<ChannelInfo, TransportError> {
        self.record(TransportCall::FetchChannel {
            id: channel_id.to_string(),
        });
        self.channels
            .lock()
            .unwrap()
            .get(channel_id)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(format!("unknown channel {channel_id}")))
    }

    async fn fetch_thread(
        &self,
        parent_channel_id: &str,
        thread_id: &str,
    ) -> Result<ChannelInfo, TransportError> {
        self.record(TransportCall::FetchThread {
            parent: parent_channel_id.to_string(),
            thread: thread_id.to_string(),
        });
        let channels = self.channels.lock().unwrap();
        match channels.get(thread_id) {
            Some(info)
                if info.is_thread && info.parent_id.as_deref() == Some(parent_channel_id) =>
            {
                Ok(info.clone())
            }
            _ => Err(TransportError::NotFound(format!(
                "thread {thread_id} not found under channel {parent_channel_id}"
            ))),
        }
    }

    async fn set_locked(
        &self,
        destination: &Destination,
        locked: bool,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::SetLocked {
            surface: destination.surface_id().to_string(),
            locked,
        });
        Ok(())
    }

    async fn set_name(
        &self,
        destination: &Destination,
        name: &str,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::SetName {
            surface: destination.surface_id().to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn post_message(
        &self,
        destination: &Destination,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        let surface = destination.surface_id().to_string();

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = &gate {
            if gate.wait_on == surface {
                timeout(Duration::from_secs(2), gate.notify.notified())
                    .await
                    .map_err(|_| {
                        TransportError::Network(format!("post to {surface} never unblocked"))
                    })?;
            }
        }

        let delay = *self.post_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(TransportCall::Post {
            surface: surface.clone(),
            content: message.content.clone(),
            mention_everyone: message.mention_everyone,
            has_embed: message.embed.is_some(),
        });

        let failure = self.post_failures.lock().unwrap().get(&surface).cloned();
        if let Some(err) = failure {
            return Err(err);
        }

        if let Some(gate) = &gate {
            if gate.released_by == surface {
                gate.notify.notify_one();
            }
        }
        Ok(())
    }
}

/// Wire a dispatcher to the fake Discord through the uncached resolver.
pub fn dispatcher_with(
    repo: Arc<dyn ActionRepository>,
    discord: &Arc<FakeDiscord>,
) -> ActionDispatcher {
    let transport: Arc<dyn ChatTransport> = discord.clone();
    let resolver = Arc::new(DirectDestinationResolver::new(transport.clone()));
    ActionDispatcher::new(repo, resolver, transport)
}
