// herald-core/src/repositories/postgres/action.rs
//
// Postgres-backed ActionRepository over the "actions" table. Rows keep the
// operation payload as raw JSONB; a payload that no longer parses is still
// loaded here and classified per-action at dispatch time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use herald_common::error::Error;
use herald_common::models::action::Action;
use herald_common::models::platform::{EventKind, Platform};
use herald_common::traits::repository_traits::ActionRepository;

#[derive(Clone)]
pub struct PostgresActionRepository {
    pool: Pool<Postgres>,
}

impl PostgresActionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_action(r: &PgRow) -> Result<Action, Error> {
    Ok(Action {
        action_id: r.try_get("action_id")?,
        guild_id: r.try_get("guild_id")?,
        platform: r.try_get::<String, _>("platform")?.parse()?,
        on_event: r.try_get::<String, _>("on_event")?.parse()?,
        source_channel_id: r.try_get("source_channel_id")?,
        discord_channel_id: r.try_get("discord_channel_id")?,
        discord_thread_id: r.try_get::<Option<String>, _>("discord_thread_id")?,
        kind: r.try_get::<String, _>("kind")?.parse()?,
        data: r.try_get("data")?,
        created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl ActionRepository for PostgresActionRepository {
    async fn find_matching(
        &self,
        platform: Platform,
        event: EventKind,
        source_channel_id: &str,
    ) -> Result<Vec<Action>, Error> {
        let q = r#"
            SELECT action_id, guild_id, platform, on_event, source_channel_id,
                   discord_channel_id, discord_thread_id, kind, data, created_at
            FROM actions
            WHERE platform = $1
              AND on_event = $2
              AND source_channel_id = $3
            ORDER BY created_at
        "#;
        let rows = sqlx::query(q)
            .bind(platform.to_string())
            .bind(event.to_string())
            .bind(source_channel_id)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::new();
        for r in rows {
            out.push(row_to_action(&r)?);
        }
        Ok(out)
    }

    async fn save(&self, action: &Action) -> Result<Action, Error> {
        let q = r#"
            INSERT INTO actions (
                action_id, guild_id, platform, on_event, source_channel_id,
                discord_channel_id, discord_thread_id, kind, data, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#;
        sqlx::query(q)
            .bind(action.action_id)
            .bind(&action.guild_id)
            .bind(action.platform.to_string())
            .bind(action.on_event.to_string())
            .bind(&action.source_channel_id)
            .bind(&action.discord_channel_id)
            .bind(&action.discord_thread_id)
            .bind(action.kind.to_string())
            .bind(&action.data)
            .bind(action.created_at)
            .execute(&self.pool)
            .await?;
        Ok(action.clone())
    }

    async fn remove(&self, action_id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM actions WHERE action_id = $1")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, action_id: Uuid) -> Result<Option<Action>, Error> {
        let q = r#"
            SELECT action_id, guild_id, platform, on_event, source_channel_id,
                   discord_channel_id, discord_thread_id, kind, data, created_at
            FROM actions
            WHERE action_id = $1
        "#;
        let row_opt = sqlx::query(q)
            .bind(action_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_action(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_guild(&self, guild_id: &str) -> Result<Vec<Action>, Error> {
        let q = r#"
            SELECT action_id, guild_id, platform, on_event, source_channel_id,
                   discord_channel_id, discord_thread_id, kind, data, created_at
            FROM actions
            WHERE guild_id = $1
            ORDER BY created_at
        "#;
        let rows = sqlx::query(q)
            .bind(guild_id)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::new();
        for r in rows {
            out.push(row_to_action(&r)?);
        }
        Ok(out)
    }
}
