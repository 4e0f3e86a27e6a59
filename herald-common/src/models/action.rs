// File: herald-common/src/models/action.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::Error;
use crate::models::platform::{EventKind, Platform};

/// What an action does at its Discord destination.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Lock,
    Rename,
    Echo,
    Notify,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Lock => write!(f, "lock"),
            OperationKind::Rename => write!(f, "rename"),
            OperationKind::Echo => write!(f, "echo"),
            OperationKind::Notify => write!(f, "notify"),
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lock" => Ok(OperationKind::Lock),
            "rename" => Ok(OperationKind::Rename),
            "echo" => Ok(OperationKind::Echo),
            "notify" => Ok(OperationKind::Notify),
            _ => Err(format!("Unknown operation kind: {}", s)),
        }
    }
}

/// Direction of a lock operation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    Lock,
    Unlock,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Lock => write!(f, "lock"),
            LockMode::Unlock => write!(f, "unlock"),
        }
    }
}

impl FromStr for LockMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lock" => Ok(LockMode::Lock),
            "unlock" => Ok(LockMode::Unlock),
            _ => Err(format!("Unknown lock mode: {}", s)),
        }
    }
}

/// A fully-typed operation, parsed out of an action's `(kind, data)` pair.
///
/// Each variant carries only what its behavior needs: lock takes a direction,
/// rename a destination name, echo/notify a message template.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Lock { mode: LockMode },
    Rename { name: String },
    Echo { message: String },
    Notify { message: String },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Lock { .. } => OperationKind::Lock,
            Operation::Rename { .. } => OperationKind::Rename,
            Operation::Echo { .. } => OperationKind::Echo,
            Operation::Notify { .. } => OperationKind::Notify,
        }
    }

    /// The JSON payload persisted alongside the kind tag.
    pub fn payload(&self) -> Value {
        match self {
            Operation::Lock { mode } => json!({ "mode": mode.to_string() }),
            Operation::Rename { name } => json!({ "name": name }),
            Operation::Echo { message } => json!({ "message": message }),
            Operation::Notify { message } => json!({ "message": message }),
        }
    }

    /// Re-assemble the typed operation from a stored `(kind, data)` pair.
    ///
    /// A payload missing the field its kind requires yields
    /// `Error::MalformedAction`; callers classify that per action rather
    /// than failing a whole dispatch batch.
    pub fn from_parts(kind: OperationKind, data: &Value) -> Result<Self, Error> {
        match kind {
            OperationKind::Lock => {
                let raw = required_str(kind, data, "mode")?;
                let mode = raw
                    .parse::<LockMode>()
                    .map_err(Error::MalformedAction)?;
                Ok(Operation::Lock { mode })
            }
            OperationKind::Rename => Ok(Operation::Rename {
                name: required_str(kind, data, "name")?,
            }),
            OperationKind::Echo => Ok(Operation::Echo {
                message: required_str(kind, data, "message")?,
            }),
            OperationKind::Notify => Ok(Operation::Notify {
                message: required_str(kind, data, "message")?,
            }),
        }
    }
}

fn required_str(kind: OperationKind, data: &Value, field: &str) -> Result<String, Error> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::MalformedAction(format!("{kind} payload is missing \"{field}\""))
        })
}

/// A stored dispatch rule: when `platform` emits `on_event` for
/// `source_channel_id`, perform the operation at the Discord destination.
///
/// The operation is persisted as a kind tag plus raw JSON payload, exactly as
/// written; re-typing happens at dispatch time so a malformed row surfaces as
/// a per-action failure instead of poisoning the whole table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Action {
    pub action_id: Uuid,
    pub guild_id: String,
    pub platform: Platform,
    pub on_event: EventKind,
    pub source_channel_id: String,
    pub discord_channel_id: String,
    /// Present only when the destination is a thread under
    /// `discord_channel_id`.
    pub discord_thread_id: Option<String>,
    pub kind: OperationKind,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl Action {
    pub fn new(
        guild_id: &str,
        platform: Platform,
        on_event: EventKind,
        source_channel_id: &str,
        discord_channel_id: &str,
        discord_thread_id: Option<&str>,
        operation: &Operation,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4(),
            guild_id: guild_id.to_string(),
            platform,
            on_event,
            source_channel_id: source_channel_id.to_string(),
            discord_channel_id: discord_channel_id.to_string(),
            discord_thread_id: discord_thread_id.map(|s| s.to_string()),
            kind: operation.kind(),
            data: operation.payload(),
            created_at: Utc::now(),
        }
    }

    /// Parse the stored `(kind, data)` pair back into a typed operation.
    pub fn operation(&self) -> Result<Operation, Error> {
        Operation::from_parts(self.kind, &self.data)
    }
}
