// File: herald-common/src/models/mod.rs
pub mod action;
pub mod event;
pub mod message;
pub mod platform;

pub use action::{Action, LockMode, Operation, OperationKind};
pub use event::ChannelEvent;
pub use message::{Embed, EmbedAuthor, EmbedField, EmbedFooter, OutboundMessage};
pub use platform::{EventKind, Platform};
