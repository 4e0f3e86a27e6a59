// File: src/platforms/discord/mod.rs

pub mod transport;

pub use transport::TwilightChatTransport;
