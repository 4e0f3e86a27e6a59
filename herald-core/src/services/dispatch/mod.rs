// File: src/services/dispatch/mod.rs
//
// The dispatch engine: given a fired channel event, find the actions
// registered for it, resolve their Discord destinations, and run each
// action's operation in isolation.

pub mod dispatcher;
pub mod executors;
pub mod resolver;
pub mod service;
pub mod template;

pub use dispatcher::{
    ActionDispatcher, ActionOutcome, DispatchOutcome, DispatchReport, FailureKind,
};
pub use resolver::{CachedDestinationResolver, DestinationResolver, DirectDestinationResolver};
pub use service::DispatchService;
