// src/repositories/postgres/mod.rs

pub mod action;

pub use action::PostgresActionRepository;
