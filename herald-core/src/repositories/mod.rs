// src/repositories/mod.rs

pub mod postgres;

pub use herald_common::traits::repository_traits::ActionRepository;
pub use postgres::action::PostgresActionRepository;
