// src/lib.rs

pub mod db;
pub mod eventbus;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use db::Database;
pub use herald_common::error::Error;
pub use herald_common::models;
pub use herald_common::traits;
