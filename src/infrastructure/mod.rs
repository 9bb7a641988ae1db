//! Infrastructure layer
//!
//! Adapters for the domain ports: Postgres persistence, page caches and
//! configuration loading.

pub mod cache;
pub mod config;
pub mod persistence;
