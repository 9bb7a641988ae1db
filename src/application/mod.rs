//! Application layer
//!
//! Use cases and the mutation handler that turn raw form submissions into
//! validated domain calls and report the outcome back to the HTTP adapter.

pub mod invoice;
