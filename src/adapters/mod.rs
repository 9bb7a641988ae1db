//! Adapters layer
//!
//! Inbound adapters that drive the application layer. Only HTTP for now.

pub mod http;
