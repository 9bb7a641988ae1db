pub mod request_id;

// Re-export middleware components for easier access
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware};
