//! Infrastructure layer: configuration, the backend HTTP client, agent
//! dispatch, and file system access.

pub mod agents;
pub mod clipboard;
pub mod config;
pub mod http;
pub mod persistence;

pub use agents::*;
pub use clipboard::*;
pub use config::*;
pub use http::*;
pub use persistence::*;
