// Campus Feed - API Core
//
// Backend for a campus social feed: posts are classified into events,
// lost & found items, and announcements by an AI provider chain with
// keyword heuristics as the last resort.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
