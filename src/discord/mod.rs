//! Discord connectivity
//!
//! Two halves, mirroring the platform's API split:
//! - gateway: long-lived websocket for the event stream (ready, messages)
//! - rest: HTTP client for sending messages and embeds

pub mod gateway;
pub mod rest;
pub mod types;

pub use gateway::GatewayClient;
pub use rest::RestClient;
pub use types::GatewayEvent;
