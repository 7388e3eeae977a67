//! Subscriber transport subsystem.
//!
//! # Data Flow
//! ```text
//! GET /logs (WebSocket upgrade)
//!     → websocket.rs: WsSubscriber + bounded queue
//!     → ConnectionPool::subscribe
//!     → broadcast payloads → queue → socket
//!     → client close / shutdown → ConnectionPool::unsubscribe
//!
//! GET /status → status.rs (version, subscriber count)
//! ```
//!
//! # Design Decisions
//! - The pool never awaits a socket: sends go through `try_send` on a bounded queue
//! - A full queue drops the message for that subscriber only
//! - A dropped queue receiver reports `Closed`, which prunes the subscriber

pub mod server;
pub mod status;
pub mod websocket;

pub use server::{AppState, HttpServer};
pub use websocket::WsSubscriber;
