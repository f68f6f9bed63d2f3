//! UI 層: HTTP API と WebSocket のエンドポイント

pub mod cookie;
mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::{Server, router};
