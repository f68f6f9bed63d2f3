//! Data Transfer Objects (DTOs)
//!
//! DTOs are organized by protocol:
//! - `websocket`: Room に配信するイベント
//! - `http`: HTTP API のリクエスト / レスポンス

pub mod conversion;
pub mod http;
pub mod websocket;
