//! Live Q&A server library.
//!
//! A host opens a questionnaire, participants ask questions and vote them up,
//! and every connected viewer receives updates over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
