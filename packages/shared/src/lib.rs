//! Utilities shared by the Ama packages.

pub mod logger;
pub mod time;
