//! Infrastructure 層
//!
//! Domain 層の trait の具体的な実装と、外部とやり取りする DTO を提供します。

pub mod connection_registry;
pub mod dto;
pub mod repository;
pub mod vote_ledger;
