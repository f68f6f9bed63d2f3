//! Domain 層
//!
//! エンティティ・値オブジェクトと、Infrastructure 層が実装するインターフェース（trait）を定義します。

pub mod connection_registry;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;
pub mod vote_ledger;

pub use connection_registry::{Connection, ConnectionRegistry, PusherChannel};
pub use entity::{Question, Questionnaire};
pub use error::{BroadcastError, FactoryError, RepositoryError, ValueObjectError, VoteLedgerError};
pub use factory::{HostSecretFactory, QuestionIdFactory, QuestionnaireIdFactory};
pub use repository::QuestionnaireRepository;
pub use value_object::{
    ConnectionId, HostSecret, QuestionId, QuestionText, QuestionnaireId, Timestamp, Title,
    VoterToken,
};
pub use vote_ledger::VoteLedger;
