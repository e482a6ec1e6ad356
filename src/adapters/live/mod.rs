//! Live adapters for real external interactions.

pub mod gateway;
pub mod id_gen;

pub use gateway::HttpTaskGateway;
pub use id_gen::UuidGenerator;
