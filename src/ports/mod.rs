//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the board core and an
//! external system (the task and user services, id generation).
//! Implementations live in `src/adapters/`.

pub mod gateway;
pub mod id_gen;

pub use gateway::{
    AssigneeChoice, GatewayFuture, SuggestionMode, TaskGateway, TaskRecord, TaskRecordInput,
};
pub use id_gen::IdGenerator;
