//! Data Transfer Objects for REST request/response serialization.
//!
//! DTOs are kept separate from domain types so the wire contract can
//! evolve without touching the coordination model.

pub mod alarm_dto;
pub mod apn_dto;
pub mod common_dto;
pub mod element_dto;
pub mod pool_dto;

pub use alarm_dto::*;
pub use apn_dto::*;
pub use common_dto::*;
pub use element_dto::*;
pub use pool_dto::*;
