//! Data Transfer Objects for REST request/response serialization.

pub mod assets_dto;
pub mod common_dto;
pub mod metrics_dto;

pub use assets_dto::*;
pub use common_dto::*;
pub use metrics_dto::*;
