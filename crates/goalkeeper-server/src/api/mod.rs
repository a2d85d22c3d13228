//! Goal CRUD surface: request/response shapes, handlers, and error mapping.

pub mod dto;
pub mod error;
pub mod goals;

pub use error::{ApiError, GoalOp};
