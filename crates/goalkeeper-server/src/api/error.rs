//! Error-to-response mapping for the goal endpoints.
//!
//! Each handler tags its failure with the operation it was running; the status
//! and client message are decided here and nowhere else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use goalkeeper_core::GoalError;

use super::dto::MessageBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOp {
    List,
    Create,
    Delete,
}

impl GoalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalOp::List => "list",
            GoalOp::Create => "create",
            GoalOp::Delete => "delete",
        }
    }

    /// Generic message returned when the store fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            GoalOp::List => "Failed to load goals.",
            GoalOp::Create => "Failed to save goal.",
            GoalOp::Delete => "Failed to delete goal.",
        }
    }
}

pub const INVALID_TEXT_MESSAGE: &str = "Invalid goal text.";

#[derive(Debug)]
pub struct ApiError {
    pub op: GoalOp,
    pub err: GoalError,
}

impl ApiError {
    pub fn new(op: GoalOp, err: GoalError) -> Self {
        Self { op, err }
    }

    pub fn status(&self) -> StatusCode {
        if self.err.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.err.is_client_error() {
            INVALID_TEXT_MESSAGE
        } else {
            // The cause stays in the log; clients only get the generic message.
            tracing::error!(
                op = self.op.as_str(),
                code = self.err.client_code().as_str(),
                error = %self.err,
                "goal operation failed"
            );
            self.op.failure_message()
        };
        (status, Json(MessageBody { message })).into_response()
    }
}
