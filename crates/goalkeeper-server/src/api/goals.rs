//! `/goals` handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use goalkeeper_core::{GoalError, GoalId, GoalText};

use super::dto::{CreateGoalRequest, GoalCreated, GoalList, MessageBody};
use super::error::{ApiError, GoalOp};
use crate::app_state::AppState;

/// Tag a store failure with its operation and count it.
fn store_failure(state: &AppState, op: GoalOp) -> impl FnOnce(GoalError) -> ApiError + '_ {
    move |err| {
        state.metrics().store_errors.inc(&[("op", op.as_str())]);
        ApiError::new(op, err)
    }
}

/// GET /goals
pub async fn list_goals(State(state): State<AppState>) -> Result<Json<GoalList>, ApiError> {
    let goals = state
        .store()
        .list()
        .await
        .map_err(store_failure(&state, GoalOp::List))?;
    Ok(Json(GoalList { goals }))
}

/// POST /goals
///
/// A body that is not JSON, or whose `text` is not a string, is treated the
/// same as a missing `text`.
pub async fn create_goal(
    State(state): State<AppState>,
    body: Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalCreated>), ApiError> {
    let raw = match body {
        Ok(Json(req)) => req.text,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "create goal body rejected");
            None
        }
    };
    let text = GoalText::parse(raw.as_deref()).map_err(|e| ApiError::new(GoalOp::Create, e))?;

    let goal = state
        .store()
        .insert(text)
        .await
        .map_err(store_failure(&state, GoalOp::Create))?;
    tracing::info!(id = %goal.id, "goal saved");

    Ok((
        StatusCode::CREATED,
        Json(GoalCreated { message: "Goal saved", goal }),
    ))
}

/// DELETE /goals/:id
pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = GoalId::new(id);
    state
        .store()
        .delete(&id)
        .await
        .map_err(store_failure(&state, GoalOp::Delete))?;
    tracing::info!(id = %id, "goal deleted");

    Ok(Json(MessageBody { message: "Deleted goal!" }))
}
