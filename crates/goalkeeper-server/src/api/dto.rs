//! JSON request and response bodies for `/goals`.

use goalkeeper_core::Goal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalList {
    pub goals: Vec<Goal>,
}

#[derive(Debug, Serialize)]
pub struct GoalCreated {
    pub message: &'static str,
    pub goal: Goal,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}
