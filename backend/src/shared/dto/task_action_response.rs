use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{categorizer::CategoryId, task_response::TaskResponse};

/// Reply to create/update/delete. `categories` is the field-driven
/// classification of the task after the change, so a client can
/// reconcile whichever list it is showing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskActionResponse {
    pub message: String,
    pub note: TaskResponse,
    pub categories: BTreeSet<CategoryId>,
}
