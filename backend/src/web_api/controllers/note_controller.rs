use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    api_error::ApiError,
    app_state::SharedState,
    calendar_response::CalendarResponse,
    categorizer::{bucket_planned, calendar_month, classify, filter_view, CategoryId, LocalNow, SearchQuery, ViewOptions},
    create_task_request::CreateTaskRequest,
    planned_buckets_response::PlannedBucketsResponse,
    task::{NewTask, Task, TaskPatch},
    task_action_response::TaskActionResponse,
    task_response::TaskResponse,
    update_task_request::UpdateTaskRequest,
    user::User,
    view_query::{CalendarQuery, ViewQuery},
};

pub struct NoteController {}

impl NoteController {
    /// Every task, newest first.
    pub async fn get_all(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Query(query): Query<ViewQuery>,
    ) -> Result<Json<Vec<TaskResponse>>, ApiError> {
        let now = LocalNow::sample(user.zone());
        let tasks = state.data_context.list_tasks(user.id)?;
        let options = Self::options(CategoryId::AllTasks, &query);
        Ok(Json(responses(&filter_view(&tasks, CategoryId::AllTasks, &now, &options))))
    }

    pub async fn create(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Json(body): Json<CreateTaskRequest>,
    ) -> Result<(StatusCode, Json<TaskActionResponse>), ApiError> {
        let zone = user.zone();
        let new = NewTask::from_request(body, zone)?;
        let task = state.data_context.create_task(user.id, new, Utc::now())?;
        let now = LocalNow::sample(zone);
        Ok((StatusCode::CREATED, Json(action_response("Note created", &task, &now))))
    }

    pub async fn get_by_id(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<TaskResponse>, ApiError> {
        let task = state
            .data_context
            .get_task(user.id, id)?
            .ok_or(ApiError::NotFound)?;
        Ok(Json(task.to_response()))
    }

    pub async fn update(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
        Json(body): Json<UpdateTaskRequest>,
    ) -> Result<Json<TaskActionResponse>, ApiError> {
        let zone = user.zone();
        let patch = TaskPatch::from_request(body, zone)?;
        let task = state
            .data_context
            .update_task(user.id, id, patch, Utc::now())?
            .ok_or(ApiError::NotFound)?;
        let now = LocalNow::sample(zone);
        Ok(Json(action_response("Note updated", &task, &now)))
    }

    /// The reply carries the categories the task was in, so a client knows
    /// which lists to drop it from.
    pub async fn delete(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<TaskActionResponse>, ApiError> {
        let task = state
            .data_context
            .delete_task(user.id, id)?
            .ok_or(ApiError::NotFound)?;
        let now = LocalNow::sample(user.zone());
        Ok(Json(action_response("Note deleted", &task, &now)))
    }

    pub async fn search(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Query(query): Query<ViewQuery>,
    ) -> Result<Json<Vec<TaskResponse>>, ApiError> {
        let now = LocalNow::sample(user.zone());
        let search = SearchQuery::new(query.q.as_deref());
        let tasks = state.data_context.search_tasks(user.id, &search)?;
        let options = Self::options(CategoryId::AllTasks, &query);
        Ok(Json(responses(&filter_view(&tasks, CategoryId::AllTasks, &now, &options))))
    }

    pub async fn category(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Path(raw): Path<String>,
        Query(query): Query<ViewQuery>,
    ) -> Result<Json<Vec<TaskResponse>>, ApiError> {
        let category: CategoryId = raw.parse().map_err(|e| ApiError::Validation(format!("{e}")))?;
        let now = LocalNow::sample(user.zone());
        let tasks = state
            .data_context
            .list_tasks_by_category(user.id, category, &now)?;
        let options = Self::options(category, &query);
        Ok(Json(responses(&filter_view(&tasks, category, &now, &options))))
    }

    pub async fn planned_buckets(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
    ) -> Result<Json<PlannedBucketsResponse>, ApiError> {
        let now = LocalNow::sample(user.zone());
        let tasks = state
            .data_context
            .list_tasks_by_category(user.id, CategoryId::Planned, &now)?;
        Ok(Json(bucket_planned(&tasks, &now).into()))
    }

    pub async fn calendar(
        State(state): State<SharedState>,
        Extension(user): Extension<User>,
        Query(query): Query<CalendarQuery>,
    ) -> Result<Json<CalendarResponse>, ApiError> {
        let now = LocalNow::sample(user.zone());
        let (year, month) = match query.month.as_deref() {
            Some(raw) => parse_month(raw)?,
            None => (now.today().year(), now.today().month()),
        };
        let tasks = state
            .data_context
            .list_tasks_by_category(user.id, CategoryId::Calendar, &now)?;
        let month = calendar_month(&tasks, year, month, &now)
            .ok_or_else(|| ApiError::Validation(format!("month {year}-{month:02} is out of range")))?;
        Ok(Json(month.into()))
    }

    fn options(category: CategoryId, query: &ViewQuery) -> ViewOptions {
        let options = ViewOptions::for_category(category).search(SearchQuery::new(query.q.as_deref()));
        match query.hide_completed {
            Some(hide) => options.hide_completed(hide),
            None => options,
        }
    }
}

fn responses(tasks: &[Task]) -> Vec<TaskResponse> {
    tasks.iter().map(Task::to_response).collect()
}

fn action_response(message: &str, task: &Task, now: &LocalNow) -> TaskActionResponse {
    TaskActionResponse {
        message: message.to_string(),
        note: task.to_response(),
        categories: classify(task, now),
    }
}

/// `YYYY-MM`.
fn parse_month(raw: &str) -> Result<(i32, u32), ApiError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map(|first| (first.year(), first.month()))
        .map_err(|_| ApiError::Validation(format!("invalid month '{raw}', expected YYYY-MM")))
}
