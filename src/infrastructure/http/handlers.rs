use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::dto::{IdQuery, IdResponse, NextDateQuery, TaskDto, TasksResponse};
use super::error::ApiError;
use crate::application::services::TaskService;
use crate::domain::value_objects::repeat_rule;
use crate::domain::value_objects::task_date::parse_date;

/// Shared state for axum handlers
#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
}

// === NEXT DATE ===

/// `GET /api/nextdate?now=&date=&repeat=`, answers with a plain-text date or
/// the evaluator's error message.
pub async fn next_date(Query(query): Query<NextDateQuery>) -> impl IntoResponse {
    let bad_request = |msg: String| (StatusCode::BAD_REQUEST, msg).into_response();

    let Some(now_raw) = query.now.filter(|v| !v.is_empty()) else {
        return bad_request("Missing parameter 'now'".to_string());
    };
    let Some(now) = parse_date(&now_raw) else {
        return bad_request("Invalid parameter - now".to_string());
    };
    let Some(date) = query.date.filter(|v| !v.is_empty()) else {
        return bad_request("Invalid parameter - date".to_string());
    };
    let repeat = query.repeat.unwrap_or_default();

    match repeat_rule::next_date(now, &date, &repeat) {
        Ok(next) => {
            debug!("nextdate now={} date={} repeat={:?} -> {}", now_raw, date, repeat, next);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                next,
            )
                .into_response()
        }
        Err(e) => bad_request(e.to_string()),
    }
}

// === TASK CRUD ===

/// `POST /api/task`
pub async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskDto>, JsonRejection>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let Json(dto) = payload.map_err(|_| ApiError::bad_request("JSON parsing error"))?;
    let (_, draft) = dto.into_draft();

    let id = state.task_service.create_task(draft).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id: id.to_string() })))
}

/// `GET /api/task?id=`
pub async fn get_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<TaskDto>, ApiError> {
    let task = state
        .task_service
        .get_task(query.id.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(task.into()))
}

/// `PUT /api/task`
pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskDto>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(dto) = payload.map_err(|_| ApiError::bad_request("Invalid JSON format"))?;
    let (id, draft) = dto.into_draft();

    state.task_service.update_task(&id, draft).await?;
    Ok(Json(json!({})))
}

/// `DELETE /api/task?id=`
pub async fn delete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .task_service
        .delete_task(query.id.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({})))
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<TasksResponse>, ApiError> {
    let tasks = state.task_service.list_tasks().await?;
    Ok(Json(TasksResponse {
        tasks: tasks.into_iter().map(TaskDto::from).collect(),
    }))
}

/// `POST /api/task/done?id=`
pub async fn complete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .task_service
        .complete_task(query.id.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({})))
}
