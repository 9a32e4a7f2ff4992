//! Student CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{NewStudent, UpdateRequest};
use crate::response::{success_many, success_one, success_one_ok, success_one_updated};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.create(body).await?;
    Ok(success_one(student))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = state.students.list().await?;
    Ok(success_many(students))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.read(&id).await?;
    Ok(success_one_ok(student))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = body
        .input
        .ok_or_else(|| AppError::BadRequest("input is required".into()))?;
    let student = state.students.update(&id, patch).await?;
    Ok(success_one_updated(student))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
