use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use crate::{db::entities::todo, db::todo_repo, error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub done: bool,
    pub pub_date: DateTimeWithTimeZone,
    pub update_date: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos/{todo_id}", get(get_todo))
        .with_state(state)
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(todo_id): Path<i32>,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = todo_repo::get_by_id(&state.db, todo_id).await?;
    Ok(Json(todo.into()))
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            text: model.text,
            done: model.done,
            pub_date: model.pub_date,
            update_date: model.update_date,
        }
    }
}
