//! Category API endpoints, nested under a project

use api_types::category::{CategoryView, CategoryWrite};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::CategoryInput;

use crate::{
    JsonBody, ServerError,
    projects::ProjectParam,
    server::ServerState,
    views::{category_type, category_view},
};

fn category_input(payload: CategoryWrite) -> CategoryInput {
    CategoryInput {
        name: payload.name,
        category_type: category_type(payload.category_type),
        parent: payload.parent,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    param: ProjectParam,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(&param.project.id, &param.user.username)
        .await?;

    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn add(
    State(state): State<ServerState>,
    param: ProjectParam,
    WithRejection(Json(payload), _): JsonBody<CategoryWrite>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .add_category(
            &param.project.id,
            &param.user.username,
            category_input(payload),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    param: ProjectParam,
    Path((_, category_id)): Path<(String, String)>,
    WithRejection(Json(payload), _): JsonBody<CategoryWrite>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            &param.project.id,
            &param.user.username,
            &category_id,
            category_input(payload),
        )
        .await?;

    Ok(Json(category_view(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    param: ProjectParam,
    Path((_, category_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(&param.project.id, &param.user.username, &category_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
