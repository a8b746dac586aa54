//! Project API endpoints

use std::collections::HashMap;

use api_types::{
    currency::CurrencyView,
    project::{CurrenciesUpdate, MainCurrencyUpdate, ProjectNew, ProjectRename, ProjectView},
};
use axum::{
    Extension, Json,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
};
use axum_extra::extract::WithRejection;
use engine::{Project, User, is_valid_and_exist};

use crate::{
    JsonBody, ServerError,
    server::ServerState,
    views::{currency_view, project_view},
};

/// The project named by the `{id}` path segment, resolved for the caller.
///
/// Every `/projects/{id}` route goes through this extractor: a malformed id
/// or a project the caller cannot see rejects the request before the handler
/// runs.
pub struct ProjectParam {
    pub project: Project,
    pub user: User,
}

impl FromRequestParts<ServerState> for ProjectParam {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|err| ServerError::Generic(err.body_text()))?;
        let project_id = params
            .get("id")
            .ok_or_else(|| ServerError::Generic("missing project id".to_string()))?;
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or_else(|| ServerError::Generic("unidentified caller".to_string()))?;

        let lookup = state.engine.project_lookup(&user.username);
        let project = is_valid_and_exist(project_id, &lookup).await?;

        Ok(Self { project, user })
    }
}

/// Handle requests for creating a new `Project`
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): JsonBody<ProjectNew>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state
        .engine
        .create_project(&payload.name, &user.username)
        .await?;

    Ok(Json(project_view(project)))
}

/// Handle requests for listing the caller's projects
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state.engine.projects(&user.username).await?;

    Ok(Json(projects.into_iter().map(project_view).collect()))
}

pub async fn get(param: ProjectParam) -> Json<ProjectView> {
    Json(project_view(param.project))
}

pub async fn rename(
    State(state): State<ServerState>,
    param: ProjectParam,
    WithRejection(Json(payload), _): JsonBody<ProjectRename>,
) -> Result<Json<String>, ServerError> {
    let name = state
        .engine
        .rename_project(&param.project.id, &param.user.username, &payload.name)
        .await?;

    Ok(Json(name))
}

pub async fn update_currencies(
    State(state): State<ServerState>,
    param: ProjectParam,
    WithRejection(Json(payload), _): JsonBody<CurrenciesUpdate>,
) -> Result<Json<Vec<CurrencyView>>, ServerError> {
    let currencies = state
        .engine
        .update_currencies(
            &param.project.id,
            &param.user.username,
            &payload.currencies,
        )
        .await?;

    Ok(Json(currencies.into_iter().map(currency_view).collect()))
}

pub async fn update_main_currency(
    State(state): State<ServerState>,
    param: ProjectParam,
    WithRejection(Json(payload), _): JsonBody<MainCurrencyUpdate>,
) -> Result<Json<CurrencyView>, ServerError> {
    let currency = state
        .engine
        .update_main_currency(
            &param.project.id,
            &param.user.username,
            &payload.main_currency,
        )
        .await?;

    Ok(Json(currency_view(currency)))
}
