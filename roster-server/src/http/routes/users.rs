//! User endpoints
//!
//! Thin mapping of the five service operations onto `/user`. Every handler
//! opens a request scope bounded by the configured API timeout.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::UserId;
use crate::http::server::AppState;
use crate::models::{
    CreateUserRequest, ListUsersRequest, PageMeta, UpdateUserRequest, UserView, ValidationError,
};

/// Body of create and update requests
///
/// Missing fields default to empty/zero so they fail validation with a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub name: String,
    pub age: i32,
}

/// Query parameters for listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl TryFrom<ListQuery> for ListUsersRequest {
    type Error = ValidationError;

    fn try_from(q: ListQuery) -> Result<Self, Self::Error> {
        let limit = q.limit.unwrap_or(0);
        if limit < 0 {
            return Err(ValidationError::Negative {
                field: "limit",
                value: limit,
            });
        }
        Ok(Self {
            limit,
            page: q.page.unwrap_or(0),
        })
    }
}

/// Response envelope: `data` plus optional page metadata
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageMeta>,
}

impl<T> Envelope<T> {
    fn data(data: T) -> Self {
        Self {
            data: Some(data),
            page: None,
        }
    }
}

impl Envelope<()> {
    fn empty() -> Self {
        Self {
            data: None,
            page: None,
        }
    }
}

/// POST /user - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let Json(payload) = payload?;
    let request = CreateUserRequest::new(&payload.name, payload.age)?;

    let scope = state.request_scope();
    let id = state.service.create_user(&scope, request).await?;
    tracing::info!(%id, "user created");

    Ok((StatusCode::CREATED, Json(Envelope::empty())))
}

/// GET /user - list users with pagination
async fn list_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<UserView>>>, ApiError> {
    let Query(query) = query?;
    let request = ListUsersRequest::try_from(query)?;

    let scope = state.request_scope();
    let page = state.service.get_list_user(&scope, request).await?;

    Ok(Json(Envelope {
        data: Some(page.users),
        page: Some(page.meta),
    }))
}

/// GET /user/{id} - get a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Json<Envelope<UserView>>, ApiError> {
    let scope = state.request_scope();
    let user = state.service.get_user_detail(&scope, &id).await?;
    Ok(Json(Envelope::data(user)))
}

/// PUT /user/{id} - overwrite name and age
async fn update_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Json(payload) = payload?;
    let request = UpdateUserRequest::new(&payload.name, payload.age)?;

    let scope = state.request_scope();
    state.service.update_user(&scope, &id, request).await?;
    Ok(Json(Envelope::empty()))
}

/// DELETE /user/{id} - delete a user (missing ids succeed)
async fn delete_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Json<Envelope<()>>, ApiError> {
    let scope = state.request_scope();
    state.service.delete_user(&scope, &id).await?;
    Ok(Json(Envelope::empty()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(list_users).post(create_user))
        .route(
            "/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
