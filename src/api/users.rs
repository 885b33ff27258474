use axum::{
    extract::{Query, State},
    response::Json,
};

use super::auth::Identity;
use super::error::ApiResult;
use crate::models::{IdeaSummary, UserCard};
use crate::services::ideas::IdeaQuery;
use crate::services::users::{ProfilePatch, ProfileView, UserSearchQuery, UserStats};
use crate::services::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(state.users().profile(&identity.uid).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(patch): Json<ProfilePatch>,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(
        state.users().update_profile(&identity.uid, patch).await?,
    ))
}

pub async fn record_login(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(
        state
            .users()
            .record_login(&identity.uid, &identity.email, identity.first_seen)
            .await?,
    ))
}

pub async fn user_ideas(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<IdeaQuery>,
) -> ApiResult<Json<Vec<IdeaSummary>>> {
    Ok(Json(state.users().user_ideas(&identity.uid, query).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<UserStats>> {
    Ok(Json(state.users().stats(&identity.uid).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<Vec<UserCard>>> {
    Ok(Json(state.users().search(query).await?))
}
