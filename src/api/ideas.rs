use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth::Identity;
use super::error::ApiResult;
use crate::models::{AnalysisReport, IdeaAnalysis, IdeaSummary};
use crate::services::ideas::{
    IdeaQuery, IdeaRequest, InteractionRequest, PublicSearchQuery, TrendingQuery,
};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct AttachRequest {
    pub analysis: AnalysisReport,
}

pub async fn create_idea(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<IdeaRequest>,
) -> ApiResult<(StatusCode, Json<IdeaAnalysis>)> {
    let idea = state
        .ideas()
        .create(&identity.uid, &identity.email, request)
        .await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

pub async fn list_ideas(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<IdeaQuery>,
) -> ApiResult<Json<Vec<IdeaSummary>>> {
    Ok(Json(state.ideas().list(&identity.uid, query).await?))
}

pub async fn get_idea(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<IdeaAnalysis>> {
    Ok(Json(state.ideas().get_with_view(&identity.uid, &id).await?))
}

pub async fn delete_idea(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.ideas().delete(&identity.uid, &id).await?;
    Ok(Json(json!({ "message": "Idea analysis deleted" })))
}

pub async fn attach_analysis(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(request): Json<AttachRequest>,
) -> ApiResult<Json<IdeaAnalysis>> {
    Ok(Json(
        state
            .ideas()
            .attach_analysis(&identity.uid, &id, request.analysis)
            .await?,
    ))
}

pub async fn analyze_idea(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<IdeaAnalysis>> {
    Ok(Json(state.ideas().analyze(&identity.uid, &id).await?))
}

pub async fn interact(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(request): Json<InteractionRequest>,
) -> ApiResult<Json<IdeaAnalysis>> {
    Ok(Json(
        state.ideas().interact(&identity.uid, &id, request).await?,
    ))
}

pub async fn public_search(
    State(state): State<AppState>,
    Query(query): Query<PublicSearchQuery>,
) -> ApiResult<Json<Vec<IdeaSummary>>> {
    Ok(Json(state.ideas().public_search(query).await?))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Json<Vec<IdeaSummary>>> {
    Ok(Json(state.ideas().trending(query).await?))
}
