//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cursorhub_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{Profile, ProfileStore, StoreError, Username},
    infrastructure::dto::http::{ProfileDto, UpdateProfileRequest, UserDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of users with their latest session
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserDto>>, StatusCode> {
    let profiles = state.store.list_profiles().await.map_err(store_error_status)?;

    let mut users = Vec::with_capacity(profiles.len());
    for profile in profiles {
        users.push(to_user_dto(state.store.as_ref(), profile).await?);
    }
    Ok(Json(users))
}

/// Get one user by name
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserDto>, StatusCode> {
    let username = parse_username(username)?;
    let profile = state.store.get_profile(&username).await.map_err(store_error_status)?;
    Ok(Json(to_user_dto(state.store.as_ref(), profile).await?))
}

/// Update color and/or mood of a user. Empty fields are ignored.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileDto>, StatusCode> {
    let username = parse_username(username)?;
    let mut profile = state.store.get_profile(&username).await.map_err(store_error_status)?;

    profile.apply_update(request.color, request.mood);
    state
        .store
        .upsert_profile(profile.clone())
        .await
        .map_err(store_error_status)?;
    tracing::info!("Updated profile of '{}'", username);

    Ok(Json(ProfileDto {
        username: profile.username.into_string(),
        color: profile.color,
        mood: profile.mood,
    }))
}

fn parse_username(username: String) -> Result<Username, StatusCode> {
    Username::try_from(username).map_err(|e| {
        tracing::warn!("Invalid username: {}", e);
        StatusCode::BAD_REQUEST
    })
}

fn store_error_status(e: StoreError) -> StatusCode {
    match e {
        StoreError::ProfileNotFound(_) | StoreError::SessionRecordNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unavailable(reason) => {
            tracing::error!("Profile store unavailable: {}", reason);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn to_user_dto(store: &dyn ProfileStore, profile: Profile) -> Result<UserDto, StatusCode> {
    let latest = store
        .latest_session(&profile.username)
        .await
        .map_err(store_error_status)?;

    Ok(UserDto {
        username: profile.username.into_string(),
        color: profile.color,
        mood: profile.mood,
        is_active: latest.as_ref().is_some_and(|r| r.is_active),
        last_session_id: latest.as_ref().map(|r| r.id.to_string()),
        last_session_at: latest.and_then(|r| timestamp_to_jst_rfc3339(r.created_at.value())),
    })
}
