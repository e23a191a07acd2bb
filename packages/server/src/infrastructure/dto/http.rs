//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// User with the state of their most recent session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    pub color: String,
    pub mood: String,
    pub is_active: bool,
    pub last_session_id: Option<String>,
    pub last_session_at: Option<String>, // ISO 8601
}

/// Profile as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    pub username: String,
    pub color: String,
    pub mood: String,
}

/// Body of `PATCH /api/users/{username}`; empty fields are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}
