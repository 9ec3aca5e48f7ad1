use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{ProfileSections, ProfileView};
use crate::sections::handlers::{decode, load_profile, profile_not_found, Deleted, JsonBody};
use crate::state::AppState;
use crate::validation;

/// GET /api/profiles
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileView>>, AppError> {
    let profiles = state.store.list().await?;
    Ok(Json(profiles.iter().map(|p| p.to_view()).collect()))
}

/// POST /api/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<ProfileView>), AppError> {
    let Json(mut body) = body?;
    validation::validate_profile(state.store.as_ref(), &mut body).await?;

    let mut sections: ProfileSections = decode(body)?;
    sections.normalize_ids();
    let profile = state.store.insert(sections).await?;

    info!("Created profile {}", profile.id);
    Ok((StatusCode::CREATED, Json(profile.to_view())))
}

/// GET /api/profiles/:id
pub async fn show_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = load_profile(&state, &id).await?;
    Ok(Json(profile.to_view()))
}

/// DELETE /api/profiles/:id
pub async fn remove_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted<ProfileView>>, AppError> {
    let profile = load_profile(&state, &id).await?;
    let removed = state
        .store
        .delete(profile.id)
        .await?
        .ok_or_else(profile_not_found)?;

    info!("Deleted profile {}", removed.id);
    Ok(Json(Deleted {
        message: "Profile deleted successfully".to_string(),
        deleted: removed.to_view(),
    }))
}
