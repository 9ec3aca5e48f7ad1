//! Axum route handlers shared by every profile section.
//!
//! All mutations follow the same cycle: load the whole profile, change one
//! list in memory, save the profile with a version check.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::Section;
use crate::errors::AppError;
use crate::models::profile::{ensure_unique_ids, find_by_id, position_of, Profile, SubItem};
use crate::state::AppState;
use crate::validation::{self, rules::Mode};

pub type JsonBody = Result<Json<Value>, JsonRejection>;

/// Body returned by every delete route: what was removed.
#[derive(Debug, Serialize)]
pub struct Deleted<T> {
    pub message: String,
    pub deleted: T,
}

pub fn profile_not_found() -> AppError {
    AppError::NotFound("Profile not found".to_string())
}

/// Resolves a path id to a stored profile. Malformed ids are simply not found.
pub async fn load_profile(state: &AppState, raw_id: &str) -> Result<Profile, AppError> {
    let Ok(id) = Uuid::parse_str(raw_id) else {
        debug!("Rejected malformed profile id '{raw_id}'");
        return Err(profile_not_found());
    };
    state.store.get(id).await?.ok_or_else(profile_not_found)
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn item_not_found<S: Section>() -> AppError {
    AppError::NotFound(format!("{} not found", S::LABEL))
}

fn locate<S: Section>(profile: &Profile, raw_sub_id: &str) -> Result<usize, AppError> {
    Uuid::parse_str(raw_sub_id)
        .ok()
        .and_then(|id| position_of(S::items(&profile.sections), id))
        .ok_or_else(item_not_found::<S>)
}

fn entry_id(entry: &Value) -> Option<Uuid> {
    entry
        .get("_id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Picks the entry of a `{ "<section>": [...] }` body that targets `sub_id`.
///
/// An entry whose id matches wins. When no entry carries an id the first one
/// is used. Only the chosen entry is ever written.
fn select_entry<S: Section>(body: &mut Value, sub_id: &str) -> Result<Value, AppError> {
    let target = Uuid::parse_str(sub_id).ok();
    let entries = body
        .get_mut(S::KEY)
        .and_then(Value::as_array_mut)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "{} data must be an array and cannot be empty",
                S::LABEL
            ))
        })?;

    let matched = entries
        .iter()
        .position(|entry| target.is_some() && entry_id(entry) == target);
    let index = match matched {
        Some(index) => index,
        None if entries.iter().all(|entry| entry_id(entry).is_none()) => 0,
        None => {
            return Err(AppError::NotFound(format!(
                "{} entry not found",
                S::LABEL
            )))
        }
    };
    Ok(entries.swap_remove(index))
}

// ────────────────────────────────────────────────────────────────────────────
// Whole-section routes (about, contact)
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/{about,contact}/:id
pub async fn show_section<S: Section>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<S::Item>>, AppError> {
    let profile = load_profile(&state, &id).await?;
    Ok(Json(S::items(&profile.sections).clone()))
}

/// PUT /api/{about,contact}/:id
pub async fn replace_section<S: Section>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Vec<S::Item>>, AppError> {
    let Json(mut body) = body?;
    let editing = Uuid::parse_str(&id).ok();
    validation::validate_list(
        state.store.as_ref(),
        S::rules(),
        &mut body,
        Mode::Create,
        editing,
    )
    .await?;
    let mut items: Vec<S::Item> =
        decode(body.get_mut(S::KEY).map(std::mem::take).unwrap_or_default())?;
    ensure_unique_ids(&mut items);

    let mut profile = load_profile(&state, &id).await?;
    *S::items_mut(&mut profile.sections) = items;
    let saved = state.store.save(&profile).await?;

    info!(
        "Replaced {} on profile {} ({} entries)",
        S::KEY,
        saved.id,
        S::items(&saved.sections).len()
    );
    Ok(Json(S::items(&saved.sections).clone()))
}

/// DELETE /api/{about,contact}/:id
pub async fn clear_section<S: Section>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted<Vec<S::Item>>>, AppError> {
    let mut profile = load_profile(&state, &id).await?;
    let prior = std::mem::take(S::items_mut(&mut profile.sections));
    state.store.save(&profile).await?;

    info!("Cleared {} on profile {}", S::KEY, profile.id);
    Ok(Json(Deleted {
        message: format!("{} section deleted", S::LABEL),
        deleted: prior,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-item routes (skills, projects, certifications, education, experience,
// languages)
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/<section>/:id
pub async fn list_items<S: Section>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<S::Item>>, AppError> {
    let profile = load_profile(&state, &id).await?;
    Ok(Json(S::items(&profile.sections).clone()))
}

/// POST /api/<section>/:id, also POST /api/contact/:id
pub async fn append_item<S: Section>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<(StatusCode, Json<S::Item>), AppError> {
    let Json(mut entry) = body?;
    let editing = Uuid::parse_str(&id).ok();
    validation::validate_entry(
        state.store.as_ref(),
        S::rules(),
        &mut entry,
        Mode::Create,
        editing,
    )
    .await?;
    let mut item: S::Item = decode(entry)?;

    let mut profile = load_profile(&state, &id).await?;
    let item_id = Uuid::new_v4();
    item.set_id(item_id);
    S::items_mut(&mut profile.sections).push(item);
    let saved = state.store.save(&profile).await?;

    let stored = find_by_id(S::items(&saved.sections), item_id)
        .cloned()
        .ok_or_else(item_not_found::<S>)?;
    info!("Added {} {item_id} to profile {}", S::KEY, saved.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/<section>/:id/:sub_id
pub async fn show_item<S: Section>(
    State(state): State<AppState>,
    Path((id, sub_id)): Path<(String, String)>,
) -> Result<Json<S::Item>, AppError> {
    let profile = load_profile(&state, &id).await?;
    let index = locate::<S>(&profile, &sub_id)?;
    Ok(Json(S::items(&profile.sections)[index].clone()))
}

/// PUT /api/<section>/:id/:sub_id
///
/// Accepts either a bare object of fields or `{ "<section>": [entries] }`.
/// Supplied fields overwrite, omitted fields keep their stored values. The
/// response is read back from the saved document.
pub async fn update_item<S: Section>(
    State(state): State<AppState>,
    Path((id, sub_id)): Path<(String, String)>,
    body: JsonBody,
) -> Result<Json<S::Item>, AppError> {
    let Json(mut body) = body?;
    if !body.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }
    let batch = body.get(S::KEY).is_some();
    let editing = Uuid::parse_str(&id).ok();
    if batch {
        validation::validate_list(
            state.store.as_ref(),
            S::rules(),
            &mut body,
            Mode::Patch,
            editing,
        )
        .await?;
    } else {
        validation::validate_entry(
            state.store.as_ref(),
            S::rules(),
            &mut body,
            Mode::Patch,
            editing,
        )
        .await?;
    }

    let mut profile = load_profile(&state, &id).await?;
    let index = locate::<S>(&profile, &sub_id)?;
    let patch_value = if batch {
        select_entry::<S>(&mut body, &sub_id)?
    } else {
        body
    };
    let patch: <S::Item as SubItem>::Patch = decode(patch_value)?;

    let item = &mut S::items_mut(&mut profile.sections)[index];
    let item_id = item.id();
    item.apply(patch);
    let saved = state.store.save(&profile).await?;

    let updated = find_by_id(S::items(&saved.sections), item_id)
        .cloned()
        .ok_or_else(item_not_found::<S>)?;
    info!("Updated {} {item_id} on profile {}", S::KEY, saved.id);
    Ok(Json(updated))
}

/// DELETE /api/<section>/:id/:sub_id
pub async fn remove_item<S: Section>(
    State(state): State<AppState>,
    Path((id, sub_id)): Path<(String, String)>,
) -> Result<Json<Deleted<S::Item>>, AppError> {
    let mut profile = load_profile(&state, &id).await?;
    let index = locate::<S>(&profile, &sub_id)?;
    let removed = S::items_mut(&mut profile.sections).remove(index);
    state.store.save(&profile).await?;

    info!("Removed {} {} from profile {}", S::KEY, removed.id(), profile.id);
    Ok(Json(Deleted {
        message: format!("{} deleted successfully", S::LABEL),
        deleted: removed,
    }))
}
