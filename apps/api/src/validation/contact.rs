use serde_json::Value;
use uuid::Uuid;

use super::rules::{normalize_email, Check, FieldError};
use crate::store::{ProfileStore, StoreError};

/// Flags contact emails that already belong to another profile.
/// Entries whose email is malformed are left to the pattern check.
pub async fn email_conflicts(
    store: &dyn ProfileStore,
    contacts: &Value,
    editing: Option<Uuid>,
) -> Result<Vec<FieldError>, StoreError> {
    let mut errors = Vec::new();
    let Some(entries) = contacts.as_array() else {
        return Ok(errors);
    };

    for (i, entry) in entries.iter().enumerate() {
        let path = format!("contact[{i}].email");
        errors.extend(entry_email_conflict(store, entry, &path, editing).await?);
    }
    Ok(errors)
}

/// Single-entry form of [`email_conflicts`], reported at `path`.
pub async fn entry_email_conflict(
    store: &dyn ProfileStore,
    entry: &Value,
    path: &str,
    editing: Option<Uuid>,
) -> Result<Option<FieldError>, StoreError> {
    let Some(raw) = entry.get("email") else {
        return Ok(None);
    };
    if !Check::Email.passes(Some(raw)) {
        return Ok(None);
    }
    let email = raw.as_str().map(normalize_email).unwrap_or_default();
    if store.contact_email_taken(&email, editing).await? {
        return Ok(Some(FieldError::new(path, raw.clone(), "Email already in use")));
    }
    Ok(None)
}
