//! Request validation.
//!
//! Every rule runs and every failure is reported; nothing is written to the
//! store unless the whole payload passes. Sanitizers run only after that.

pub mod contact;
pub mod rules;
pub mod sections;

use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::ProfileStore;
use rules::{Mode, SectionRules};

/// Validates `body[rules.key]` as a list, then sanitizes it in place.
pub async fn validate_list(
    store: &dyn ProfileStore,
    rules: &SectionRules,
    body: &mut Value,
    mode: Mode,
    editing: Option<Uuid>,
) -> Result<(), AppError> {
    let mut errors = rules.validate_list(body, mode);
    if rules.key == sections::CONTACT.key {
        if let Some(entries) = body.get(rules.key) {
            errors.extend(contact::email_conflicts(store, entries, editing).await?);
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    rules.sanitize_list(body);
    Ok(())
}

/// Validates a single bare entry, then sanitizes it in place.
pub async fn validate_entry(
    store: &dyn ProfileStore,
    rules: &SectionRules,
    entry: &mut Value,
    mode: Mode,
    editing: Option<Uuid>,
) -> Result<(), AppError> {
    let mut errors = Vec::new();
    rules.validate_entry(entry, "", mode, &mut errors);
    if rules.key == sections::CONTACT.key {
        errors.extend(contact::entry_email_conflict(store, entry, "email", editing).await?);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    rules.sanitize_entry(entry);
    Ok(())
}

/// Validates a whole-profile payload. Every section is optional, but a
/// section that is present must satisfy its rules in create mode.
pub async fn validate_profile(store: &dyn ProfileStore, body: &mut Value) -> Result<(), AppError> {
    let Some(object) = body.as_object_mut() else {
        return Err(AppError::BadRequest(
            "Profile payload must be a JSON object".to_string(),
        ));
    };
    object.retain(|_, v| !v.is_null());

    let mut errors = Vec::new();
    for rules in sections::ALL {
        if body.get(rules.key).is_some() {
            errors.extend(rules.validate_list(body, Mode::Create));
        }
    }
    if let Some(entries) = body.get(sections::CONTACT.key) {
        errors.extend(contact::email_conflicts(store, entries, None).await?);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    for rules in sections::ALL {
        rules.sanitize_list(body);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProfileStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_profile_payload_sections_are_optional() {
        let store = MemoryProfileStore::new();
        let mut body = json!({"skills": [{"name": " Go ", "proficiency": "8"}], "about": null});
        validate_profile(&store, &mut body).await.unwrap();
        assert_eq!(body, json!({"skills": [{"name": "Go", "proficiency": 8}]}));
    }

    #[tokio::test]
    async fn test_profile_payload_reports_errors_across_sections() {
        let store = MemoryProfileStore::new();
        let mut body = json!({
            "skills": [{"name": "Go", "proficiency": 42}],
            "languages": "English",
            "contact": [{"email": "bad"}]
        });
        let Err(AppError::Validation(errors)) = validate_profile(&store, &mut body).await else {
            panic!("expected validation failure");
        };
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["skills[0].proficiency", "contact[0].email", "languages"]);
    }

    #[tokio::test]
    async fn test_profile_payload_must_be_object() {
        let store = MemoryProfileStore::new();
        let mut body = json!([1, 2]);
        assert!(matches!(
            validate_profile(&store, &mut body).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
