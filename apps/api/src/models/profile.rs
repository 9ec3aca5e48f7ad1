use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Timestamp format used when a profile is rendered to a client.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted profile document.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub sections: ProfileSections,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn to_view(&self) -> ProfileView {
        ProfileView {
            id: self.id,
            sections: self.sections.clone(),
            version: self.version,
            created_at: self.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: self.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// The nested lists of a profile. This is the part stored as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSections {
    pub about: Vec<About>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub contact: Vec<Contact>,
    pub certifications: Vec<Certification>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub languages: Vec<Language>,
}

impl ProfileSections {
    /// Replaces missing or duplicated sub-item ids in every list.
    pub fn normalize_ids(&mut self) {
        ensure_unique_ids(&mut self.about);
        ensure_unique_ids(&mut self.skills);
        ensure_unique_ids(&mut self.projects);
        ensure_unique_ids(&mut self.contact);
        ensure_unique_ids(&mut self.certifications);
        ensure_unique_ids(&mut self.education);
        ensure_unique_ids(&mut self.experience);
        ensure_unique_ids(&mut self.languages);
    }
}

/// Client-facing rendering of a profile with formatted timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub sections: ProfileSections,
    pub version: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// An element of a profile list, addressed by its own id.
pub trait SubItem: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial update; `None` fields leave the existing value untouched.
    type Patch: DeserializeOwned + Send;

    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn apply(&mut self, patch: Self::Patch);
}

pub fn position_of<T: SubItem>(items: &[T], id: Uuid) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

pub fn find_by_id<T: SubItem>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Keeps the first occurrence of each id and hands out fresh ids to repeats.
pub fn ensure_unique_ids<T: SubItem>(items: &mut [T]) {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items.iter_mut() {
        if !seen.insert(item.id()) {
            let fresh = Uuid::new_v4();
            item.set_id(fresh);
            seen.insert(fresh);
        }
    }
}

/// Patch field that tells `null` (clear, `Some(None)`) apart from an
/// absent key (keep, `None` via `#[serde(default)]`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ────────────────────────────────────────────────────────────────────────────
// Section items
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AboutPatch {
    pub content: Option<String>,
}

impl SubItem for About {
    type Patch = AboutPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: AboutPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub proficiency: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub proficiency: Option<u8>,
}

impl SubItem for Skill {
    type Patch = SkillPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: SkillPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(proficiency) = patch.proficiency {
            self.proficiency = proficiency;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub link: Option<Option<String>>,
}

impl SubItem for Project {
    type Patch = ProjectPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
        if let Some(link) = patch.link {
            self.link = link;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub linkedin: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: Option<Option<String>>,
}

impl SubItem for Contact {
    type Patch = ContactPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: ContactPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(linkedin) = patch.linkedin {
            self.linkedin = linkedin;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub institution: String,
    pub year: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct CertificationPatch {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub year: Option<i32>,
}

impl SubItem for Certification {
    type Patch = CertificationPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: CertificationPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(institution) = patch.institution {
            self.institution = institution;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub field: Option<Option<String>>,
}

impl SubItem for Education {
    type Patch = EducationPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: EducationPatch) {
        if let Some(degree) = patch.degree {
            self.degree = degree;
        }
        if let Some(institution) = patch.institution {
            self.institution = institution;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(field) = patch.field {
            self.field = field;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<EndDate>,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<EndDate>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
}

impl SubItem for Experience {
    type Patch = ExperiencePatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: ExperiencePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
        if let Some(achievements) = patch.achievements {
            self.achievements = achievements;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub proficiency: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct LanguagePatch {
    pub name: Option<String>,
    pub proficiency: Option<u8>,
}

impl SubItem for Language {
    type Patch = LanguagePatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn apply(&mut self, patch: LanguagePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(proficiency) = patch.proficiency {
            self.proficiency = proficiency;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience end date
// ────────────────────────────────────────────────────────────────────────────

/// End of an experience: an open-ended sentinel or a calendar date.
/// Sentinels round-trip verbatim and are never interpreted as dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDate {
    Current,
    Present,
    On(NaiveDate),
}

impl EndDate {
    /// Accepts `current`, `present`, or a strict `YYYY-MM-DD` date.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "current" => Some(EndDate::Current),
            "present" => Some(EndDate::Present),
            _ => parse_strict_date(raw).map(EndDate::On),
        }
    }
}

impl fmt::Display for EndDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndDate::Current => f.write_str("current"),
            EndDate::Present => f.write_str("present"),
            EndDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for EndDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EndDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EndDate::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "{raw} is not a valid ending date. It must be 'current', 'present', or a valid date (YYYY-MM-DD)."
            ))
        })
    }
}

/// `YYYY-MM-DD` with zero padding, rejecting impossible dates like 2023-02-30.
pub fn parse_strict_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_end_date_sentinels_round_trip_verbatim() {
        let current: EndDate = serde_json::from_value(json!("current")).unwrap();
        assert_eq!(current, EndDate::Current);
        assert_eq!(serde_json::to_value(current).unwrap(), json!("current"));

        let present: EndDate = serde_json::from_value(json!("present")).unwrap();
        assert_eq!(serde_json::to_value(present).unwrap(), json!("present"));
    }

    #[test]
    fn test_end_date_accepts_calendar_date() {
        let end: EndDate = serde_json::from_value(json!("2023-06-30")).unwrap();
        assert_eq!(
            end,
            EndDate::On(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap())
        );
        assert_eq!(end.to_string(), "2023-06-30");
    }

    #[test]
    fn test_end_date_rejects_garbage() {
        assert!(EndDate::parse("soon").is_none());
        assert!(EndDate::parse("2023-6-30").is_none());
        assert!(EndDate::parse("2023-02-30").is_none());
        assert!(EndDate::parse("Current").is_none());
    }

    #[test]
    fn test_profile_view_formats_timestamps() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let profile = Profile {
            id: Uuid::new_v4(),
            sections: ProfileSections::default(),
            version: 1,
            created_at: created,
            updated_at: created,
        };
        let view = serde_json::to_value(profile.to_view()).unwrap();
        assert_eq!(view["createdAt"], "2024-03-01 09:05:07");
        assert_eq!(view["updatedAt"], "2024-03-01 09:05:07");
        assert_eq!(view["skills"], json!([]));
        assert!(view.get("_id").is_some());
    }

    #[test]
    fn test_missing_sub_item_id_is_generated() {
        let skill: Skill = serde_json::from_value(json!({"name": "Go", "proficiency": 8})).unwrap();
        assert!(!skill.id.is_nil());
    }

    #[test]
    fn test_ensure_unique_ids_replaces_duplicates() {
        let id = Uuid::new_v4();
        let mut skills = vec![
            Skill { id, name: "Go".into(), proficiency: 8 },
            Skill { id, name: "Rust".into(), proficiency: 9 },
        ];
        ensure_unique_ids(&mut skills);
        assert_eq!(skills[0].id, id);
        assert_ne!(skills[1].id, id);
    }

    #[test]
    fn test_null_patch_field_clears_optional_value() {
        let mut education = Education {
            id: Uuid::new_v4(),
            degree: "B.Tech".into(),
            institution: "IIT".into(),
            year: 2019,
            field: Some("CS".into()),
        };
        let keep: EducationPatch = serde_json::from_value(json!({"year": 2020})).unwrap();
        education.apply(keep);
        assert_eq!(education.field.as_deref(), Some("CS"));

        let clear: EducationPatch = serde_json::from_value(json!({"field": null})).unwrap();
        education.apply(clear);
        assert_eq!(education.field, None);
        assert_eq!(education.year, 2020);
    }

    #[test]
    fn test_legacy_id_key_is_not_an_item_id() {
        let id = Uuid::new_v4();
        let skill: Skill =
            serde_json::from_value(json!({"id": id, "_id": id, "name": "Go", "proficiency": 8}))
                .unwrap();
        assert_eq!(skill.id, id);

        let skill: Skill =
            serde_json::from_value(json!({"id": "abc", "name": "Go", "proficiency": 8})).unwrap();
        assert!(!skill.id.is_nil());
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let mut project = Project {
            id: Uuid::new_v4(),
            title: "Folio".into(),
            description: "Portfolio site".into(),
            technologies: vec!["rust".into()],
            link: Some("https://example.com".into()),
        };
        project.apply(ProjectPatch {
            title: Some("Folio v2".into()),
            ..Default::default()
        });
        assert_eq!(project.title, "Folio v2");
        assert_eq!(project.description, "Portfolio site");
        assert_eq!(project.link.as_deref(), Some("https://example.com"));
    }
}
