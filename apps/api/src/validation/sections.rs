//! Rule chains for each profile section.

use super::rules::{Check, FieldRule, Presence, Sanitize, SectionRules};

macro_rules! id_rule {
    ($message:literal) => {
        FieldRule {
            field: "_id",
            presence: Presence::Optional,
            checks: &[(Check::Uuid, $message)],
            sanitize: Sanitize::Keep,
        }
    };
}

pub static ABOUT: SectionRules = SectionRules {
    key: "about",
    array_message: "About must be an array",
    entry_message: "Each about entry must be an object",
    fields: &[
        id_rule!("Each about entry must have a valid _id"),
        FieldRule {
            field: "content",
            presence: Presence::Required,
            checks: &[(
                Check::MinLength(10),
                "Content must be at least 10 characters long",
            )],
            sanitize: Sanitize::Trim,
        },
    ],
};

pub static SKILLS: SectionRules = SectionRules {
    key: "skills",
    array_message: "Skills must be an array",
    entry_message: "Each skill must be an object",
    fields: &[
        id_rule!("Each skill must have a valid _id"),
        FieldRule {
            field: "name",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Skill name cannot be empty")],
            sanitize: Sanitize::Trim,
        },
        FieldRule {
            field: "proficiency",
            presence: Presence::Required,
            checks: &[(
                Check::IntRange { min: 1, max: 10 },
                "Level must be between 1 and 10",
            )],
            sanitize: Sanitize::Int,
        },
    ],
};

pub static PROJECTS: SectionRules = SectionRules {
    key: "projects",
    array_message: "Projects must be an array",
    entry_message: "Each project must be an object",
    fields: &[
        id_rule!("Each project must have a valid _id"),
        FieldRule {
            field: "title",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Project title cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "description",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Project description cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "technologies",
            presence: Presence::Required,
            checks: &[(Check::StringArray, "Technologies must be an array")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "link",
            presence: Presence::Optional,
            checks: &[(Check::Url, "Link must be a valid URL")],
            sanitize: Sanitize::Keep,
        },
    ],
};

pub static CONTACT: SectionRules = SectionRules {
    key: "contact",
    array_message: "Contact must be an array",
    entry_message: "Each contact entry must be an object",
    fields: &[
        id_rule!("Each contact entry must have a valid _id"),
        FieldRule {
            field: "email",
            presence: Presence::Required,
            checks: &[(Check::Email, "Email must be valid")],
            sanitize: Sanitize::Email,
        },
        FieldRule {
            field: "phoneNumber",
            presence: Presence::Optional,
            checks: &[(
                Check::Phone,
                "Phone number must be valid and in the format +91-XXXXXXXXXX",
            )],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "linkedin",
            presence: Presence::Optional,
            checks: &[(Check::Url, "LinkedIn URL must be valid")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "message",
            presence: Presence::Optional,
            checks: &[(
                Check::MinLength(10),
                "Message must be at least 10 characters long",
            )],
            sanitize: Sanitize::Trim,
        },
    ],
};

pub static CERTIFICATIONS: SectionRules = SectionRules {
    key: "certifications",
    array_message: "Certifications must be an array",
    entry_message: "Each certification must be an object",
    fields: &[
        id_rule!("Each certification must have a valid _id"),
        FieldRule {
            field: "name",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Certification name cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "institution",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Institution name cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "year",
            presence: Presence::Required,
            checks: &[(Check::Int, "Year must be an integer")],
            sanitize: Sanitize::Int,
        },
    ],
};

pub static EDUCATION: SectionRules = SectionRules {
    key: "education",
    array_message: "Education must be an array",
    entry_message: "Each education entry must be an object",
    fields: &[
        id_rule!("Each education entry must have a valid _id"),
        FieldRule {
            field: "degree",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Degree cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "institution",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Institution name cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "year",
            presence: Presence::Required,
            checks: &[(Check::Int, "Year must be an integer")],
            sanitize: Sanitize::Int,
        },
        FieldRule {
            field: "field",
            presence: Presence::Optional,
            checks: &[(Check::NotEmpty, "Field of study cannot be empty")],
            sanitize: Sanitize::Trim,
        },
    ],
};

pub static EXPERIENCE: SectionRules = SectionRules {
    key: "experience",
    array_message: "Experience must be an array",
    entry_message: "Each experience entry must be an object",
    fields: &[
        id_rule!("Each experience entry must have a valid _id"),
        FieldRule {
            field: "title",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Title cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "company",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Company name cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "startDate",
            presence: Presence::Required,
            checks: &[(
                Check::IsoDate,
                "Start date must be a valid date (YYYY-MM-DD)",
            )],
            sanitize: Sanitize::Date,
        },
        FieldRule {
            field: "endDate",
            presence: Presence::OptionalFalsy,
            checks: &[(
                Check::EndDate,
                "{value} is not a valid date. End date must be \"current\", \"present\", or a valid date (YYYY-MM-DD)",
            )],
            sanitize: Sanitize::DropFalsy,
        },
        FieldRule {
            field: "location",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Location cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "description",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Description cannot be empty")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "technologies",
            presence: Presence::Required,
            checks: &[(Check::StringArray, "Technologies must be an array")],
            sanitize: Sanitize::Keep,
        },
        FieldRule {
            field: "achievements",
            presence: Presence::Required,
            checks: &[(Check::StringArray, "Achievements must be an array")],
            sanitize: Sanitize::Keep,
        },
    ],
};

pub static LANGUAGES: SectionRules = SectionRules {
    key: "languages",
    array_message: "Languages must be an array",
    entry_message: "Each language must be an object",
    fields: &[
        id_rule!("Each language must have a valid _id"),
        FieldRule {
            field: "name",
            presence: Presence::Required,
            checks: &[(Check::NotEmpty, "Language name cannot be empty")],
            sanitize: Sanitize::Trim,
        },
        FieldRule {
            field: "proficiency",
            presence: Presence::Required,
            checks: &[(
                Check::IntRange { min: 1, max: 10 },
                "Proficiency must be between 1 and 10",
            )],
            sanitize: Sanitize::Int,
        },
    ],
};

pub static ALL: [&SectionRules; 8] = [
    &ABOUT,
    &SKILLS,
    &PROJECTS,
    &CONTACT,
    &CERTIFICATIONS,
    &EDUCATION,
    &EXPERIENCE,
    &LANGUAGES,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::Mode;
    use serde_json::json;

    #[test]
    fn test_proficiency_out_of_range_is_rejected() {
        for bad in [0, 11, -3] {
            let body = json!({"skills": [{"name": "Go", "proficiency": bad}]});
            let errors = SKILLS.validate_list(&body, Mode::Create);
            assert_eq!(errors.len(), 1, "proficiency {bad}");
            assert_eq!(errors[0].path, "skills[0].proficiency");
        }
        let body = json!({"languages": [{"name": "Hindi", "proficiency": 12}]});
        let errors = LANGUAGES.validate_list(&body, Mode::Patch);
        assert_eq!(errors[0].msg, "Proficiency must be between 1 and 10");
    }

    #[test]
    fn test_short_about_content_is_rejected_after_trim() {
        let body = json!({"about": [{"content": "   short    "}]});
        let errors = ABOUT.validate_list(&body, Mode::Create);
        assert_eq!(errors[0].msg, "Content must be at least 10 characters long");
    }

    #[test]
    fn test_contact_optional_fields() {
        let ok = json!({"contact": [{"email": "me@site.dev"}]});
        assert!(CONTACT.validate_list(&ok, Mode::Create).is_empty());

        let bad = json!({"contact": [{
            "email": "me@site.dev",
            "phoneNumber": "12345",
            "linkedin": "not a url",
            "message": "hi"
        }]});
        let msgs: Vec<_> = CONTACT
            .validate_list(&bad, Mode::Create)
            .into_iter()
            .map(|e| e.msg)
            .collect();
        assert_eq!(
            msgs,
            vec![
                "Phone number must be valid and in the format +91-XXXXXXXXXX",
                "LinkedIn URL must be valid",
                "Message must be at least 10 characters long",
            ]
        );
    }

    #[test]
    fn test_experience_end_date_variants() {
        let base = |end: serde_json::Value| {
            json!({"experience": [{
                "title": "Engineer",
                "company": "Acme",
                "startDate": "2021-01-01",
                "endDate": end,
                "location": "Pune",
                "description": "Built things",
                "technologies": ["rust"],
                "achievements": []
            }]})
        };
        assert!(EXPERIENCE.validate_list(&base(json!("current")), Mode::Create).is_empty());
        assert!(EXPERIENCE.validate_list(&base(json!("present")), Mode::Create).is_empty());
        assert!(EXPERIENCE.validate_list(&base(json!("2023-12-31")), Mode::Create).is_empty());
        assert!(EXPERIENCE.validate_list(&base(json!(null)), Mode::Create).is_empty());

        let errors = EXPERIENCE.validate_list(&base(json!("later")), Mode::Create);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].msg.starts_with("later is not a valid date."));
    }

    #[test]
    fn test_invalid_sub_item_id_is_rejected() {
        let body = json!({"skills": [{"_id": "abc", "name": "Go", "proficiency": 5}]});
        let errors = SKILLS.validate_list(&body, Mode::Patch);
        assert_eq!(errors[0].msg, "Each skill must have a valid _id");
    }

    #[test]
    fn test_rule_keys_are_unique() {
        let mut keys: Vec<_> = ALL.iter().map(|r| r.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }
}
