//! Nested profile sections.
//!
//! Each section is a zero-sized marker implementing [`Section`]; the handlers
//! in [`handlers`] are generic over it and instantiated once per section by the
//! router.

pub mod handlers;

use crate::models::profile::{
    About, Certification, Contact, Education, Experience, Language, ProfileSections, Project,
    Skill, SubItem,
};
use crate::validation::rules::SectionRules;
use crate::validation::sections as rules;

pub trait Section: Send + Sync + 'static {
    /// JSON key of the list inside a profile.
    const KEY: &'static str;
    /// Human-readable singular name used in responses, e.g. "Skill".
    const LABEL: &'static str;

    type Item: SubItem;

    fn rules() -> &'static SectionRules;
    fn items(sections: &ProfileSections) -> &Vec<Self::Item>;
    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Self::Item>;
}

pub struct AboutSection;
pub struct ContactSection;
pub struct SkillsSection;
pub struct ProjectsSection;
pub struct CertificationsSection;
pub struct EducationSection;
pub struct ExperienceSection;
pub struct LanguagesSection;

impl Section for AboutSection {
    const KEY: &'static str = "about";
    const LABEL: &'static str = "About";
    type Item = About;

    fn rules() -> &'static SectionRules {
        &rules::ABOUT
    }

    fn items(sections: &ProfileSections) -> &Vec<About> {
        &sections.about
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<About> {
        &mut sections.about
    }
}

impl Section for ContactSection {
    const KEY: &'static str = "contact";
    const LABEL: &'static str = "Contact";
    type Item = Contact;

    fn rules() -> &'static SectionRules {
        &rules::CONTACT
    }

    fn items(sections: &ProfileSections) -> &Vec<Contact> {
        &sections.contact
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Contact> {
        &mut sections.contact
    }
}

impl Section for SkillsSection {
    const KEY: &'static str = "skills";
    const LABEL: &'static str = "Skill";
    type Item = Skill;

    fn rules() -> &'static SectionRules {
        &rules::SKILLS
    }

    fn items(sections: &ProfileSections) -> &Vec<Skill> {
        &sections.skills
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Skill> {
        &mut sections.skills
    }
}

impl Section for ProjectsSection {
    const KEY: &'static str = "projects";
    const LABEL: &'static str = "Project";
    type Item = Project;

    fn rules() -> &'static SectionRules {
        &rules::PROJECTS
    }

    fn items(sections: &ProfileSections) -> &Vec<Project> {
        &sections.projects
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Project> {
        &mut sections.projects
    }
}

impl Section for CertificationsSection {
    const KEY: &'static str = "certifications";
    const LABEL: &'static str = "Certification";
    type Item = Certification;

    fn rules() -> &'static SectionRules {
        &rules::CERTIFICATIONS
    }

    fn items(sections: &ProfileSections) -> &Vec<Certification> {
        &sections.certifications
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Certification> {
        &mut sections.certifications
    }
}

impl Section for EducationSection {
    const KEY: &'static str = "education";
    const LABEL: &'static str = "Education";
    type Item = Education;

    fn rules() -> &'static SectionRules {
        &rules::EDUCATION
    }

    fn items(sections: &ProfileSections) -> &Vec<Education> {
        &sections.education
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Education> {
        &mut sections.education
    }
}

impl Section for ExperienceSection {
    const KEY: &'static str = "experience";
    const LABEL: &'static str = "Experience";
    type Item = Experience;

    fn rules() -> &'static SectionRules {
        &rules::EXPERIENCE
    }

    fn items(sections: &ProfileSections) -> &Vec<Experience> {
        &sections.experience
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Experience> {
        &mut sections.experience
    }
}

impl Section for LanguagesSection {
    const KEY: &'static str = "languages";
    const LABEL: &'static str = "Language";
    type Item = Language;

    fn rules() -> &'static SectionRules {
        &rules::LANGUAGES
    }

    fn items(sections: &ProfileSections) -> &Vec<Language> {
        &sections.languages
    }

    fn items_mut(sections: &mut ProfileSections) -> &mut Vec<Language> {
        &mut sections.languages
    }
}
