pub mod health;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

use crate::profiles::handlers as profiles;
use crate::sections::handlers::{
    append_item, clear_section, list_items, remove_item, replace_section, show_item,
    show_section, update_item,
};
use crate::sections::{
    AboutSection, CertificationsSection, ContactSection, EducationSection, ExperienceSection,
    LanguagesSection, ProjectsSection, Section, SkillsSection,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/profiles",
            post(profiles::create_profile).get(profiles::list_profiles),
        )
        .route(
            "/api/profiles/:id",
            get(profiles::show_profile).delete(profiles::remove_profile),
        );

    let router = router
        .route("/api/about/:id", whole_section::<AboutSection>())
        // Contact form submissions append a single entry.
        .route(
            "/api/contact/:id",
            whole_section::<ContactSection>().post(append_item::<ContactSection>),
        );
    let router = item_routes::<SkillsSection>(router, "/api/skills");
    let router = item_routes::<ProjectsSection>(router, "/api/projects");
    let router = item_routes::<CertificationsSection>(router, "/api/certifications");
    let router = item_routes::<EducationSection>(router, "/api/education");
    let router = item_routes::<ExperienceSection>(router, "/api/experience");
    let router = item_routes::<LanguagesSection>(router, "/api/languages");
    // Singular path kept for older front-end clients.
    let router = item_routes::<LanguagesSection>(router, "/api/language");

    router.with_state(state)
}

/// Sections handled as one value: about, contact.
fn whole_section<S: Section>() -> MethodRouter<AppState> {
    get(show_section::<S>)
        .put(replace_section::<S>)
        .delete(clear_section::<S>)
}

/// Sections whose elements are addressed by sub-id.
fn item_routes<S: Section>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(
            &format!("{base}/:id"),
            get(list_items::<S>).post(append_item::<S>),
        )
        .route(
            &format!("{base}/:id/:sub_id"),
            get(show_item::<S>)
                .put(update_item::<S>)
                .delete(remove_item::<S>),
        )
}
