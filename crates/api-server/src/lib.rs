use application::RegistryApp;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<RegistryApp>,
}

/// Every route of the registry API, with permissive CORS and request tracing.
pub fn router(app: Arc<RegistryApp>) -> Router {
    let api = Router::new()
        .route("/user_exists", get(handlers::user_exists))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        // Profile completion
        .route("/submit-donor-form", post(handlers::submit_donor_form))
        .route("/submit-recipient-form", post(handlers::submit_recipient_form))
        // Emergency contacts
        .route(
            "/add-emergency-contacts/:user_id",
            post(handlers::add_emergency_contacts),
        )
        .route(
            "/emergency-contacts/:user_id",
            get(handlers::get_emergency_contacts),
        )
        // Reads
        .route("/profile/:user_id", get(handlers::get_profile))
        .route("/dashboard/:user_id", get(handlers::get_dashboard))
        .route("/status", get(handlers::get_system_status));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { app })
}
