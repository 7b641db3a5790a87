//! HTTP route handlers for the contact API.
//!
//! # Route Structure
//!
//! Contact routes are nested under the configured prefix (`/api` by default).
//!
//! ```text
//! GET    /health                      - Liveness check
//! GET    /health/ready                - Readiness check (store reachable)
//!
//! # Contacts
//! GET    /contacts                    - List (firstName + lastName filter), or one with ?name=
//! GET    /contacts/all                - List (firstName + lastName filter)
//! GET    /contacts/get?name=          - First contact with the first name
//! GET    /contacts/{id}               - Contact by id
//! POST   /contacts                    - Create from JSON body (201 + Location)
//! PUT    /contacts                    - Update from {oldName, newName, phone}
//! DELETE /contacts                    - Delete from {firstName} ("*" deletes all)
//! POST   /contacts/post?name=&lname=&phone=  - Create from query
//! PUT    /contacts/put?name=&lname=&phone=   - Partial update from query
//! DELETE /contacts/delete?firstName=  - Delete first match
//! POST   /contacts/reset              - Delete all
//! POST   /contacts/createbulk         - Create from JSON array
//! ```
//!
//! The collection routes also answer on `/contacts/`.

pub mod contacts;
pub mod health;

use axum::{
    Router,
    routing::{MethodRouter, delete, get, post, put},
};

use crate::state::AppState;

/// Handlers for the collection itself, served at `/contacts` and `/contacts/`.
fn collection() -> MethodRouter<AppState> {
    get(contacts::index)
        .post(contacts::create)
        .put(contacts::update_from_body)
        .delete(contacts::delete_from_body)
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/all", get(contacts::list))
        .route("/get", get(contacts::show_by_name))
        .route("/delete", delete(contacts::delete_by_query))
        .route("/put", put(contacts::update_by_query))
        .route("/post", post(contacts::create_from_query))
        .route("/reset", post(contacts::reset))
        .route("/createbulk", post(contacts::create_bulk))
        .route("/{id}", get(contacts::show))
}

/// Build the full application router with state attached.
///
/// Middleware (tracing, request ids, Sentry) is layered on in `main`.
pub fn app(state: AppState) -> Router {
    let prefix = state.config().api_prefix.clone();
    // A nested "/" only matches "/contacts", so the slash form is routed explicitly
    let contacts = Router::new()
        .route("/contacts/", collection())
        .nest("/contacts", contact_routes());

    let api = if prefix.is_empty() {
        contacts
    } else {
        Router::new().nest(&prefix, contacts)
    };

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(api)
        .with_state(state)
}
