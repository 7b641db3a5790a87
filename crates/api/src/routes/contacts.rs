//! Contact route handlers.
//!
//! Two families of endpoints share the `/contacts` collection:
//!
//! - query-string forms (`/contacts/put?name=..`, `/contacts/post?name=..`,
//!   `/contacts/delete?firstName=..`) kept for older clients
//! - JSON body forms on `/contacts` itself
//!
//! Name lookups are not unique. Every handler that targets "the contact named X"
//! acts on the first match (lowest id).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use contact_book_core::{ContactId, non_blank};

use crate::error::{AppError, Result};
use crate::models::{Contact, ContactUpdate, NewContact};
use crate::state::AppState;

/// First name that selects every contact in a JSON delete.
pub const DELETE_ALL_WILDCARD: &str = "*";

// =============================================================================
// Request Types
// =============================================================================

/// Query for `GET /contacts`.
///
/// `name` selects a single contact; `firstName` + `lastName` together filter
/// the list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsQuery {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Query for the single-contact lookup.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Query for `DELETE /contacts/delete`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    #[serde(alias = "name")]
    pub first_name: Option<String>,
}

/// Query for the `put` and `post` forms.
#[derive(Debug, Deserialize)]
pub struct ContactFieldsQuery {
    pub name: Option<String>,
    pub lname: Option<String>,
    pub phone: Option<String>,
}

/// Body for `PUT /contacts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub phone: Option<String>,
}

/// Body for `DELETE /contacts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub first_name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List contacts, or fetch one when `name` is given.
///
/// GET /contacts
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ContactsQuery>,
) -> Result<Response> {
    if query.name.is_some() {
        let contact = find_named(&state, query.name.as_deref()).await?;
        return Ok(Json(contact).into_response());
    }

    let contacts = list_contacts(&state, &query).await?;
    Ok(Json(contacts).into_response())
}

/// List contacts, optionally filtered by first and last name.
///
/// GET /contacts/all
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ContactsQuery>,
) -> Result<Json<Vec<Contact>>> {
    Ok(Json(list_contacts(&state, &query).await?))
}

/// Fetch the first contact with the given first name.
///
/// GET /contacts/get?name=X
#[instrument(skip(state))]
pub async fn show_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Contact>> {
    Ok(Json(find_named(&state, query.name.as_deref()).await?))
}

/// Fetch a contact by id.
///
/// GET /contacts/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Contact>> {
    state
        .contacts()
        .find_by_id(ContactId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("contact {id}")))
}

/// Delete the first contact with the given first name.
///
/// DELETE /contacts/delete?firstName=X
#[instrument(skip(state))]
pub async fn delete_by_query(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode> {
    let contact = find_named(&state, query.first_name.as_deref()).await?;
    state.contacts().delete(contact.id).await?;
    Ok(StatusCode::OK)
}

/// Partially update the first contact with the given first name.
///
/// PUT /contacts/put?name=X&lname=Y&phone=Z
///
/// Only `lname` and `phone` can change; blank or absent values are ignored.
#[instrument(skip(state))]
pub async fn update_by_query(
    State(state): State<AppState>,
    Query(query): Query<ContactFieldsQuery>,
) -> Result<StatusCode> {
    let contact = find_named(&state, query.name.as_deref()).await?;
    let update = ContactUpdate::new(None, query.lname, query.phone);

    if !update.is_empty() {
        state.contacts().update(contact.id, &update).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Rename and/or re-number a contact found by its current first name.
///
/// PUT /contacts
#[instrument(skip_all)]
pub async fn update_from_body(
    State(state): State<AppState>,
    body: std::result::Result<Json<RenameRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(request) = body.map_err(bad_json)?;

    let Some(old_name) = non_blank(request.old_name) else {
        return Err(AppError::NotFound("contact without name".to_string()));
    };

    let contact = find_named(&state, Some(&old_name)).await?;
    let update = ContactUpdate::new(request.new_name, None, request.phone);

    if !update.is_empty() {
        state.contacts().update(contact.id, &update).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Create a contact from query parameters.
///
/// POST /contacts/post?name=X&lname=Y&phone=Z
#[instrument(skip(state))]
pub async fn create_from_query(
    State(state): State<AppState>,
    Query(query): Query<ContactFieldsQuery>,
) -> Result<Response> {
    let Some(first_name) = non_blank(query.name) else {
        return Err(AppError::BadRequest("name is required".to_string()));
    };

    let new = NewContact {
        first_name,
        last_name: non_blank(query.lname),
        phone_number: non_blank(query.phone),
    };
    let contact = state.contacts().save(new).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, contact_location(&state, contact.id))],
    )
        .into_response())
}

/// Create a contact from a JSON body.
///
/// POST /contacts
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewContact>, JsonRejection>,
) -> Result<Response> {
    let Json(new) = body.map_err(bad_json)?;
    let new = new
        .validated()
        .ok_or_else(|| AppError::BadRequest("firstName is required".to_string()))?;
    let contact = state.contacts().save(new).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, contact_location(&state, contact.id))],
        Json(contact),
    )
        .into_response())
}

/// Delete one contact by first name, or all of them with `"*"`.
///
/// DELETE /contacts
///
/// A malformed body answers `304 Not Modified` rather than 400.
#[instrument(skip_all)]
pub async fn delete_from_body(
    State(state): State<AppState>,
    body: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Malformed delete body");
        AppError::NotModified
    })?;

    if request.first_name == DELETE_ALL_WILDCARD {
        state.contacts().delete_all().await?;
        return Ok(StatusCode::OK);
    }

    let contact = find_named(&state, Some(&request.first_name)).await?;
    state.contacts().delete(contact.id).await?;
    Ok(StatusCode::OK)
}

/// Delete every contact.
///
/// POST /contacts/reset
#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode> {
    state.contacts().delete_all().await?;
    Ok(StatusCode::OK)
}

/// Create many contacts at once.
///
/// POST /contacts/createbulk
///
/// `Location` points at the collection since there is no single new resource.
#[instrument(skip_all)]
pub async fn create_bulk(
    State(state): State<AppState>,
    body: std::result::Result<Json<Vec<NewContact>>, JsonRejection>,
) -> Result<Response> {
    let Json(batch) = body.map_err(bad_json)?;
    let batch = batch
        .into_iter()
        .enumerate()
        .map(|(index, new)| {
            new.validated().ok_or_else(|| {
                AppError::BadRequest(format!("entry {index}: firstName is required"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let contacts = state.contacts().save_all(batch).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, state.config().contacts_url())],
        Json(contacts),
    )
        .into_response())
}

// =============================================================================
// Helpers
// =============================================================================

async fn list_contacts(state: &AppState, query: &ContactsQuery) -> Result<Vec<Contact>> {
    let contacts = match (&query.first_name, &query.last_name) {
        (Some(first_name), Some(last_name)) => {
            state
                .contacts()
                .find_by_first_and_last_name(first_name, last_name)
                .await?
        }
        _ => state.contacts().find_all().await?,
    };
    Ok(contacts)
}

/// First contact with the given first name, or `NotFound`.
async fn find_named(state: &AppState, first_name: Option<&str>) -> Result<Contact> {
    let Some(first_name) = first_name else {
        return Err(AppError::NotFound("contact without name".to_string()));
    };

    state
        .contacts()
        .find_first_by_first_name(first_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("contact named {first_name}")))
}

fn contact_location(state: &AppState, id: ContactId) -> String {
    format!("{}/{id}", state.config().contacts_url())
}

#[allow(clippy::needless_pass_by_value)]
fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;
    use crate::db::{ContactStore, InMemoryContactStore};

    const BASE_URL: &str = "http://contacts.test";

    fn test_app() -> (Router, Arc<InMemoryContactStore>) {
        let store = Arc::new(InMemoryContactStore::new());
        let state = AppState::new(ApiConfig::in_memory(BASE_URL), store.clone());
        (crate::routes::app(state), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
            .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    async fn create_geoff(app: &Router) -> Response {
        send(
            app,
            Method::POST,
            "/contacts",
            Some(r#"{"firstName":"Geoff","lastName":"Choy","phoneNumber":"000"}"#),
        )
        .await
    }

    #[tokio::test]
    async fn test_create_then_get_by_name() {
        let (app, _) = test_app();

        let response = create_geoff(&app).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created_at = location(&response).to_owned();
        let created = json_body(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created_at, format!("{BASE_URL}/contacts/{id}"));

        let response = send(&app, Method::GET, "/contacts?name=Geoff", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": id, "firstName": "Geoff", "lastName": "Choy", "phoneNumber": "000"})
        );
    }

    #[tokio::test]
    async fn test_location_resolves_to_created_contact() {
        let (app, _) = test_app();

        let response = create_geoff(&app).await;
        let path = location(&response).trim_start_matches(BASE_URL).to_owned();

        let response = send(&app, Method::GET, &path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["firstName"], "Geoff");
    }

    #[tokio::test]
    async fn test_get_unknown_contact_is_not_found() {
        let (app, _) = test_app();

        let response = send(&app, Method::GET, "/contacts?name=Nobody", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/contacts/get?name=Nobody", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/contacts/12345", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rename_via_body() {
        let (app, _) = test_app();
        create_geoff(&app).await;

        let response = send(
            &app,
            Method::PUT,
            "/contacts",
            Some(r#"{"oldName":"Geoff","newName":"Foobar","phone":"111"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/contacts?name=Foobar", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["phoneNumber"], "111");
        assert_eq!(body["lastName"], "Choy");

        let response = send(&app, Method::GET, "/contacts?name=Geoff", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_body_without_old_name_is_not_found() {
        let (app, _) = test_app();
        create_geoff(&app).await;

        let response = send(&app, Method::PUT, "/contacts", Some(r#"{"newName":"X"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            Method::PUT,
            "/contacts",
            Some(r#"{"oldName":"","newName":"X"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        let (app, _) = test_app();

        for (method, uri) in [
            (Method::PUT, "/contacts"),
            (Method::POST, "/contacts"),
            (Method::POST, "/contacts/createbulk"),
        ] {
            let response = send(&app, method, uri, Some("{not json")).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }

        let response = send(&app, Method::POST, "/contacts", Some(r#"{"lastName":"X"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_delete_body_is_not_modified() {
        let (app, store) = test_app();
        create_geoff(&app).await;

        let response = send(&app, Method::DELETE, "/contacts", Some("{not json")).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_body_wildcard_removes_everything() {
        let (app, store) = test_app();
        create_geoff(&app).await;
        send(&app, Method::POST, "/contacts/post?name=Ann", None).await;

        let response = send(&app, Method::DELETE, "/contacts", Some(r#"{"firstName":"*"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.find_all().await.unwrap().is_empty());

        let response = send(&app, Method::GET, "/contacts", None).await;
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_delete_body_by_name() {
        let (app, _) = test_app();
        create_geoff(&app).await;

        let response = send(
            &app,
            Method::DELETE,
            "/contacts",
            Some(r#"{"firstName":"Geoff"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/contacts?name=Geoff", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            Method::DELETE,
            "/contacts",
            Some(r#"{"firstName":"Geoff"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_by_query_takes_first_match() {
        let (app, store) = test_app();
        send(&app, Method::POST, "/contacts/post?name=Sam&lname=One", None).await;
        send(&app, Method::POST, "/contacts/post?name=Sam&lname=Two", None).await;

        let response = send(&app, Method::DELETE, "/contacts/delete?firstName=Sam", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let remaining = store.find_by_first_name("Sam").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].last_name.as_deref(), Some("Two"));

        let response = send(&app, Method::DELETE, "/contacts/delete?name=Sam", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, "/contacts/delete?firstName=Sam", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_create_and_partial_update() {
        let (app, store) = test_app();

        let response = send(&app, Method::POST, "/contacts/post?name=Geoff", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(location(&response).starts_with(&format!("{BASE_URL}/contacts/")));

        // Blank fields leave the record untouched
        let response = send(&app, Method::PUT, "/contacts/put?name=Geoff&lname=&phone=", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let geoff = store.find_first_by_first_name("Geoff").await.unwrap().unwrap();
        assert_eq!(geoff.last_name, None);
        assert_eq!(geoff.phone_number, None);

        let response = send(&app, Method::PUT, "/contacts/put?name=Geoff&phone=222", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let geoff = store.find_by_id(geoff.id).await.unwrap().unwrap();
        assert_eq!(geoff.phone_number.as_deref(), Some("222"));
        assert_eq!(geoff.last_name, None);
    }

    #[tokio::test]
    async fn test_query_update_unknown_contact_is_not_found() {
        let (app, _) = test_app();

        let response = send(&app, Method::PUT, "/contacts/put?name=Ghost&phone=1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::PUT, "/contacts/put?phone=1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_create_requires_name() {
        let (app, _) = test_app();

        let response = send(&app, Method::POST, "/contacts/post?lname=Choy", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters_by_first_and_last_name() {
        let (app, _) = test_app();
        send(&app, Method::POST, "/contacts/post?name=Sam&lname=One", None).await;
        send(&app, Method::POST, "/contacts/post?name=Sam&lname=Two", None).await;
        create_geoff(&app).await;

        let all = json_body(send(&app, Method::GET, "/contacts", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let all = json_body(send(&app, Method::GET, "/contacts/all", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let filtered = json_body(
            send(&app, Method::GET, "/contacts?firstName=Sam&lastName=Two", None).await,
        )
        .await;
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["lastName"], "Two");

        // A lone firstName is not a filter
        let unfiltered =
            json_body(send(&app, Method::GET, "/contacts?firstName=Sam", None).await).await;
        assert_eq!(unfiltered.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_create_then_list() {
        let (app, _) = test_app();

        let response = send(
            &app,
            Method::POST,
            "/contacts/createbulk",
            Some(
                r#"[
                    {"firstName":"Ann","phoneNumber":"1"},
                    {"firstName":"Ben","lastName":"Bo","phoneNumber":"2"}
                ]"#,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(location(&response), format!("{BASE_URL}/contacts"));
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);

        let all = json_body(send(&app, Method::GET, "/contacts", None).await).await;
        let all = all.as_array().unwrap();
        assert!(all.iter().any(|c| c["firstName"] == "Ann" && c["phoneNumber"] == "1"));
        assert!(all.iter().any(|c| c["firstName"] == "Ben" && c["lastName"] == "Bo"));
    }

    #[tokio::test]
    async fn test_reset_deletes_all() {
        let (app, store) = test_app();
        create_geoff(&app).await;

        let response = send(&app, Method::POST, "/contacts/reset", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_create_rejects_blank_first_name() {
        let (app, store) = test_app();

        let response = send(&app, Method::POST, "/contacts", Some(r#"{"firstName":""}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/contacts/createbulk",
            Some(r#"[{"firstName":"Ann"},{"firstName":"   "}]"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // A bad entry rejects the whole batch
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_create_drops_blank_optionals() {
        let (app, store) = test_app();

        let response = send(
            &app,
            Method::POST,
            "/contacts",
            Some(r#"{"firstName":"Ann","lastName":"","phoneNumber":"555"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        send(
            &app,
            Method::POST,
            "/contacts/createbulk",
            Some(r#"[{"firstName":"Ben","phoneNumber":" "}]"#),
        )
        .await;

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].last_name, None);
        assert_eq!(all[0].phone_number.as_deref(), Some("555"));
        assert_eq!(all[1].phone_number, None);
    }

    #[tokio::test]
    async fn test_collection_accepts_trailing_slash() {
        let (app, _) = test_app();

        let response = send(
            &app,
            Method::POST,
            "/contacts/",
            Some(r#"{"firstName":"Ann"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(&app, Method::GET, "/contacts/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }
}
