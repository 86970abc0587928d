// Contacts handlers module
// One function per (route, verb); each decodes its payload, runs one store
// operation off the async workers and serializes the result.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::response::ApiError;
use super::types::{MessageResponse, CONTACT_ADDED, CONTACT_DELETED, CONTACT_UPDATED};
use crate::http::build_json_response;
use crate::store::{ContactFields, ContactStore, CreateContact, SharedStore, StoreResult};

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

/// Run a store operation on the blocking pool.
pub async fn run_store<T, F>(store: &SharedStore, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn ContactStore) -> StoreResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

/// Decode a JSON body into a typed payload
fn parse_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Request body must be a JSON object".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid contact payload: {e}")))
}

/// GET /contacts
pub async fn list_contacts(store: &SharedStore) -> HandlerResult {
    let contacts = run_store(store, |s| s.list()).await?;
    Ok(build_json_response(StatusCode::OK, &contacts))
}

/// POST /contacts
pub async fn create_contact(store: &SharedStore, body: &[u8]) -> HandlerResult {
    let payload: CreateContact = parse_payload(body)?;
    let contact = run_store(store, move |s| s.create(payload)).await?;
    Ok(build_json_response(
        StatusCode::CREATED,
        &MessageResponse::with_contact(CONTACT_ADDED, &contact),
    ))
}

/// GET /contacts/{id}
pub async fn get_contact(store: &SharedStore, id: i64) -> HandlerResult {
    let contact = run_store(store, move |s| s.get(id)).await?;
    Ok(build_json_response(StatusCode::OK, &contact))
}

/// PUT /contacts/{id}
///
/// All three fields are required; there is no partial update.
pub async fn update_contact(store: &SharedStore, id: i64, body: &[u8]) -> HandlerResult {
    let fields: ContactFields = parse_payload(body)?;
    let contact = run_store(store, move |s| s.update(id, fields)).await?;
    Ok(build_json_response(
        StatusCode::OK,
        &MessageResponse::with_contact(CONTACT_UPDATED, &contact),
    ))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(store: &SharedStore, id: i64) -> HandlerResult {
    run_store(store, move |s| s.delete(id)).await?;
    Ok(build_json_response(
        StatusCode::OK,
        &MessageResponse::message(CONTACT_DELETED),
    ))
}
