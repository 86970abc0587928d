// Contacts API module entry
// JSON CRUD over /contacts and /contacts/{id}

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::http::{self, BodyError};

pub use handlers::run_store;
pub use response::ApiError;

const COLLECTION_PATH: &str = "/contacts";
const COLLECTION_METHODS: &str = "GET, POST";
const ITEM_METHODS: &str = "GET, PUT, DELETE";
const ITEM_METHODS_NO_LOOKUP: &str = "DELETE";

/// Resolved `/contacts*` target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRoute {
    Collection,
    Item(i64),
}

impl ContactRoute {
    /// `None` for paths outside the API or ids that are not integers.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(COLLECTION_PATH)?;
        if rest.is_empty() {
            return Some(Self::Collection);
        }
        rest.strip_prefix('/')?.parse().ok().map(Self::Item)
    }
}

/// True for every path this module answers, including malformed ids.
pub fn owns_path(path: &str) -> bool {
    path == COLLECTION_PATH || path.starts_with("/contacts/")
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_contacts<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(route) = ContactRoute::parse(req.uri().path()) else {
        return http::build_error_response(hyper::StatusCode::NOT_FOUND, "Not Found");
    };

    let store = &state.store;
    let (parts, body) = req.into_parts();

    let needs_body = matches!(parts.method, Method::POST | Method::PUT);
    let body = if needs_body {
        let max = state.config.http.max_body_size;
        match http::read_body(&parts.headers, body, max).await {
            Ok(bytes) => bytes,
            Err(BodyError::TooLarge) => return ApiError::PayloadTooLarge(max).into_response(),
            Err(BodyError::Read(e)) => {
                return ApiError::BadRequest(format!("Failed to read request body: {e}"))
                    .into_response()
            }
        }
    } else {
        Bytes::new()
    };

    let result = match (route, parts.method) {
        (ContactRoute::Collection, Method::GET) => handlers::list_contacts(store).await,
        (ContactRoute::Collection, Method::POST) => handlers::create_contact(store, &body).await,
        (ContactRoute::Collection, _) => return http::build_405_response(COLLECTION_METHODS),
        (ContactRoute::Item(id), Method::DELETE) => handlers::delete_contact(store, id).await,
        (ContactRoute::Item(_), Method::GET | Method::PUT) if !store.supports_lookup() => {
            return http::build_405_response(ITEM_METHODS_NO_LOOKUP)
        }
        (ContactRoute::Item(id), Method::GET) => handlers::get_contact(store, id).await,
        (ContactRoute::Item(id), Method::PUT) => handlers::update_contact(store, id, &body).await,
        (ContactRoute::Item(_), _) => {
            let allow = if store.supports_lookup() {
                ITEM_METHODS
            } else {
                ITEM_METHODS_NO_LOOKUP
            };
            return http::build_405_response(allow);
        }
    };

    result.unwrap_or_else(ApiError::into_response)
}
