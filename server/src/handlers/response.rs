//! Mapping of engine outcomes onto HTTP responses.

use super::PageLink;
use crate::error::{error_response, AppError};
use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use shelf_engine::{Outcome, ResponseMeta, Timestamp};

/// Header carrying the record or collection timestamp.
pub const LAST_MODIFIED: HeaderName = HeaderName::from_static("last-modified");
/// Header carrying the number of records matching a list request.
pub const TOTAL_RECORDS: HeaderName = HeaderName::from_static("total-records");
/// Header carrying the absolute URL of the following page.
pub const NEXT_PAGE: HeaderName = HeaderName::from_static("next-page");

/// Success body envelope.
#[derive(Serialize)]
struct DataResponse<T> {
    data: T,
}

/// Turn an operation outcome into a response.
pub fn respond<T: Serialize>(outcome: Outcome<T>, link: &PageLink) -> Response {
    match outcome {
        Outcome::Ok { body, meta } => success(StatusCode::OK, body, &meta, link),
        Outcome::Created { body, meta } => success(StatusCode::CREATED, body, &meta, link),
        Outcome::NotModified { last_modified } => {
            let mut response = StatusCode::NOT_MODIFIED.into_response();
            set_last_modified(response.headers_mut(), last_modified);
            response
        }
        Outcome::Invalid(errors) => AppError::Invalid(errors).into_response(),
        Outcome::NotFound { record_id } => error_response(
            StatusCode::NOT_FOUND,
            "The resource you are looking for could not be found.".to_string(),
            Some(json!({ "id": record_id })),
        ),
        Outcome::Conflict(conflict) => {
            tracing::debug!("{}", conflict);
            error_response(
                StatusCode::CONFLICT,
                conflict.message(),
                serde_json::to_value(&conflict).ok(),
            )
        }
        Outcome::PreconditionFailed {
            last_modified,
            message,
        } => {
            let mut response = error_response(StatusCode::PRECONDITION_FAILED, message, None);
            set_last_modified(response.headers_mut(), last_modified);
            response
        }
        Outcome::MethodNotAllowed => error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed on this endpoint.".to_string(),
            None,
        ),
        Outcome::BackendFailure(msg) => {
            tracing::error!("Backend failure: {}", msg);
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable due to high load.".to_string(),
                None,
            )
        }
    }
}

fn success<T: Serialize>(status: StatusCode, body: T, meta: &ResponseMeta, link: &PageLink) -> Response {
    let mut response = (status, Json(DataResponse { data: body })).into_response();
    let headers = response.headers_mut();

    if let Some(timestamp) = meta.last_modified {
        set_last_modified(headers, timestamp);
    }
    if let Some(total) = meta.total_records {
        headers.insert(TOTAL_RECORDS, HeaderValue::from(total));
    }
    if let Some(next) = &meta.next_page {
        match HeaderValue::from_str(&link.url(next.params())) {
            Ok(value) => {
                headers.insert(NEXT_PAGE, value);
            }
            Err(e) => tracing::warn!("Dropping unrepresentable Next-Page link: {}", e),
        }
    }

    response
}

fn set_last_modified(headers: &mut HeaderMap, timestamp: Timestamp) {
    headers.insert(LAST_MODIFIED, HeaderValue::from(timestamp));
}
