//! Request extraction: conditional headers, query pairs and JSON envelopes.

use crate::error::Result;
use axum::http::{header::HOST, HeaderMap, Uri};
use serde::Deserialize;
use serde_json::Value;
use shelf_engine::{
    Preconditions, Record, RequestContext, ValidationError, IF_MODIFIED_SINCE, IF_UNMODIFIED_SINCE,
};

/// Request body envelope, `{"data": {...}}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
}

/// Build the engine context from query pairs and request headers.
pub fn request_context(query: Vec<(String, String)>, headers: &HeaderMap) -> Result<RequestContext> {
    let preconditions = Preconditions::from_headers(
        header_str(headers, IF_MODIFIED_SINCE)?,
        header_str(headers, IF_UNMODIFIED_SINCE)?,
    )?;

    Ok(RequestContext::new()
        .with_query(query)
        .with_preconditions(preconditions))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>> {
    match headers.get(name) {
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ValidationError::header(name, "Header value is not valid text").into()),
        None => Ok(None),
    }
}

/// Parse a request body into the record held under `data`.
///
/// An empty body, or one without `data`, yields an empty record and leaves
/// required field checks to validation.
pub fn parse_body(body: &[u8]) -> Result<Record> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Record::new());
    }

    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| ValidationError::body("body", format!("Invalid JSON: {}", e)))?;

    match envelope.data {
        None | Some(Value::Null) => Ok(Record::new()),
        Some(data) => Record::from_value(data)
            .map_err(|_| ValidationError::body("data", "data should be an object").into()),
    }
}

/// Builds absolute links to following pages.
#[derive(Debug, Clone)]
pub struct PageLink {
    base: String,
}

impl PageLink {
    /// Base URL taken from the `Host` header and the request path.
    pub fn new(headers: &HeaderMap, uri: &Uri, fallback_host: &str) -> Self {
        let host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(fallback_host);

        Self {
            base: format!("http://{}{}", host, uri.path()),
        }
    }

    /// URL with the given query parameters, encoded.
    pub fn url(&self, params: &[(String, String)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            self.base.clone()
        } else {
            format!("{}?{}", self.base, query)
        }
    }
}
