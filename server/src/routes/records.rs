//! Collection and record endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Uri},
    response::Response,
    routing::get,
    Router,
};

use crate::error::Result;
use crate::handlers::{parse_body, request_context, respond, PageLink};
use crate::AppState;

type QueryPairs = Query<Vec<(String, String)>>;

/// Create collection and record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{collection}",
            get(list_records).post(create_record).delete(delete_records),
        )
        .route(
            "/{collection}/{id}",
            get(get_record)
                .put(replace_record)
                .patch(patch_record)
                .delete(delete_record),
        )
}

/// GET /{collection} - List records.
async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.list(&ctx), &link))
}

/// POST /{collection} - Create a record.
async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let payload = parse_body(&body)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.create(&ctx, payload), &link))
}

/// DELETE /{collection} - Delete matching records.
async fn delete_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.delete_all(&ctx), &link))
}

/// GET /{collection}/{id} - Fetch a record.
async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.get(&ctx, &id), &link))
}

/// PUT /{collection}/{id} - Replace or create a record.
async fn replace_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let payload = parse_body(&body)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.replace(&ctx, &id, payload), &link))
}

/// PATCH /{collection}/{id} - Update some fields of a record.
async fn patch_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let changes = parse_body(&body)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.patch(&ctx, &id, changes), &link))
}

/// DELETE /{collection}/{id} - Delete a record.
async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(query): QueryPairs,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let resource = state.resource(&collection)?;
    let ctx = request_context(query, &headers)?;
    let link = PageLink::new(&headers, &uri, &state.fallback_host());

    Ok(respond(resource.delete(&ctx, &id), &link))
}
