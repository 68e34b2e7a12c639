//! Request handlers of the object endpoints and `/control`

use crate::control::{ControlAction, ControlResponse};
use crate::core::AUDIT_TARGET;
use crate::core::auth::Principal;
use crate::core::error::{ApiError, ApiResult};
use crate::core::outcome::{BatchResponse, OperationOutcome};
use crate::core::query::translate;
use crate::core::store::ObjectRecord;
use crate::core::validation::filters::object_record;
use crate::server::host::ApiContext;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, Query, State};
use axum::http::Uri;
use serde_json::Value;

pub const NO_JSON_MESSAGE: &str =
    "no json received. you need to set your content-type to application/json.";

/// Query arguments in request order, repeated keys kept
pub type QueryPairs = Vec<(String, String)>;

fn as_filters(pairs: &QueryPairs) -> impl Iterator<Item = (&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Split a request body into records
///
/// The body is one JSON object or an array of them. An empty body, `null`,
/// `[]` and `{}` all count as no JSON. An element that is not a valid record
/// only fails its own outcome.
pub fn parse_records(body: &[u8]) -> ApiResult<Vec<Result<ObjectRecord, String>>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request(NO_JSON_MESSAGE));
    }

    let value: Value = serde_json::from_slice(body)?;
    match value {
        Value::Null => Err(ApiError::bad_request(NO_JSON_MESSAGE)),
        Value::Array(items) if items.is_empty() => Err(ApiError::bad_request(NO_JSON_MESSAGE)),
        Value::Object(map) if map.is_empty() => Err(ApiError::bad_request(NO_JSON_MESSAGE)),
        Value::Array(items) => Ok(items.iter().map(object_record).collect()),
        Value::Object(_) => Ok(vec![object_record(&value)]),
        _ => Err(ApiError::bad_request(
            "expected a JSON object or an array of JSON objects",
        )),
    }
}

/// `GET /{endpoint}`
pub async fn list_objects(
    State(context): State<ApiContext>,
    Path(endpoint): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> ApiResult<Json<Vec<ObjectRecord>>> {
    let handle = context.registry.handle(&endpoint)?;
    context
        .validator
        .validate_filters(handle.definition(), as_filters(&pairs))?;

    let objects = handle.list(&translate(pairs)).await?;
    tracing::debug!(endpoint = %endpoint, count = objects.len(), "listed objects");
    Ok(Json(objects))
}

/// `POST /{endpoint}`
pub async fn store_objects(
    State(context): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    Path(endpoint): Path<String>,
    body: Bytes,
) -> ApiResult<Json<BatchResponse>> {
    let handle = context.registry.handle(&endpoint)?;
    let records = parse_records(&body)?;

    let mut outcomes = Vec::with_capacity(records.len());
    for record in records {
        let outcome = match record {
            Ok(record) => handle.upsert(&context.validator, &record).await,
            Err(message) => OperationOutcome::bad_request(message),
        };

        if outcome.is_success() {
            tracing::info!(%principal, "{}", outcome.message);
        } else {
            tracing::debug!(%principal, code = outcome.code, "{}", outcome.message);
        }
        outcomes.push(outcome);
    }

    let response = BatchResponse::from(outcomes);
    tracing::warn!(
        target: AUDIT_TARGET,
        %principal,
        "{} stored {} {} objects (out of {} requested)",
        principal,
        response.summary.succeeded,
        endpoint,
        response.summary.total
    );
    Ok(Json(response))
}

/// `DELETE /{endpoint}`
pub async fn delete_objects(
    State(context): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    Path(endpoint): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> ApiResult<Json<BatchResponse>> {
    let handle = context.registry.handle(&endpoint)?;
    context
        .validator
        .validate_filters(handle.definition(), as_filters(&pairs))?;

    let outcomes = handle.delete_matching(&translate(pairs)).await?;
    for outcome in &outcomes {
        tracing::info!(%principal, code = outcome.code, "{}", outcome.message);
    }

    let response = BatchResponse::from(outcomes);
    tracing::warn!(
        target: AUDIT_TARGET,
        %principal,
        "{} deleted {} {} objects (out of {} requested)",
        principal,
        response.summary.succeeded,
        endpoint,
        response.summary.total
    );
    Ok(Json(response))
}

/// `POST /control?action=verify|restart`
pub async fn control(
    State(context): State<ApiContext>,
    Extension(principal): Extension<Principal>,
    Query(pairs): Query<QueryPairs>,
) -> ApiResult<Json<ControlResponse>> {
    let action = ControlAction::from_query(&pairs)?;
    let response = context.control.dispatch(action, &principal).await?;
    Ok(Json(response))
}

/// Fallback for paths that match no route
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::UnknownEndpoint {
        endpoint: uri.path().trim_start_matches('/').to_string(),
    }
}
