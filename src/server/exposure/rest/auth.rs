//! HTTP Basic authentication middleware

use crate::core::auth::Credentials;
use crate::core::error::ApiError;
use crate::server::host::ApiContext;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decode `Authorization: Basic <base64(user:password)>`
///
/// Returns `None` for a missing header, another scheme or undecodable
/// content.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Reject requests without valid credentials
///
/// The authenticated [`Principal`](crate::core::auth::Principal) is stored
/// in the request extensions for the handlers.
pub async fn require_basic_auth(
    State(context): State<ApiContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = basic_credentials(request.headers());
    let principal = context.auth.check(credentials.as_ref()).await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
