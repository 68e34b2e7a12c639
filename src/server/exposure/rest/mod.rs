//! REST API exposure
//!
//! Routes:
//! - `GET /`, `GET /help`: endpoint catalog, no authentication
//! - `GET|POST|DELETE /{endpoint}`: list, upsert and delete objects
//! - `POST /control?action=verify|restart`: control actions
//!
//! Everything except help sits behind HTTP Basic authentication, including
//! requests with an unsupported method.

pub mod auth;
pub mod handlers;
pub mod help;

use crate::core::error::ApiError;
use crate::server::host::ApiContext;
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from the context
    pub fn build_router(context: ApiContext) -> Router {
        let protected = Router::new()
            .route("/control", post(handlers::control))
            .route(
                "/{endpoint}",
                get(handlers::list_objects)
                    .post(handlers::store_objects)
                    .delete(handlers::delete_objects),
            )
            .layer(middleware::from_fn_with_state(
                context.clone(),
                auth::require_basic_auth,
            ));

        let mut app = Self::help_routes()
            .merge(protected)
            .fallback(handlers::not_found)
            .with_state(context.clone())
            .layer(CatchPanicLayer::custom(Self::handle_panic))
            .layer(TraceLayer::new_for_http());

        if let Some(cors) = Self::cors_layer(&context.config.cors_origins) {
            app = app.layer(cors);
        }

        app
    }

    fn help_routes() -> Router<ApiContext> {
        Router::new()
            .route("/", get(help::help))
            .route("/help", get(help::help))
    }

    /// Allow browser clients from the configured origins
    fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            return None;
        }

        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        )
    }

    fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
        let detail = panic
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown panic".to_string());

        ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
    }
}
