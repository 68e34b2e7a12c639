//! Endpoint catalog rendering for `GET /` and `GET /help`

use crate::core::catalog::EndpointCatalog;
use crate::server::host::ApiContext;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct EndpointHelp<'a> {
    pub key: &'a str,
    pub attributes: &'a BTreeSet<String>,
}

#[derive(Debug, Serialize)]
pub struct HelpDocument<'a> {
    pub endpoints: BTreeMap<&'a str, EndpointHelp<'a>>,
}

impl<'a> HelpDocument<'a> {
    pub fn from_catalog(catalog: &'a EndpointCatalog) -> Self {
        let endpoints = catalog
            .endpoints()
            .map(|definition| {
                (
                    definition.name.as_str(),
                    EndpointHelp {
                        key: definition.key_attribute.as_str(),
                        attributes: &definition.attributes,
                    },
                )
            })
            .collect();
        Self { endpoints }
    }
}

/// Plain text listing of every endpoint
pub fn render_text(catalog: &EndpointCatalog) -> String {
    let mut text = String::from("restlos: monitoring configuration API\n\nEndpoints:\n");
    for definition in catalog.endpoints() {
        let attributes: Vec<&str> = definition.attributes.iter().map(String::as_str).collect();
        let _ = writeln!(text, "  /{} (key: {})", definition.name, definition.key_attribute);
        let _ = writeln!(text, "      {}", attributes.join(", "));
    }
    text.push_str("\nControl:\n  POST /control?action=verify\n  POST /control?action=restart\n");
    text
}

fn wants_json(headers: &HeaderMap) -> bool {
    [header::ACCEPT, header::CONTENT_TYPE].iter().any(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"))
    })
}

/// `GET /` and `GET /help`, no authentication
pub async fn help(State(context): State<ApiContext>, headers: HeaderMap) -> Response {
    let catalog = context.registry.catalog();
    if wants_json(&headers) {
        Json(HelpDocument::from_catalog(catalog)).into_response()
    } else {
        render_text(catalog).into_response()
    }
}
