//! OpenAPI schema wrappers for domain types.
//!
//! Domain types stay free of `utoipa` derives; these mirrors describe their
//! JSON shape for the generated document.

use serde::Serialize;
use utoipa::ToSchema;

/// Movie as returned by every movie endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = crate::domain::Movie)]
pub struct MovieSchema {
    /// Storage-assigned identifier.
    #[schema(example = 1, minimum = 1)]
    id: u64,
    #[schema(example = "Casablanca", max_length = 500)]
    title: String,
    #[schema(example = 1942, minimum = 1888)]
    year: i32,
    #[schema(example = 102, minimum = 1)]
    runtime_minutes: i32,
    /// One to five distinct genres, in client order.
    #[schema(example = json!(["drama", "romance", "war"]))]
    genres: Vec<String>,
    /// Starts at 1 and increases by one per update.
    #[schema(example = 1, minimum = 1)]
    version: u32,
}

/// Error envelope.
///
/// `error` is a field-to-message object for validation failures and a
/// string otherwise.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(value_type = Object, example = json!({ "title": "must be provided" }))]
    error: serde_json::Value,
}
