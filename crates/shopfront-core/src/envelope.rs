//! Uniform JSON response envelope.
//!
//! Every successful response has the shape
//! `{ success: true, data?, message, pagination? }`. Error bodies are rendered
//! by [`crate::error`] with `success: false`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shopfront_domain::pagination::PageInfo;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: PageInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl Envelope<()> {
    /// A success body carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            pagination: None,
        }
    }
}

/// Renders with status 200; wrap in `(StatusCode::CREATED, envelope)` for 201.
impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
