//! Extractors whose rejections render as error envelopes instead of axum's
//! plain-text defaults.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Response;

use crate::error::ErrorBody;

/// Drop-in for [`axum::Json`] that rejects malformed bodies with a 400 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorBody::new("Invalid request body")
                .with_detail(rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST)),
        }
    }
}

/// Drop-in for [`axum::extract::Query`] that rejects undecodable query strings
/// with a 400 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    axum::extract::Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorBody::new("Invalid query string")
                .with_detail(rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST)),
        }
    }
}

/// Drop-in for [`axum::extract::Path`].
///
/// Only 500-class rejections (a route/extractor mismatch) keep their status.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    axum::extract::Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                let status = match rejection.status() {
                    status if status.is_server_error() => status,
                    _ => StatusCode::BAD_REQUEST,
                };
                Err(ErrorBody::new("Invalid path parameter")
                    .with_detail(rejection.body_text())
                    .into_response_with(status))
            }
        }
    }
}
