/// Extractors whose rejections use the API error body
///
/// Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies.
/// These wrappers run the same extraction but reject with
/// [`ApiError::ValidationError`], so malformed bodies, ids and query strings
/// come back as 400s in the usual `{error, message, details}` shape before
/// any handler runs.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
