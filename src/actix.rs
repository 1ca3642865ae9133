#![deny(missing_docs)]

//! # Actix Extractors
//!
//! Request-parameter carriers for actix-web handlers. [`QueryParameters`]
//! reads only the query string and completes synchronously;
//! [`FormParameters`] additionally awaits an url-encoded request body and
//! merges it behind the query string. Both expose the resolution API of
//! [`ParameterMap`], so a handler asks for the tri-state container by name:
//!
//! ```
//! use omittable::actix::QueryParameters;
//! use omittable::Omittable;
//!
//! async fn greet(params: QueryParameters) -> actix_web::Result<String> {
//!     Ok(match params.resolve::<String>("name")? {
//!         Omittable::Absent => String::from("Hello, stranger!"),
//!         Omittable::Present(None) => String::from("Hello, anonymous!"),
//!         Omittable::Present(Some(name)) => format!("Hello, {name}!"),
//!     })
//! }
//! ```
//!
//! A failed conversion bubbles out of the handler through `?` and renders as
//! a `400 Bad Request` naming the parameter and the rejected text.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::error::ConversionError;
use crate::resolver::ParameterMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query-string parameters, extracted without touching the request body.
///
/// Extraction never fails and never suspends; conversion happens later,
/// when the handler resolves individual parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters(ParameterMap);

impl QueryParameters {
    /// Unwraps the underlying parameter map.
    pub fn into_inner(self) -> ParameterMap {
        self.0
    }
}

impl Deref for QueryParameters {
    type Target = ParameterMap;

    fn deref(&self) -> &ParameterMap {
        &self.0
    }
}

impl FromRequest for QueryParameters {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(QueryParameters(ParameterMap::parse(req.query_string()))))
    }
}

/// Query-string and form-body parameters, extracted in one map.
///
/// The body is awaited only when the request declares
/// `application/x-www-form-urlencoded`; any other body is left unread and
/// the map holds just the query string. Query pairs are recorded before body
/// pairs, so when both supply the same name the query value resolves first.
///
/// Body reading goes through [`web::Bytes`] and therefore honors the
/// payload limits configured on the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParameters(ParameterMap);

impl FormParameters {
    /// Unwraps the underlying parameter map.
    pub fn into_inner(self) -> ParameterMap {
        self.0
    }
}

impl Deref for FormParameters {
    type Target = ParameterMap;

    fn deref(&self) -> &ParameterMap {
        &self.0
    }
}

impl FromRequest for FormParameters {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut map = ParameterMap::parse(req.query_string());
        let form_body = req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE);
        if !form_body && !req.content_type().is_empty() {
            log::debug!(
                "leaving request body unread: content type '{}' is not '{}'",
                req.content_type(),
                FORM_CONTENT_TYPE
            );
        }
        let bytes = form_body.then(|| web::Bytes::from_request(req, payload));
        Box::pin(async move {
            if let Some(bytes) = bytes {
                map.append_bytes(&bytes.await?);
            }
            Ok(FormParameters(map))
        })
    }
}

/// A supplied parameter that does not convert is the caller's mistake.
impl ResponseError for ConversionError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
