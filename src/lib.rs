#![deny(missing_docs)]

//! # Omittable
//!
//! Tri-state request parameters, JSON fields and OpenAPI schemas: a value is
//! absent, explicitly null, or present.
//!
//! PATCH-style APIs need to tell "the caller said nothing" apart from "the
//! caller explicitly cleared this". [`Omittable`] carries that distinction
//! through three boundaries with one rule each:
//!
//! * request parameters: a missing parameter is `Absent`, a bare or empty
//!   one (`?name`, `?name=`) is `Present(None)`, text is converted into
//!   `Present(Some(value))`,
//! * JSON fields: an omitted key is `Absent`, `null` is `Present(None)`, a
//!   value is `Present(Some(value))`,
//! * OpenAPI documents: an omittable declaration reads as its inner type's
//!   schema with `required: false`.
//!
//! ```
//! use omittable::Omittable;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct PersonPatch {
//!     #[serde(default, skip_serializing_if = "Omittable::is_absent")]
//!     nickname: Omittable<Option<String>>,
//! }
//!
//! let clear: PersonPatch = serde_json::from_str(r#"{"nickname":null}"#)?;
//! assert_eq!(clear.nickname, Omittable::Present(None));
//!
//! let untouched: PersonPatch = serde_json::from_str("{}")?;
//! assert!(untouched.nickname.is_absent());
//! # Ok::<(), serde_json::Error>(())
//! ```

/// Shared error types.
pub mod error;

/// The tri-state container.
pub mod omittable;

/// Typed conversion of supplied parameter text.
pub mod convert;

/// Parameter sources and the resolution rules.
pub mod resolver;

/// Serde implementations and the JSON field contract.
pub mod codec;

/// actix-web request extractors.
#[cfg(feature = "actix")]
pub mod actix;

/// OpenAPI schema annotation.
#[cfg(feature = "openapi")]
pub mod schema;

pub use convert::convert;
pub use error::{ConversionError, ConversionResult};
pub use omittable::Omittable;
pub use resolver::{resolve_parameter, ParameterMap, ParameterSource};

#[cfg(feature = "actix")]
pub use actix::{FormParameters, QueryParameters};
#[cfg(feature = "openapi")]
pub use schema::SchemaRegistry;
