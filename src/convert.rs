#![deny(missing_docs)]

//! # Value Conversion
//!
//! Parses supplied parameter text into a declared target type, wrapping any
//! parse failure in a [`ConversionError`] that names the parameter, the raw
//! text and the target type.

use std::str::FromStr;

use crate::error::{ConversionError, ConversionResult};

/// Parses `raw` as a `T`, attributing any failure to `parameter`.
///
/// The target-type description in the error is taken from
/// [`std::any::type_name`], so callers never have to thread a label through.
/// Only parse failures surface here; the decision whether a parameter was
/// supplied at all is made before conversion (see
/// [`resolve_parameter`](crate::resolver::resolve_parameter)).
pub fn convert<T>(parameter: &str, raw: &str) -> ConversionResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|failure| {
        ConversionError::new(parameter, raw, std::any::type_name::<T>(), failure)
    })
}
