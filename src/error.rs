//! # Error Handling
//!
//! Provides the [`ConversionError`] reported when a supplied request
//! parameter cannot be converted into its declared target type.

use derive_more::Display;

/// A request parameter was supplied but its text does not parse into the
/// declared target type.
///
/// Carries the parameter name, the offending raw text and a description of
/// the target type, so the rendered message identifies the rejected input
/// without consulting logs. The underlying parse failure is preserved as the
/// error source.
///
/// Note: only supplied values can fail conversion. An absent parameter
/// resolves to the absent state and never produces this error.
#[derive(Debug, Display)]
#[display("cannot convert parameter '{parameter}': '{raw_value}' is not a valid {target_type}")]
pub struct ConversionError {
    parameter: String,
    raw_value: String,
    target_type: &'static str,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ConversionError {
    /// Builds a conversion error for `parameter` whose supplied text
    /// `raw_value` failed to parse as `target_type`.
    pub fn new<E>(
        parameter: impl Into<String>,
        raw_value: impl Into<String>,
        target_type: &'static str,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConversionError {
            parameter: parameter.into(),
            raw_value: raw_value.into(),
            target_type,
            source: Box::new(source),
        }
    }

    /// The name of the parameter that failed to convert.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The raw text that was supplied for the parameter.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// A description of the type the text was expected to parse into.
    pub fn target_type(&self) -> &str {
        self.target_type
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Helper type alias for Result using ConversionError.
pub type ConversionResult<T> = Result<T, ConversionError>;
