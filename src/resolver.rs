#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! One state machine decides which of the three container states a request
//! parameter is in. [`ParameterSource`] abstracts where parameters come
//! from, so the same decision applies to query strings, form bodies and any
//! custom carrier; [`ParameterMap`] is the url-encoded implementation the
//! built-in extractors share.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::convert::convert;
use crate::error::ConversionResult;
use crate::omittable::Omittable;

/// A read-only view of named request parameters.
///
/// Presence and value are separate questions so that carriers which can hold
/// a parameter without any text (a bare `?flag`, a valueless form field) are
/// representable. Implementations answer both from the same underlying
/// request snapshot.
pub trait ParameterSource {
    /// Returns `true` if the request supplied `name` at all, with or without
    /// a value.
    fn has_parameter(&self, name: &str) -> bool;

    /// The first supplied text for `name`, if any.
    ///
    /// `None` is only meaningful together with [`has_parameter`]: a source
    /// may report a parameter as supplied while having no text for it.
    ///
    /// [`has_parameter`]: ParameterSource::has_parameter
    fn raw_value(&self, name: &str) -> Option<&str>;
}

/// Resolves `name` from `source` into the tri-state container.
///
/// The decision is:
///
/// * not supplied at all: `Absent`,
/// * supplied without text, or with empty text (`?name` and `?name=` are
///   equivalent): `Present(None)`,
/// * supplied with text: parsed as `T`, yielding `Present(Some(value))` or a
///   [`ConversionError`](crate::error::ConversionError).
///
/// Only the last arm can fail; absence never produces an error.
pub fn resolve_parameter<T, S>(source: &S, name: &str) -> ConversionResult<Omittable<Option<T>>>
where
    S: ParameterSource + ?Sized,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if !source.has_parameter(name) {
        return Ok(Omittable::Absent);
    }
    match source.raw_value(name) {
        None | Some("") => Ok(Omittable::Present(None)),
        Some(text) => convert(name, text).map(|value| Omittable::Present(Some(value))),
    }
}

/// An insertion-ordered multimap of url-encoded request parameters.
///
/// Built by parsing `application/x-www-form-urlencoded` text (a query string
/// or a form body). Repeated names keep every value in supplied order, while
/// resolution reads the first occurrence. Percent-escapes and `+` are
/// decoded during parsing, so stored text is the supplied text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: IndexMap<String, Vec<String>>,
}

impl ParameterMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses url-encoded text, without a leading `?`.
    ///
    /// A bare `name` and a `name=` pair both record an empty value, which
    /// resolution treats as the explicit-null marker.
    pub fn parse(input: &str) -> Self {
        Self::parse_bytes(input.as_bytes())
    }

    /// Parses url-encoded bytes, as read from a form body.
    pub fn parse_bytes(input: &[u8]) -> Self {
        let mut map = Self::new();
        map.append_bytes(input);
        map
    }

    /// Parses url-encoded bytes and appends every pair to this map.
    ///
    /// Lets a query string and a form body share one map; values already
    /// recorded keep their precedence.
    pub fn append_bytes(&mut self, input: &[u8]) {
        for (name, value) in url::form_urlencoded::parse(input) {
            self.insert(name.into_owned(), value.into_owned());
        }
    }

    /// Appends a value for `name`, after any already recorded.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(name.into()).or_default().push(value.into());
    }

    /// Resolves `name` into a typed tri-state container.
    ///
    /// See [`resolve_parameter`] for the decision rules.
    pub fn resolve<T>(&self, name: &str) -> ConversionResult<Omittable<Option<T>>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        resolve_parameter(self, name)
    }

    /// Resolves `name` without conversion, borrowing the supplied text.
    ///
    /// Same decision rules as [`resolve_parameter`], minus the parse step
    /// that could fail.
    pub fn text(&self, name: &str) -> Omittable<Option<&str>> {
        if !self.has_parameter(name) {
            return Omittable::Absent;
        }
        match self.raw_value(name) {
            None | Some("") => Omittable::Present(None),
            Some(text) => Omittable::Present(Some(text)),
        }
    }

    /// Every value supplied for `name`, in order; empty if not supplied.
    pub fn all(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parameter names in first-supplied order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParameterSource for ParameterMap {
    fn has_parameter(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn raw_value(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
