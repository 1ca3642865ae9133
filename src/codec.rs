#![deny(missing_docs)]

//! # JSON Field Rules
//!
//! Serde implementations giving [`Omittable`] fields the wire contract
//! PATCH-style payloads need: an omitted key is `Absent`, an explicit `null`
//! is `Present(None)` and a value is `Present(Some(v))`.
//!
//! The container itself cannot encode absence (there is no JSON value for
//! "leave the key out"), so fields carry the contract on the declaration:
//!
//! ```text
//! #[serde(default, skip_serializing_if = "Omittable::is_absent")]
//! ```
//!
//! `default` turns a missing key into `Absent` on decode and
//! `skip_serializing_if` drops the key for `Absent` on encode. Serializing
//! an `Absent` container anywhere else, for example as a top-level payload,
//! fails with an error naming the missing annotation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::omittable::Omittable;

impl<T: Serialize> Serialize for Omittable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Omittable::Present(value) => value.serialize(serializer),
            Omittable::Absent => Err(serde::ser::Error::custom(
                "Omittable::Absent has no serialized form; annotate the field with \
                 #[serde(default, skip_serializing_if = \"Omittable::is_absent\")]",
            )),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Omittable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Omittable::Present)
    }
}
