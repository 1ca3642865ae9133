#![deny(missing_docs)]

//! # Tri-State Container
//!
//! [`Omittable<T>`] distinguishes "no value supplied" from "a value was
//! supplied". Layered over [`Option`] for the inner type, this yields the
//! three states PATCH-style APIs need: `Absent`, `Present(None)` and
//! `Present(Some(v))`.

/// A value that is either absent or present.
///
/// `Omittable<Option<U>>` is the full tri-state form: `Absent` means the
/// caller supplied nothing, `Present(None)` means the caller explicitly
/// supplied "no value", and `Present(Some(v))` carries content. Because the
/// explicit-null state only exists through the inner [`Option`], it is
/// representable exactly when the declaration says the value is nullable.
///
/// The container is an immutable plain value: equality and hashing are
/// structural, and the derived [`Debug`] rendering produces three
/// distinguishable forms (`Absent`, `Present(None)`, `Present(Some(v))`)
/// embedding the inner value's own rendering.
///
/// When used as a JSON object field, annotate it so the key disappears
/// entirely for `Absent` (see [`crate::codec`]):
///
/// ```text
/// #[serde(default, skip_serializing_if = "Omittable::is_absent")]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Omittable<T> {
    /// No information was supplied.
    Absent,
    /// Information was supplied; with `T = Option<U>`, `Present(None)` is the
    /// explicit null.
    Present(T),
}

impl<T> Omittable<T> {
    /// Constructs the absent state.
    pub const fn absent() -> Self {
        Self::Absent
    }

    /// Constructs the present state around `value`.
    ///
    /// With `T = Option<U>`, `of(None)` constructs the explicit-null state.
    pub const fn of(value: T) -> Self {
        Self::Present(value)
    }

    /// Returns `true` if a value was supplied, including an explicit null.
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns `true` if no value was supplied.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Converts from `&Omittable<T>` to `Omittable<&T>`.
    pub const fn as_ref(&self) -> Omittable<&T> {
        match self {
            Self::Present(value) => Omittable::Present(value),
            Self::Absent => Omittable::Absent,
        }
    }

    /// Converts from `&mut Omittable<T>` to `Omittable<&mut T>`.
    pub fn as_mut(&mut self) -> Omittable<&mut T> {
        match self {
            Self::Present(value) => Omittable::Present(value),
            Self::Absent => Omittable::Absent,
        }
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics with "no value present" when the container is `Absent`. Calling
    /// this on a container whose state has not been checked is a programming
    /// error, not a recoverable condition.
    pub fn unwrap(self) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => panic!("no value present"),
        }
    }

    /// Returns the contained value, panicking with `msg` when `Absent`.
    pub fn expect(self, msg: &str) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => panic!("{}", msg),
        }
    }

    /// Returns the contained value if present (including a contained `None`),
    /// else `default`.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => default,
        }
    }

    /// Returns the contained value if present, else computes it from `f`.
    pub fn unwrap_or_else<F: FnOnce() -> T>(self, f: F) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => f(),
        }
    }

    /// Maps the contained value, leaving `Absent` untouched.
    ///
    /// `f` is invoked whenever a value was supplied. With `T = Option<U>`
    /// that includes the explicit-null state: `f` receives `None` and its
    /// argument type makes the null-awareness explicit.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Omittable<U> {
        match self {
            Self::Present(value) => Omittable::Present(f(value)),
            Self::Absent => Omittable::Absent,
        }
    }

    /// Invokes `f` with a reference to the contained value exactly once when
    /// present; does nothing when `Absent`.
    pub fn if_present<F: FnOnce(&T)>(&self, f: F) {
        if let Self::Present(value) = self {
            f(value);
        }
    }

    /// Collapses the container into an [`Option`], mapping `Absent` to
    /// `None`. The supplied/not-supplied distinction is lost.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Builds a container from an [`Option`], mapping `None` to `Absent`.
    ///
    /// Note that this is not the explicit-null state; use
    /// `Omittable::of(None)` on a nullable inner type for that.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

// Absent regardless of whether T itself has a default.
impl<T> Default for Omittable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Omittable<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}
