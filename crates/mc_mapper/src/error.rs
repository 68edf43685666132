use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::value::Value;

// -----------------------------------------------------------------------------
// ErrorPath

/// One step from a parent value into a child value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a failure inside the encoded value, rendered as `$.pets[0].name`.
///
/// Segments are stored innermost first because they are pushed while the
/// error unwinds out of nested decode and encode calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPath(Vec<PathSegment>);

impl ErrorPath {
    #[inline]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments from the root downwards.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &PathSegment> {
        self.0.iter().rev()
    }

    fn push_parent(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// MapError

/// Errors reported by decode, encode and registration.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: ErrorPath,
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },
    #[error("unknown type `{type_name}` at {path}")]
    UnknownType { path: ErrorPath, type_name: String },
    #[error("unknown discriminator at {path}: `{key}` = {value:?}")]
    UnknownDiscriminator {
        path: ErrorPath,
        key: String,
        value: Option<Value>,
    },
    #[error("missing field `{field}` at {path}")]
    MissingField { path: ErrorPath, field: String },
    #[error(
        "ambiguous registration in family `{family}`: {value} claimed by `{first}` and `{second}`"
    )]
    AmbiguousRegistration {
        family: &'static str,
        value: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("hook failed at {path}: {message}")]
    Hook { path: ErrorPath, message: String },
    #[error("text form: {0}")]
    Text(String),
}

/// Result alias used across the crate.
pub type MapResult<T> = Result<T, MapError>;

impl MapError {
    pub fn mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::TypeMismatch {
            path: ErrorPath::root(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            path: ErrorPath::root(),
            type_name: type_name.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            path: ErrorPath::root(),
            field: field.into(),
        }
    }

    /// A failure raised from inside a hook stage.
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook {
            path: ErrorPath::root(),
            message: message.into(),
        }
    }

    /// Prefixes the error path with a mapping key.
    pub fn at_key(self, key: &str) -> Self {
        self.with_parent(PathSegment::Key(key.into()))
    }

    /// Prefixes the error path with a sequence index.
    pub fn at_index(self, index: usize) -> Self {
        self.with_parent(PathSegment::Index(index))
    }

    /// The path of the failure, `None` for errors that are not tied to a value.
    pub fn path(&self) -> Option<&ErrorPath> {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::UnknownType { path, .. }
            | Self::UnknownDiscriminator { path, .. }
            | Self::MissingField { path, .. }
            | Self::Hook { path, .. } => Some(path),
            Self::AmbiguousRegistration { .. } | Self::Text(_) => None,
        }
    }

    fn with_parent(mut self, segment: PathSegment) -> Self {
        match &mut self {
            Self::TypeMismatch { path, .. }
            | Self::UnknownType { path, .. }
            | Self::UnknownDiscriminator { path, .. }
            | Self::MissingField { path, .. }
            | Self::Hook { path, .. } => path.push_parent(segment),
            Self::AmbiguousRegistration { .. } | Self::Text(_) => {}
        }
        self
    }
}

// -----------------------------------------------------------------------------
// Tests
