use alloc::borrow::Cow;

// -----------------------------------------------------------------------------
// TypeMarkerPolicy

/// When encoding writes the runtime-type marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeMarkerPolicy {
    /// Only when the runtime type differs from the statically known type,
    /// e.g. a `Person` stored in a `Dynamic` field. Family members are
    /// recognised by their discriminator and do not need one.
    #[default]
    Auto,
    /// Also on every class, even where the type is statically known.
    Always,
    /// Never. Values behind `Dynamic` then decode untyped.
    Never,
}

// -----------------------------------------------------------------------------
// MapperOptions

/// Settings shared by every conversion of one [`Mapper`](crate::Mapper).
///
/// # Examples
///
/// ```
/// use mc_mapper::{MapperOptions, TypeMarkerPolicy};
///
/// let options = MapperOptions::new()
///     .with_discriminator_key("kind")
///     .with_type_marker(TypeMarkerPolicy::Never);
///
/// assert_eq!(options.discriminator_key(), "kind");
/// assert_eq!(options.type_marker_key(), "__type");
/// assert!(options.encode_null_discriminator());
/// ```
#[derive(Debug, Clone)]
pub struct MapperOptions {
    discriminator_key: Cow<'static, str>,
    type_marker_key: Cow<'static, str>,
    encode_null_discriminator: bool,
    type_marker: TypeMarkerPolicy,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperOptions {
    /// Discriminator key `"type"`, type marker key `"__type"`, null
    /// discriminators written and [`TypeMarkerPolicy::Auto`].
    pub const fn new() -> Self {
        Self {
            discriminator_key: Cow::Borrowed("type"),
            type_marker_key: Cow::Borrowed("__type"),
            encode_null_discriminator: true,
            type_marker: TypeMarkerPolicy::Auto,
        }
    }

    /// Discriminator key for families that do not set their own.
    pub fn with_discriminator_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.discriminator_key = key.into();
        self
    }

    pub fn with_type_marker_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.type_marker_key = key.into();
        self
    }

    /// Whether a subtype selected by the null sentinel encodes `{key: null}`
    /// or leaves the key out.
    pub fn with_encode_null_discriminator(mut self, encode: bool) -> Self {
        self.encode_null_discriminator = encode;
        self
    }

    pub fn with_type_marker(mut self, policy: TypeMarkerPolicy) -> Self {
        self.type_marker = policy;
        self
    }

    #[inline]
    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    #[inline]
    pub fn type_marker_key(&self) -> &str {
        &self.type_marker_key
    }

    #[inline]
    pub fn encode_null_discriminator(&self) -> bool {
        self.encode_null_discriminator
    }

    #[inline]
    pub fn type_marker(&self) -> TypeMarkerPolicy {
        self.type_marker
    }
}
