//! Tag grammar for routing record fields into request parameters.
//!
//! A tag has the form `target[,bucket[,modifier...]]`:
//!
//! - `target`: the parameter name on the wire; empty means "use the field name"
//! - `bucket`: one of `header`, `query`, `path`, `form`, `body`
//! - `modifier`: `authorizationType` or `opt`
//!
//! Parsing never fails. A tag that cannot be understood yields an
//! [`ParameterBucket::Unmapped`] descriptor and the field is ignored.
//!
//! # Example
//!
//! ```
//! use courier_core::{FieldDescriptor, ParameterBucket};
//!
//! let descriptor = FieldDescriptor::parse(Some("bookingCode,query"), "booking_code");
//! assert_eq!(descriptor.target(), "bookingCode");
//! assert_eq!(descriptor.bucket(), ParameterBucket::Query);
//!
//! let descriptor = FieldDescriptor::parse(Some(",header"), "trace_id");
//! assert_eq!(descriptor.target(), "trace_id");
//!
//! let descriptor = FieldDescriptor::parse(Some("id,cookie"), "id");
//! assert_eq!(descriptor.bucket(), ParameterBucket::Unmapped);
//! ```

use std::borrow::Cow;

use derive_more::Display;

/// Destination of a field value in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParameterBucket {
    /// Request header.
    #[display("header")]
    Header,
    /// URL query parameter.
    #[display("query")]
    Query,
    /// `:name` placeholder in the URI template.
    #[display("path")]
    Path,
    /// Form field (url-encoded or multipart).
    #[display("form")]
    Form,
    /// The request body.
    #[display("body")]
    Body,
    /// Not routed anywhere.
    #[display("unmapped")]
    Unmapped,
}

impl ParameterBucket {
    /// Buckets that hold string parameters (everything except body and unmapped).
    pub const PARAMETERS: [Self; 4] = [Self::Header, Self::Query, Self::Path, Self::Form];

    /// Parse a bucket keyword (case-insensitive).
    ///
    /// Returns `None` for unknown keywords; `unmapped` is not a keyword.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "header" => Some(Self::Header),
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "form" => Some(Self::Form),
            "body" => Some(Self::Body),
            _ => None,
        }
    }

    /// Reserved target name marking a pre-grouped field for this bucket.
    #[must_use]
    pub const fn group_key(self) -> Option<&'static str> {
        match self {
            Self::Header => Some("_header_"),
            Self::Query => Some("_query_"),
            Self::Path => Some("_path_"),
            Self::Form => Some("_form_"),
            Self::Body | Self::Unmapped => None,
        }
    }

    /// Bucket owning a reserved group key.
    #[must_use]
    pub fn from_group_key(key: &str) -> Option<Self> {
        Self::PARAMETERS
            .into_iter()
            .find(|bucket| bucket.group_key() == Some(key))
    }
}

/// Extra routing behaviour attached to a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Modifier {
    /// Render the value as `Authorization: <target> <value>`.
    #[display("authorizationType")]
    AuthorizationType,
    /// Omit the parameter when its value is an empty string.
    #[display("opt")]
    Optional,
}

impl Modifier {
    /// Parse a modifier keyword (case-insensitive).
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.eq_ignore_ascii_case("authorizationType") {
            Some(Self::AuthorizationType)
        } else if keyword.eq_ignore_ascii_case("opt") {
            Some(Self::Optional)
        } else {
            None
        }
    }
}

/// Routing information derived from a field tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    target: Cow<'static, str>,
    bucket: ParameterBucket,
    modifier: Option<Modifier>,
}

impl FieldDescriptor {
    /// Create a descriptor from already-parsed parts.
    #[must_use]
    pub fn new(
        target: impl Into<Cow<'static, str>>,
        bucket: ParameterBucket,
        modifier: Option<Modifier>,
    ) -> Self {
        Self {
            target: target.into(),
            bucket,
            modifier,
        }
    }

    /// Const constructor used by `#[derive(Parameters)]`.
    #[must_use]
    pub const fn from_static(
        target: &'static str,
        bucket: ParameterBucket,
        modifier: Option<Modifier>,
    ) -> Self {
        Self {
            target: Cow::Borrowed(target),
            bucket,
            modifier,
        }
    }

    /// Descriptor of a field that is not routed anywhere.
    #[must_use]
    pub fn unmapped(field_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field_name, ParameterBucket::Unmapped, None)
    }

    /// Parse a field tag.
    ///
    /// `field_name` is used when the tag has no target. A missing or malformed
    /// tag yields an unmapped descriptor.
    #[must_use]
    pub fn parse(tag: Option<&str>, field_name: &str) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|tag| !tag.is_empty()) else {
            return Self::unmapped(field_name.to_string());
        };

        let mut segments = tag.split(',').map(str::trim);
        let target = match segments.next() {
            Some(target) if !target.is_empty() => target,
            _ => field_name,
        };
        let target = target.to_string();

        if let Some(bucket) = ParameterBucket::from_group_key(&target) {
            return Self::new(target, bucket, None);
        }

        let Some(keyword) = segments.next() else {
            return Self::unmapped(target);
        };

        let modifier = segments.next().and_then(Modifier::parse);
        // target[,bucket[,modifier]]
        if segments.next().is_some() {
            return Self::unmapped(target);
        }
        match (ParameterBucket::parse(keyword), Modifier::parse(keyword)) {
            // the authorization modifier always lands in the header bucket
            (Some(_), _) if modifier == Some(Modifier::AuthorizationType) => {
                Self::new(target, ParameterBucket::Header, modifier)
            }
            (Some(bucket), _) => Self::new(target, bucket, modifier),
            // `name,authorizationType` shorthand
            (None, Some(Modifier::AuthorizationType)) => Self::new(
                target,
                ParameterBucket::Header,
                Some(Modifier::AuthorizationType),
            ),
            (None, _) => Self::unmapped(target),
        }
    }

    /// Parameter name on the wire.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Destination bucket.
    #[must_use]
    pub const fn bucket(&self) -> ParameterBucket {
        self.bucket
    }

    /// Optional modifier.
    #[must_use]
    pub const fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    /// Whether this field carries a whole pre-grouped bucket.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.bucket.group_key() == Some(self.target())
    }

    /// Whether empty values are omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.modifier == Some(Modifier::Optional)
    }

    /// Whether the value is rendered into the `Authorization` header.
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        self.modifier == Some(Modifier::AuthorizationType)
    }
}
