//! Record decomposition.
//!
//! A record implementing [`Decompose`] writes its fields into a
//! [`ParameterSink`], which sorts them into the header, query, path and form
//! buckets plus an optional body. Implementations are normally generated by
//! `#[derive(Parameters)]`; [`Parameters`] is the programmatic equivalent.
//!
//! # Example
//!
//! ```
//! use courier_core::{Decompose, FieldDescriptor, ParameterSink};
//!
//! struct Lookup {
//!     code: String,
//!     trace: Option<String>,
//! }
//!
//! impl Decompose for Lookup {
//!     fn decompose_into(&self, sink: &mut ParameterSink) {
//!         sink.field(&FieldDescriptor::parse(Some("code,path"), "code"), &self.code);
//!         sink.field(&FieldDescriptor::parse(Some("X-Trace,header"), "trace"), &self.trace);
//!     }
//! }
//!
//! let parts = Lookup { code: "BK-7".into(), trace: None }.decompose();
//! assert_eq!(parts.path.get("code"), Some("BK-7"));
//! assert!(parts.header.is_empty());
//! ```

use crate::credential::{AUTHORIZATION, format_authorization};
use crate::{FieldDescriptor, ParameterBucket, ParameterSet, Payload, ToParam};

/// A record whose fields can be routed into request parameters.
pub trait Decompose {
    /// Write every routed field into `sink`.
    fn decompose_into(&self, sink: &mut ParameterSink);

    /// Decompose into the four buckets and body.
    fn decompose(&self) -> Decomposition {
        let mut sink = ParameterSink::new();
        self.decompose_into(&mut sink);
        sink.finish()
    }
}

impl<T: Decompose + ?Sized> Decompose for &T {
    fn decompose_into(&self, sink: &mut ParameterSink) {
        (**self).decompose_into(sink);
    }
}

/// Decompose a record.
pub fn decompose<T: Decompose + ?Sized>(record: &T) -> Decomposition {
    record.decompose()
}

/// Result of decomposing a record.
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    /// Header parameters.
    pub header: ParameterSet,
    /// Query parameters.
    pub query: ParameterSet,
    /// Path parameters.
    pub path: ParameterSet,
    /// Form parameters.
    pub form: ParameterSet,
    /// Body candidate.
    pub body: Option<Payload>,
}

impl Decomposition {
    /// Parameter set of a bucket; `None` for body and unmapped.
    #[must_use]
    pub fn bucket(&self, bucket: ParameterBucket) -> Option<&ParameterSet> {
        match bucket {
            ParameterBucket::Header => Some(&self.header),
            ParameterBucket::Query => Some(&self.query),
            ParameterBucket::Path => Some(&self.path),
            ParameterBucket::Form => Some(&self.form),
            ParameterBucket::Body | ParameterBucket::Unmapped => None,
        }
    }

    /// Take the parameter set of a bucket, leaving it empty.
    pub fn take(&mut self, bucket: ParameterBucket) -> ParameterSet {
        match bucket {
            ParameterBucket::Header => std::mem::take(&mut self.header),
            ParameterBucket::Query => std::mem::take(&mut self.query),
            ParameterBucket::Path => std::mem::take(&mut self.path),
            ParameterBucket::Form => std::mem::take(&mut self.form),
            ParameterBucket::Body | ParameterBucket::Unmapped => ParameterSet::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    tagged: ParameterSet,
    grouped: Option<ParameterSet>,
}

impl Bucket {
    fn finish(self) -> ParameterSet {
        self.grouped.unwrap_or(self.tagged)
    }
}

/// Accumulates routed fields during decomposition.
#[derive(Debug, Default)]
pub struct ParameterSink {
    header: Bucket,
    query: Bucket,
    path: Bucket,
    form: Bucket,
    body: Option<Payload>,
}

impl ParameterSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_mut(&mut self, bucket: ParameterBucket) -> Option<&mut Bucket> {
        match bucket {
            ParameterBucket::Header => Some(&mut self.header),
            ParameterBucket::Query => Some(&mut self.query),
            ParameterBucket::Path => Some(&mut self.path),
            ParameterBucket::Form => Some(&mut self.form),
            ParameterBucket::Body | ParameterBucket::Unmapped => None,
        }
    }

    /// Route one tagged field.
    ///
    /// Absent values are skipped, as are empty values under `opt`. Body and
    /// unmapped descriptors are ignored here; bodies go through [`Self::body`].
    pub fn field<V: ToParam + ?Sized>(&mut self, descriptor: &FieldDescriptor, value: &V) {
        let Some(value) = value.to_param() else {
            return;
        };
        if descriptor.is_optional() && value.is_empty() {
            return;
        }

        let bucket = descriptor.bucket();
        let Some(target) = self.bucket_mut(bucket) else {
            return;
        };

        if descriptor.is_authorization() {
            let value = format_authorization(descriptor.target(), &value);
            target.tagged.insert_ignore_ascii_case(AUTHORIZATION, value);
        } else if bucket == ParameterBucket::Header {
            target.tagged.insert_ignore_ascii_case(descriptor.target(), value);
        } else {
            target.tagged.insert(descriptor.target(), value);
        }
    }

    /// Route a pre-grouped field carrying a whole bucket.
    ///
    /// The group replaces every tagged field of that bucket, whatever the
    /// order of calls. Entries whose value is absent are skipped.
    pub fn group<I, K, V>(&mut self, bucket: ParameterBucket, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToParam,
    {
        let is_header = bucket == ParameterBucket::Header;
        let Some(target) = self.bucket_mut(bucket) else {
            return;
        };

        let group = target.grouped.get_or_insert_with(ParameterSet::new);
        for (name, value) in entries {
            let Some(value) = value.to_param() else {
                continue;
            };
            if is_header {
                group.insert_ignore_ascii_case(name.as_ref(), value);
            } else {
                group.insert(name.as_ref(), value);
            }
        }
    }

    /// Set the body candidate; a later call replaces an earlier one.
    pub fn body(&mut self, payload: impl Into<Payload>) {
        self.body = Some(payload.into());
    }

    /// Resolve into a [`Decomposition`].
    #[must_use]
    pub fn finish(self) -> Decomposition {
        Decomposition {
            header: self.header.finish(),
            query: self.query.finish(),
            path: self.path.finish(),
            form: self.form.finish(),
            body: self.body,
        }
    }
}

/// Programmatic, pre-grouped parameters.
///
/// Every non-empty set replaces the corresponding bucket, exactly like a
/// `_header_`/`_query_`/`_path_`/`_form_` field would.
///
/// ```
/// use courier_core::{Decompose, Parameters};
///
/// let params = Parameters::new()
///     .path("code", "BK-9")
///     .query("lang", "vi")
///     .tagged("Bearer,header,authorizationType", "t0k3n");
///
/// let parts = params.decompose();
/// assert_eq!(parts.path.get("code"), Some("BK-9"));
/// assert_eq!(parts.header.get("Authorization"), Some("Bearer t0k3n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    header: ParameterSet,
    query: ParameterSet,
    path: ParameterSet,
    form: ParameterSet,
    body: Option<Payload>,
}

impl Parameters {
    /// No parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        if let Some(value) = value.to_param() {
            self.header.insert_ignore_ascii_case(name, value);
        }
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        if let Some(value) = value.to_param() {
            self.query.insert(name, value);
        }
        self
    }

    /// Add a path parameter.
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        if let Some(value) = value.to_param() {
            self.path.insert(name, value);
        }
        self
    }

    /// Add a form parameter.
    #[must_use]
    pub fn form(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        if let Some(value) = value.to_param() {
            self.form.insert(name, value);
        }
        self
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, payload: impl Into<Payload>) -> Self {
        self.body = Some(payload.into());
        self
    }

    /// Route a value with a tag string, as a derived field would be.
    ///
    /// The tag's target doubles as the field name. Unmapped tags are ignored.
    #[must_use]
    pub fn tagged(mut self, tag: &str, value: impl ToParam) -> Self {
        let descriptor = FieldDescriptor::parse(Some(tag), tag);
        let mut sink = ParameterSink::new();
        sink.field(&descriptor, &value);
        let parts = sink.finish();
        self.header.merge_ignore_ascii_case(parts.header);
        self.query.merge(parts.query);
        self.path.merge(parts.path);
        self.form.merge(parts.form);
        self
    }
}

impl Decompose for Parameters {
    fn decompose_into(&self, sink: &mut ParameterSink) {
        for bucket in ParameterBucket::PARAMETERS {
            let set = match bucket {
                ParameterBucket::Header => &self.header,
                ParameterBucket::Query => &self.query,
                ParameterBucket::Path => &self.path,
                _ => &self.form,
            };
            if !set.is_empty() {
                sink.group(bucket, set);
            }
        }
        if let Some(body) = &self.body {
            sink.body(body.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reservation {
        code: String,
        hotel: u64,
        trace: Option<String>,
        note: String,
        extra: Vec<(String, String)>,
    }

    impl Decompose for Reservation {
        fn decompose_into(&self, sink: &mut ParameterSink) {
            sink.field(
                &FieldDescriptor::from_static("code", ParameterBucket::Path, None),
                &self.code,
            );
            sink.field(
                &FieldDescriptor::from_static("hotelId", ParameterBucket::Query, None),
                &self.hotel,
            );
            sink.field(
                &FieldDescriptor::from_static("X-Trace", ParameterBucket::Header, None),
                &self.trace,
            );
            sink.field(
                &FieldDescriptor::from_static(
                    "note",
                    ParameterBucket::Form,
                    Some(crate::Modifier::Optional),
                ),
                &self.note,
            );
            sink.group(
                ParameterBucket::Query,
                self.extra.iter().map(|(k, v)| (k, v)),
            );
        }
    }

    fn reservation() -> Reservation {
        Reservation {
            code: "BK-1".to_string(),
            hotel: 12_736,
            trace: Some("abc".to_string()),
            note: String::new(),
            extra: Vec::new(),
        }
    }

    #[test]
    fn fields_land_in_their_buckets() {
        let parts = decompose(&reservation());
        assert_eq!(parts.path.get("code"), Some("BK-1"));
        assert_eq!(parts.query.get("hotelId"), Some("12736"));
        assert_eq!(parts.header.get("X-Trace"), Some("abc"));
        assert!(parts.body.is_none());
    }

    #[test]
    fn empty_optional_is_omitted() {
        let parts = reservation().decompose();
        assert!(!parts.form.contains_key("note"));

        let parts = Reservation {
            note: "late arrival".to_string(),
            ..reservation()
        }
        .decompose();
        assert_eq!(parts.form.get("note"), Some("late arrival"));
    }

    #[test]
    fn none_is_omitted() {
        let parts = Reservation {
            trace: None,
            ..reservation()
        }
        .decompose();
        assert!(parts.header.is_empty());
    }

    #[test]
    fn group_replaces_tagged_bucket() {
        let parts = Reservation {
            extra: vec![("page".to_string(), "2".to_string())],
            ..reservation()
        }
        .decompose();
        assert_eq!(parts.query.get("page"), Some("2"));
        assert!(!parts.query.contains_key("hotelId"));
        // other buckets untouched
        assert_eq!(parts.path.get("code"), Some("BK-1"));
    }

    #[test]
    fn empty_group_still_wins() {
        let mut sink = ParameterSink::new();
        sink.field(
            &FieldDescriptor::from_static("q", ParameterBucket::Query, None),
            "x",
        );
        sink.group(ParameterBucket::Query, Vec::<(String, String)>::new());
        assert!(sink.finish().query.is_empty());
    }

    #[test]
    fn authorization_modifier() {
        let mut sink = ParameterSink::new();
        sink.field(&FieldDescriptor::parse(Some("access-token,authorizationType"), "t"), "xyz");
        let parts = sink.finish();
        assert_eq!(parts.header.get("Authorization"), Some("access-token xyz"));
    }

    #[test]
    fn body_and_unmapped_descriptors_are_ignored_by_field() {
        let mut sink = ParameterSink::new();
        sink.field(&FieldDescriptor::unmapped("secret"), "s");
        sink.field(&FieldDescriptor::parse(Some("payload,body"), "payload"), "b");
        let parts = sink.finish();
        for bucket in ParameterBucket::PARAMETERS {
            assert!(parts.bucket(bucket).is_some_and(ParameterSet::is_empty));
        }
        assert!(parts.body.is_none());
    }

    #[test]
    fn last_body_wins() {
        let mut sink = ParameterSink::new();
        sink.body("first");
        sink.body("second");
        let body = sink.finish().body.expect("body");
        assert_eq!(body.encode(None).expect("text").as_ref(), b"second");
    }

    #[test]
    fn parameters_value() {
        let parts = Parameters::new()
            .header("x-request-id", "r1")
            .query("page", 3)
            .query("skip", None::<u32>)
            .form("name", "Alice")
            .body("raw")
            .decompose();

        assert_eq!(parts.header.get("x-request-id"), Some("r1"));
        assert_eq!(parts.query.get("page"), Some("3"));
        assert!(!parts.query.contains_key("skip"));
        assert_eq!(parts.form.get("name"), Some("Alice"));
        assert!(parts.path.is_empty());
        assert!(parts.body.is_some());
    }

    #[test]
    fn parameters_tagged_uses_grammar() {
        let parts = Parameters::new()
            .tagged("uuid,path", "42")
            .tagged("ignored", "nope")
            .decompose();
        assert_eq!(parts.path.get("uuid"), Some("42"));
        assert!(parts.query.is_empty());
    }

    #[test]
    fn decomposition_take() {
        let mut parts = Parameters::new().query("a", 1).decompose();
        let query = parts.take(ParameterBucket::Query);
        assert_eq!(query.get("a"), Some("1"));
        assert!(parts.query.is_empty());
    }
}
