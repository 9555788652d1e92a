//! Request body payload.
//!
//! A [`Payload`] holds the body value without committing to an encoding. The
//! dispatcher encodes it once the final `Content-Type` is known.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use crate::{ContentType, Error, Result, to_form, to_json, to_xml};

type Encoder = dyn Fn(ContentType) -> Result<Bytes> + Send + Sync;

#[derive(Clone)]
enum Kind {
    Serialized(Arc<Encoder>),
    Text(String),
    Raw(Bytes),
}

/// An opaque request body.
///
/// # Example
///
/// ```
/// use courier_core::{ContentType, Payload};
///
/// #[derive(serde::Serialize)]
/// struct Booking { code: &'static str }
///
/// let payload = Payload::new(Booking { code: "BK-1" });
/// assert_eq!(payload.default_content_type(), ContentType::Json);
///
/// let body = payload.encode(Some(ContentType::Json)).expect("encode");
/// assert_eq!(body.as_ref(), br#"{"code":"BK-1"}"#);
/// ```
#[derive(Clone)]
pub struct Payload(Kind);

impl Payload {
    /// Serializable payload, encoded as JSON, XML or url-encoded form.
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        let encoder = move |content_type: ContentType| match content_type {
            ContentType::Json => to_json(&value),
            ContentType::Xml => to_xml(&value),
            ContentType::FormUrlEncoded => to_form(&value),
            other => Err(Error::invalid_request(format!(
                "cannot encode a serialized body as {other}"
            ))),
        };
        Self(Kind::Serialized(Arc::new(encoder)))
    }

    /// Text payload, sent as-is.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self(Kind::Text(value.into()))
    }

    /// Raw bytes, sent as-is.
    #[must_use]
    pub fn raw(value: impl Into<Bytes>) -> Self {
        Self(Kind::Raw(value.into()))
    }

    /// Content type used when none was selected on the builder.
    #[must_use]
    pub const fn default_content_type(&self) -> ContentType {
        match self.0 {
            Kind::Serialized(_) => ContentType::Json,
            Kind::Text(_) => ContentType::PlainText,
            Kind::Raw(_) => ContentType::OctetStream,
        }
    }

    /// Encode for the given content type.
    ///
    /// Unknown content types (`None`) use JSON for serialized payloads.
    /// Text and raw payloads ignore the content type.
    pub fn encode(&self, content_type: Option<ContentType>) -> Result<Bytes> {
        match &self.0 {
            Kind::Serialized(encode) => encode(content_type.unwrap_or(ContentType::Json)),
            Kind::Text(text) => Ok(Bytes::from(text.clone())),
            Kind::Raw(bytes) => Ok(bytes.clone()),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Kind::Serialized(_) => f.write_str("Payload::Serialized"),
            Kind::Text(text) => f.debug_tuple("Payload::Text").field(text).finish(),
            Kind::Raw(bytes) => f.debug_tuple("Payload::Raw").field(&bytes.len()).finish(),
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Self::raw(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::raw(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Guest {
        name: String,
        nights: u32,
    }

    fn guest() -> Payload {
        Payload::new(Guest {
            name: "Lan".to_string(),
            nights: 3,
        })
    }

    #[test]
    fn serialized_encodings() {
        let payload = guest();
        assert_eq!(
            payload.encode(Some(ContentType::Json)).expect("json").as_ref(),
            br#"{"name":"Lan","nights":3}"#
        );
        assert_eq!(
            payload.encode(Some(ContentType::FormUrlEncoded)).expect("form").as_ref(),
            b"name=Lan&nights=3"
        );
        let xml = payload.encode(Some(ContentType::Xml)).expect("xml");
        assert!(xml.starts_with(b"<Guest>"));
    }

    #[test]
    fn serialized_defaults_to_json() {
        let payload = guest();
        assert_eq!(payload.default_content_type(), ContentType::Json);
        assert_eq!(
            payload.encode(None).expect("json"),
            payload.encode(Some(ContentType::Json)).expect("json")
        );
    }

    #[test]
    fn serialized_rejects_unsupported_content_type() {
        let err = guest()
            .encode(Some(ContentType::PlainText))
            .expect_err("text/plain is not a serde format");
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn text_and_raw_pass_through() {
        let text = Payload::from("hello");
        assert_eq!(text.default_content_type(), ContentType::PlainText);
        assert_eq!(text.encode(Some(ContentType::Json)).expect("text").as_ref(), b"hello");

        let raw = Payload::from(vec![0_u8, 1, 2]);
        assert_eq!(raw.default_content_type(), ContentType::OctetStream);
        assert_eq!(raw.encode(None).expect("raw").as_ref(), &[0, 1, 2]);
    }

    #[test]
    fn debug_does_not_dump_bytes() {
        assert_eq!(format!("{:?}", Payload::raw(vec![1, 2, 3])), "Payload::Raw(3)");
        assert_eq!(format!("{:?}", guest()), "Payload::Serialized");
    }
}
