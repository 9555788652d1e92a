//! Body codecs and content types.

use bytes::Bytes;

use crate::{Error, Result};

/// Content types understood by the request encoder and response decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// XML content type (`application/xml`).
    Xml,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Multipart form content type (`multipart/form-data`).
    MultipartFormData,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::MultipartFormData => "multipart/form-data",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Classify a `Content-Type` header value.
    ///
    /// Parameters (`; charset=utf-8`) are ignored, as is case. Structured
    /// syntax suffixes are recognised: `application/problem+json` is JSON,
    /// `application/atom+xml` and `text/xml` are XML.
    ///
    /// ```
    /// use courier_core::ContentType;
    ///
    /// assert_eq!(ContentType::detect("application/json; charset=utf-8"), Some(ContentType::Json));
    /// assert_eq!(ContentType::detect("application/vnd.api+json"), Some(ContentType::Json));
    /// assert_eq!(ContentType::detect("text/xml"), Some(ContentType::Xml));
    /// assert_eq!(ContentType::detect("image/png"), None);
    /// ```
    #[must_use]
    pub fn detect(header: &str) -> Option<Self> {
        let mime = header
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            "application/x-www-form-urlencoded" => Some(Self::FormUrlEncoded),
            "multipart/form-data" => Some(Self::MultipartFormData),
            "text/plain" => Some(Self::PlainText),
            "application/octet-stream" => Some(Self::OctetStream),
            mime if mime.ends_with("+json") => Some(Self::Json),
            mime if mime.ends_with("+xml") => Some(Self::Xml),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Booking { code: String }
///
/// let booking = Booking { code: "BK-1".to_string() };
/// let bytes = to_json(&booking).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"code":"BK-1"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Uses `serde_html_form`, so `Vec<T>` fields become repeated keys.
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Serialize a value to XML bytes.
///
/// The root element is named after the serialized type.
pub fn to_xml<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    quick_xml::se::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(|e| Error::Xml(e.to_string()))
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so that the message names the failing field
/// (e.g. `booking.guest.name`).
///
/// # Example
///
/// ```
/// use courier_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Status { message: String }
///
/// let status: Status = from_json(br#"{"message":"ok"}"#).expect("deserialize");
/// assert_eq!(status.message, "ok");
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}

/// Deserialize XML bytes to a value.
pub fn from_xml<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))?;
    quick_xml::de::from_str(text).map_err(|e| Error::Xml(e.to_string()))
}
