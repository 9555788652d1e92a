//! Multipart form data encoding.
//!
//! The builder collects form parameters and at most one file; at dispatch
//! time they become a [`Form`] with one text part per parameter followed by
//! the file part.
//!
//! # Example
//!
//! ```
//! use courier_core::{Form, FormFile, ParameterSet};
//!
//! let mut fields = ParameterSet::new();
//! fields.insert("description", "passport scan");
//!
//! let file = FormFile::new("document", "passport.png", b"\x89PNG".to_vec());
//! let form = Form::from_fields(&fields, Some(&file));
//! assert_eq!(form.parts().len(), 2);
//!
//! let (content_type, _body) = form.into_body();
//! assert!(content_type.starts_with("multipart/form-data; boundary="));
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::ParameterSet;

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Text part; no `Content-Type` is written for it.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        }
    }

    /// File part; the content type is guessed from the file name.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);
        Self {
            name: name.into(),
            filename: Some(filename),
            content_type: Some(content_type.to_string()),
            data: data.into(),
        }
    }

    /// Override the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name, for file parts.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFile {
    /// Form field carrying the file.
    pub field_name: String,
    /// File name sent in `Content-Disposition`.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

impl FormFile {
    /// Describe a file upload.
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

// Only the types a booking-style API realistically uploads.
fn guess_content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Empty form with a fresh boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Empty form with a fixed boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Text parts for every field, then the file part.
    #[must_use]
    pub fn from_fields(fields: &ParameterSet, file: Option<&FormFile>) -> Self {
        let mut form = fields
            .iter()
            .fold(Self::new(), |form, (name, value)| form.part(Part::text(name, value)));
        if let Some(file) = file {
            form = form.part(Part::file(
                file.field_name.clone(),
                file.file_name.clone(),
                file.bytes.clone(),
            ));
        }
        form
    }

    /// Append a part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `multipart/form-data; boundary=<boundary>`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode into `(content type, body)`.
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let content_type = self.content_type();
        let body = self.encode();
        (content_type, body)
    }

    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(escape_quoted(&part.name).as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(escape_quoted(filename).as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----CourierBoundary{timestamp:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_text_has_no_content_type() {
        let part = Part::text("field", "value");
        assert_eq!(part.name(), "field");
        assert_eq!(part.data().as_ref(), b"value");
        assert!(part.content_type().is_none());
        assert!(part.filename().is_none());
    }

    #[test]
    fn part_file_guesses_content_type() {
        let part = Part::file("upload", "scan.PDF", vec![0x25, 0x50]);
        assert_eq!(part.filename(), Some("scan.PDF"));
        assert_eq!(part.content_type(), Some("application/pdf"));

        let part = Part::file("upload", "noextension", Vec::new());
        assert_eq!(part.content_type(), Some("application/octet-stream"));

        let part = part.with_content_type("image/webp");
        assert_eq!(part.content_type(), Some("image/webp"));
    }

    #[test]
    fn form_fresh_boundary() {
        let form = Form::new();
        assert!(form.parts().is_empty());
        assert!(form.boundary().starts_with("----CourierBoundary"));
    }

    #[test]
    fn form_from_fields_puts_file_last() {
        let fields: ParameterSet = [("b", "2"), ("a", "1")].into_iter().collect();
        let file = FormFile::new("document", "id.png", vec![1, 2, 3]);

        let form = Form::from_fields(&fields, Some(&file));
        let names: Vec<_> = form.parts().iter().map(Part::name).collect();
        assert_eq!(names, ["a", "b", "document"]);
    }

    #[test]
    fn form_encode() {
        let form = Form::with_boundary("XyZ")
            .part(Part::text("name", "Alice"))
            .part(Part::file("document", "note.txt", "hello"));

        let (content_type, body) = form.into_body();
        assert_eq!(content_type, "multipart/form-data; boundary=XyZ");

        let expected = concat!(
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"name\"\r\n",
            "\r\n",
            "Alice\r\n",
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"document\"; filename=\"note.txt\"\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "hello\r\n",
            "--XyZ--\r\n",
        );
        assert_eq!(String::from_utf8_lossy(&body), expected);
    }

    #[test]
    fn form_escapes_quotes_in_names() {
        let form = Form::with_boundary("b").part(Part::file("f", "my \"cv\".pdf", Vec::new()));
        let (_, body) = form.into_body();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains(r#"filename="my \"cv\".pdf""#), "{body}");
    }
}
