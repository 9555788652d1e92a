//! Response body parsers.
//!
//! [`Builder::call_with`](crate::Builder::call_with) hands the raw body of a
//! successful response to a [`ResponseParser`]. A parser failure becomes
//! [`Error::Decode`](crate::Error::Decode) carrying the parser's message and
//! the raw body.

use std::fmt::Display;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{Error, from_json, from_xml};

/// Turns a raw response body into a value.
pub trait ResponseParser {
    /// Parsed value.
    type Output;
    /// Parser failure; only its message is kept.
    type Error: Display;

    /// Parse the body.
    fn parse(self, body: &[u8]) -> Result<Self::Output, Self::Error>;
}

impl<F, T, E> ResponseParser for F
where
    F: FnOnce(&[u8]) -> Result<T, E>,
    E: Display,
{
    type Output = T;
    type Error = E;

    fn parse(self, body: &[u8]) -> Result<T, E> {
        self(body)
    }
}

/// JSON parser with path-aware error messages.
#[derive(Debug)]
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> Json<T> {
    /// JSON parser for `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseParser for Json<T> {
    type Output = T;
    type Error = Error;

    fn parse(self, body: &[u8]) -> Result<T, Error> {
        from_json(body)
    }
}

/// XML parser.
#[derive(Debug)]
pub struct Xml<T>(PhantomData<fn() -> T>);

impl<T> Xml<T> {
    /// XML parser for `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Xml<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseParser for Xml<T> {
    type Output = T;
    type Error = Error;

    fn parse(self, body: &[u8]) -> Result<T, Error> {
        from_xml(body)
    }
}

/// UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl ResponseParser for Text {
    type Output = String;
    type Error = std::str::Utf8Error;

    fn parse(self, body: &[u8]) -> Result<String, Self::Error> {
        std::str::from_utf8(body).map(str::to_string)
    }
}

/// The body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl ResponseParser for Raw {
    type Output = Bytes;
    type Error = std::convert::Infallible;

    fn parse(self, body: &[u8]) -> Result<Bytes, Self::Error> {
        Ok(Bytes::copy_from_slice(body))
    }
}
