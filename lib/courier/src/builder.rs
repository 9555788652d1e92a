//! Request builder and dispatcher.
//!
//! A [`Builder`] accumulates one request: method, URI template, parameters
//! derived from tagged records, explicit parameters, credentials, body and
//! content negotiation. Nothing touches the network until one of the
//! terminal operations ([`Builder::send`], [`Builder::call`],
//! [`Builder::call_with`]) runs.
//!
//! Parameters live in two layers. Values from [`Builder::build_request`] and
//! the bucket-specific `build_*` methods form the derived layer; direct calls
//! such as [`Builder::header`] form the explicit layer. At dispatch the
//! explicit layer is applied on top, so an explicit value wins whatever the
//! call order.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, debug_span};

use crate::parser::ResponseParser;
use crate::path::substitute;
use crate::{
    AUTHORIZATION, Configuration, ContentType, Credential, Decompose, Error, Form, FormFile,
    HttpClient, Method, ParameterBucket, ParameterSet, Payload, Request, Response, Result,
    ToParam, format_api_key, format_basic, format_bearer, from_json, from_xml, to_form,
};

#[derive(Debug, Clone, Default)]
struct ParameterLayer {
    header: ParameterSet,
    query: ParameterSet,
    path: ParameterSet,
    form: ParameterSet,
}

impl ParameterLayer {
    fn merge(&mut self, bucket: ParameterBucket, params: ParameterSet) {
        match bucket {
            ParameterBucket::Header => self.header.merge_ignore_ascii_case(params),
            ParameterBucket::Query => self.query.merge(params),
            ParameterBucket::Path => self.path.merge(params),
            ParameterBucket::Form => self.form.merge(params),
            ParameterBucket::Body | ParameterBucket::Unmapped => {}
        }
    }

    fn insert(&mut self, bucket: ParameterBucket, name: String, value: &impl ToParam) {
        let Some(value) = value.to_param() else {
            return;
        };
        match bucket {
            ParameterBucket::Header => {
                self.header.insert_ignore_ascii_case(name, value);
            }
            ParameterBucket::Query => {
                self.query.insert(name, value);
            }
            ParameterBucket::Path => {
                self.path.insert(name, value);
            }
            ParameterBucket::Form => {
                self.form.insert(name, value);
            }
            ParameterBucket::Body | ParameterBucket::Unmapped => {}
        }
    }
}

/// Chainable accumulator for one request.
///
/// Created by [`ApiClient::builder`](crate::ApiClient::builder); every
/// method consumes the builder and returns it.
///
/// # Example
///
/// ```ignore
/// let response = client
///     .builder("/booking/detail/:uuid")
///     .build_request(&query)
///     .header("X-Request-Id", "42")
///     .call::<CommonResult>(None)
///     .await?;
/// ```
#[must_use = "a builder does nothing until `send`, `call` or `call_with` is awaited"]
pub struct Builder<'a, C> {
    transport: &'a C,
    config: &'a Configuration,
    method: Method,
    uri: String,
    derived: ParameterLayer,
    explicit: ParameterLayer,
    payload: Option<Payload>,
    accept: Vec<String>,
    content_types: Vec<String>,
    file: Option<FormFile>,
}

impl<C> std::fmt::Debug for Builder<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("derived", &self.derived)
            .field("explicit", &self.explicit)
            .field("payload", &self.payload)
            .field("accept", &self.accept)
            .field("content_types", &self.content_types)
            .finish_non_exhaustive()
    }
}

impl<'a, C> Builder<'a, C> {
    pub(crate) fn new(
        transport: &'a C,
        config: &'a Configuration,
        uri: impl Into<String>,
        accept: Vec<String>,
    ) -> Self {
        Self {
            transport,
            config,
            method: Method::Get,
            uri: uri.into(),
            derived: ParameterLayer::default(),
            explicit: ParameterLayer::default(),
            payload: None,
            accept,
            content_types: Vec::new(),
            file: None,
        }
    }

    /// Use `GET`.
    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    /// Use `POST`.
    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    /// Use `PUT`.
    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    /// Use `DELETE`.
    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    /// Use `PATCH`.
    pub fn patch(self) -> Self {
        self.method(Method::Patch)
    }

    /// Set the method; the last call wins.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set a serializable body, replacing any previous one.
    pub fn body<T>(self, body: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.body_payload(Payload::new(body))
    }

    /// Set a prepared payload, replacing any previous one.
    pub fn body_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Set a header. Header names match ignoring ASCII case; absent values
    /// (`None`) are skipped.
    ///
    /// `Accept` is always replaced by the accept list the builder was created
    /// with (see [`ApiClient::builder_with_accept`](crate::ApiClient::builder_with_accept)).
    pub fn header(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        self.explicit
            .insert(ParameterBucket::Header, name.into(), &value);
        self
    }

    /// Set a query parameter. Absent values (`None`) are skipped.
    pub fn query(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        self.explicit
            .insert(ParameterBucket::Query, name.into(), &value);
        self
    }

    /// Set a path parameter substituted for `:name`.
    pub fn path(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        self.explicit
            .insert(ParameterBucket::Path, name.into(), &value);
        self
    }

    /// Set a form parameter.
    pub fn form_param(mut self, name: impl Into<String>, value: impl ToParam) -> Self {
        self.explicit
            .insert(ParameterBucket::Form, name.into(), &value);
        self
    }

    fn file_mut(&mut self) -> &mut FormFile {
        self.file.get_or_insert_with(FormFile::default)
    }

    /// Form field carrying the uploaded file.
    pub fn form_file_name(mut self, field_name: impl Into<String>) -> Self {
        self.file_mut().field_name = field_name.into();
        self
    }

    /// File name sent with the upload.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_mut().file_name = file_name.into();
        self
    }

    /// File contents; setting them switches the request to multipart.
    pub fn file_bytes(mut self, bytes: impl Into<Bytes>) -> Self {
        self.file_mut().bytes = bytes.into();
        self
    }

    /// Route every header, query, path and form field of `record`.
    ///
    /// Body fields are ignored; use [`Builder::body`] for the body.
    pub fn build_request<R: Decompose + ?Sized>(mut self, record: &R) -> Self {
        let mut parts = record.decompose();
        for bucket in ParameterBucket::PARAMETERS {
            self.derived.merge(bucket, parts.take(bucket));
        }
        self
    }

    fn build_bucket<R: Decompose + ?Sized>(mut self, bucket: ParameterBucket, record: &R) -> Self {
        let params = record.decompose().take(bucket);
        self.derived.merge(bucket, params);
        self
    }

    /// Route only the header fields of `record`.
    pub fn build_header<R: Decompose + ?Sized>(self, record: &R) -> Self {
        self.build_bucket(ParameterBucket::Header, record)
    }

    /// Route only the query fields of `record`.
    pub fn build_query<R: Decompose + ?Sized>(self, record: &R) -> Self {
        self.build_bucket(ParameterBucket::Query, record)
    }

    /// Route only the path fields of `record`.
    pub fn build_path<R: Decompose + ?Sized>(self, record: &R) -> Self {
        self.build_bucket(ParameterBucket::Path, record)
    }

    /// Route only the form fields of `record`.
    pub fn build_form<R: Decompose + ?Sized>(self, record: &R) -> Self {
        self.build_bucket(ParameterBucket::Form, record)
    }

    /// `Authorization: Basic base64(username:password)`.
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        self.header(AUTHORIZATION, format_basic(username, password))
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(AUTHORIZATION, format_bearer(token))
    }

    /// API key sent as the header `name`.
    pub fn api_key(self, name: &str, value: &str) -> Self {
        let (name, value) = format_api_key(name, value);
        self.header(name, value)
    }

    /// Apply a credential as an explicit header.
    pub fn credential(self, credential: &Credential) -> Self {
        let (name, value) = credential.header();
        self.header(name, value)
    }

    fn use_content_type(mut self, content_type: ContentType) -> Self {
        self.content_types = vec![content_type.as_str().to_string()];
        self
    }

    /// Send the body as `application/x-www-form-urlencoded`.
    pub fn use_x_form_urlencoded(self) -> Self {
        self.use_content_type(ContentType::FormUrlEncoded)
    }

    /// Send the body as `multipart/form-data`.
    pub fn use_multipart_form_data(self) -> Self {
        self.use_content_type(ContentType::MultipartFormData)
    }

    /// Send the body as `application/json`.
    pub fn use_application_json(self) -> Self {
        self.use_content_type(ContentType::Json)
    }

    /// Send the body as `application/xml`.
    pub fn use_application_xml(self) -> Self {
        self.use_content_type(ContentType::Xml)
    }

    /// Append a content type candidate; the first candidate is sent.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_types.push(content_type.into());
        self
    }

    fn method_and_uri(&self) -> (Method, String) {
        (self.method, self.uri.clone())
    }

    /// Assemble the transport request.
    fn into_request(self, auth: Option<&Credential>) -> Result<Request<Bytes>> {
        let Self {
            config,
            method,
            uri,
            mut derived,
            explicit,
            payload,
            accept,
            content_types,
            file,
            ..
        } = self;

        derived.header.merge_ignore_ascii_case(explicit.header);
        derived.query.merge(explicit.query);
        derived.path.merge(explicit.path);
        derived.form.merge(explicit.form);
        let ParameterLayer {
            header,
            query,
            path,
            form,
        } = derived;

        let url = url::Url::parse(&format!(
            "{}{}",
            config.get_base_path(),
            substitute(&uri, &path)
        ))?;

        let mut headers = ParameterSet::new();
        for (name, value) in config.default_headers() {
            headers.insert_ignore_ascii_case(name.as_str(), value.as_str());
        }
        headers.insert_ignore_ascii_case(USER_AGENT.as_str(), config.get_user_agent());
        headers.merge_ignore_ascii_case(header);
        if !accept.is_empty() {
            headers.insert_ignore_ascii_case(ACCEPT.as_str(), accept.join(", "));
        }

        let content_type = content_types
            .into_iter()
            .next()
            .or_else(|| {
                headers
                    .get_ignore_ascii_case(CONTENT_TYPE.as_str())
                    .map(str::to_string)
            })
            .or_else(|| infer_content_type(payload.as_ref(), &form, file.as_ref()));

        let (content_type, body) = encode_body(content_type, payload, &form, file.as_ref())?;
        if let Some(content_type) = content_type {
            headers.insert_ignore_ascii_case(CONTENT_TYPE.as_str(), content_type);
        }

        if let Some(credential) = auth {
            if headers.get_ignore_ascii_case(credential.header_name()).is_none() {
                let (name, value) = credential.header();
                headers.insert(name, value);
            }
        }

        let mut request = Request::builder(method, url)
            .headers(headers)
            .query_pairs(query.iter());
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request.build())
    }
}

fn infer_content_type(
    payload: Option<&Payload>,
    form: &ParameterSet,
    file: Option<&FormFile>,
) -> Option<String> {
    let content_type = if file.is_some() {
        ContentType::MultipartFormData
    } else if !form.is_empty() {
        ContentType::FormUrlEncoded
    } else {
        payload?.default_content_type()
    };
    Some(content_type.as_str().to_string())
}

/// Encode the body and settle the final `Content-Type` (multipart adds its
/// boundary).
fn encode_body(
    content_type: Option<String>,
    payload: Option<Payload>,
    form: &ParameterSet,
    file: Option<&FormFile>,
) -> Result<(Option<String>, Option<Bytes>)> {
    let has_form = !form.is_empty() || file.is_some();
    if payload.is_some() && has_form {
        return Err(Error::invalid_request(
            "cannot specify body and form at the same time",
        ));
    }

    if let Some(file) = file {
        if file.field_name.is_empty() || file.file_name.is_empty() {
            return Err(Error::invalid_request(
                "file uploads require a form field name and a file name",
            ));
        }
    }

    let kind = content_type.as_deref().and_then(ContentType::detect);
    if let Some(payload) = payload {
        let body = payload.encode(kind)?;
        return Ok((content_type, Some(body)));
    }

    match kind {
        Some(ContentType::MultipartFormData) => {
            let (content_type, body) = Form::from_fields(form, file).into_body();
            Ok((Some(content_type), Some(body)))
        }
        _ if file.is_some() => Err(Error::invalid_request(
            "file uploads require multipart/form-data",
        )),
        Some(ContentType::FormUrlEncoded) if has_form => {
            Ok((content_type, Some(to_form(form)?)))
        }
        _ if has_form => Err(Error::invalid_request(format!(
            "form parameters cannot be sent as {}",
            content_type.as_deref().unwrap_or("an unknown content type")
        ))),
        _ => Ok((content_type, None)),
    }
}

impl<C: HttpClient> Builder<'_, C> {
    /// Dispatch the request and return the raw response.
    ///
    /// `auth` is applied only when the request does not already carry the
    /// header it would write.
    ///
    /// # Errors
    ///
    /// Transport errors, [`Error::InvalidUrl`], [`Error::InvalidRequest`]
    /// for conflicting body and form, and [`Error::Http`] for any status of
    /// 300 or above.
    pub async fn send(self, auth: Option<&Credential>) -> Result<Response<Bytes>> {
        let (method, uri) = self.method_and_uri();
        let span = debug_span!("courier_call", %method, %uri);

        async move {
            let transport = self.transport;
            let verbose = self.config.is_debug();
            let request = self.into_request(auth)?;

            debug!(url = %request.url(), "dispatching request");
            if verbose {
                debug!(headers = ?request.headers(), "request headers");
            }

            let response = transport.execute(request).await?;
            let status = response.status();
            if verbose {
                debug!(
                    status,
                    headers = ?response.headers(),
                    body = %String::from_utf8_lossy(response.body()),
                    "raw response"
                );
            }

            if status >= 300 {
                let message = response.status_line();
                debug!(status, %message, "request failed");
                return Err(Error::http(status, message, response.into_body()));
            }

            debug!(status, "request succeeded");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Dispatch and decode the body by its `Content-Type` (JSON or XML).
    ///
    /// An empty body decodes as JSON `null`, which suits `()` and
    /// `Option<T>`.
    ///
    /// # Errors
    ///
    /// Everything [`Builder::send`] returns, plus [`Error::Decode`] when the
    /// body cannot be decoded or its content type is neither JSON nor XML.
    pub async fn call<T: DeserializeOwned>(self, auth: Option<&Credential>) -> Result<Response<T>> {
        let response = self.send(auth).await?;
        decode(response)
    }

    /// Dispatch and decode the body with `parser`.
    ///
    /// # Errors
    ///
    /// Everything [`Builder::send`] returns, plus [`Error::Decode`] carrying
    /// the parser's message and the raw body.
    pub async fn call_with<P: ResponseParser>(
        self,
        auth: Option<&Credential>,
        parser: P,
    ) -> Result<Response<P::Output>> {
        let response = self.send(auth).await?;
        let (status, headers, body) = response.into_parts();
        match parser.parse(&body) {
            Ok(value) => Ok(Response::new(status, headers, value)),
            Err(err) => {
                debug!(status, error = %err, "response parser failed");
                Err(Error::decode(status, err.to_string(), body))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(response: Response<Bytes>) -> Result<Response<T>> {
    let content_type = response.content_type();
    let raw_content_type = response.header(CONTENT_TYPE.as_str()).map(str::to_string);
    let (status, headers, body) = response.into_parts();

    let decoded = if body.is_empty() {
        from_json(b"null")
    } else {
        match content_type {
            Some(ContentType::Json) => from_json(&body),
            Some(ContentType::Xml) => from_xml(&body),
            _ => {
                let message = format!(
                    "undefined response type {}",
                    raw_content_type.as_deref().unwrap_or("(none)")
                );
                return Err(Error::decode(status, message, body));
            }
        }
    };

    match decoded {
        Ok(value) => Ok(Response::new(status, headers, value)),
        Err(err) => {
            debug!(status, error = %err, "response decoding failed");
            Err(Error::decode(status, err.to_string(), body))
        }
    }
}
