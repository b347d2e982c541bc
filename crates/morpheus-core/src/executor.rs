//! Generic request execution against the Morpheus API.
//!
//! Resource bindings describe a call as a [`Request`] (method, path, query,
//! headers, and either a JSON body or a list of files to upload) and hand it
//! to a [`RequestExecutor`]. The [`Executor`] turns that description into a
//! single HTTP round trip and returns the JSON payload wrapped in a
//! [`Response`]. Bindings pick the payload type with [`Response::decode`], so
//! no runtime type checks are needed on the result.

use crate::client::HttpConfig;
use crate::config::MorpheusConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;
use uuid::Uuid;

const USER_AGENT: &str = concat!("morpheus-core/", env!("CARGO_PKG_VERSION"));
const REQUEST_ID_HEADER: &str = "X-Request-Id";
const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP method of a [`Request`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A file attached to a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// Form field name the file is sent under
    pub parameter_name: String,
    /// File name reported to the server
    pub file_name: String,
    /// File contents
    pub content: Bytes,
    /// MIME type; `application/octet-stream` when unset
    pub content_type: Option<String>,
}

impl FilePayload {
    /// Create a payload for the given form field.
    #[must_use]
    pub fn new(
        parameter_name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            file_name: file_name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    /// Set the MIME type of the part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Description of a single API call.
///
/// A request carries either a JSON `body` or, when `is_multipart` is set, a
/// list of files. The executor never sends both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// API path, e.g. `/api/blueprints/7`
    pub path: String,
    /// Query string parameters
    pub query_params: BTreeMap<String, String>,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
    /// JSON body, ignored for multipart requests
    pub body: Option<Value>,
    /// Send `multipart_files` as a multipart form instead of `body`
    pub is_multipart: bool,
    /// Files for a multipart request
    pub multipart_files: Vec<FilePayload>,
}

impl Request {
    /// Create a request for the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn with_query_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.query_params = params;
        self
    }

    /// Add a single query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set an already-encoded JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Encode `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the value cannot be encoded.
    pub fn with_body<B>(self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)
            .map_err(|err| Error::SerializationError(err.to_string()))?;
        Ok(self.with_json(value))
    }

    /// Attach files and turn the request into a multipart upload.
    #[must_use]
    pub fn with_files(mut self, files: Vec<FilePayload>) -> Self {
        self.is_multipart = true;
        self.multipart_files = files;
        self
    }
}

/// A successful (2xx) API response.
#[derive(Debug, Clone)]
pub struct Response<R> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// `X-Request-Id` sent with the call
    pub request_id: Option<String>,
    /// Decoded payload
    pub result: R,
}

impl<R> Response<R> {
    /// Wrap a payload with the given status and no headers.
    #[must_use]
    pub fn new(status: u16, result: R) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            request_id: None,
            result,
        }
    }

    /// Borrow the decoded payload.
    #[must_use]
    pub const fn result(&self) -> &R {
        &self.result
    }

    /// Consume the response, returning the decoded payload.
    #[must_use]
    pub fn into_result(self) -> R {
        self.result
    }
}

impl Response<Value> {
    /// Decode the JSON payload into `R`, keeping status and headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the payload does not match `R`.
    pub fn decode<R>(self) -> Result<Response<R>>
    where
        R: DeserializeOwned,
    {
        let result = serde_json::from_value(self.result)
            .map_err(|err| Error::ParseError(format!("Unexpected response shape: {err}")))?;

        Ok(Response {
            status: self.status,
            headers: self.headers,
            request_id: self.request_id,
            result,
        })
    }
}

/// Performs [`Request`]s against the API.
///
/// Implementations send each request exactly once and return the raw JSON
/// payload. Non-2xx statuses and transport failures are returned as errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a request and return its JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses and
    /// malformed JSON.
    async fn execute_value(&self, request: Request) -> Result<Response<Value>>;
}

/// Builder for [`Executor`].
#[derive(Debug, Clone)]
pub struct ExecutorBuilder {
    base_url: Url,
    http_config: HttpConfig,
    access_token: Option<SecretString>,
    user_agent: String,
}

impl ExecutorBuilder {
    /// Create a builder for the appliance base URL.
    ///
    /// The URL should include the protocol and hostname (e.g. `https://morpheus.example.com`).
    /// A sub-path is kept, so `https://host/morpheus` sends to `https://host/morpheus/api/...`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid Morpheus base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            http_config: HttpConfig::new(),
            access_token: None,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Create a builder from a [`MorpheusConfig`].
    ///
    /// The configuration is validated first, so values loaded through serde
    /// get the same checks as [`MorpheusConfig::new`].
    pub fn from_config(config: &MorpheusConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::new(&config.url)?.with_http_config(config.http_config());
        builder.access_token = config.access_token.clone();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }
        Ok(builder)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the executor.
    pub fn build(self) -> Result<Executor> {
        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent)
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if !self.http_config.tls_verify {
            warn!("TLS verification disabled for Morpheus client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build Morpheus HTTP client: {err}"))
        })?;

        Ok(Executor {
            http,
            base_url: self.base_url,
            access_token: self.access_token,
        })
    }
}

/// HTTP executor backed by a pooled reqwest client.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct Executor {
    http: Client,
    base_url: Url,
    access_token: Option<SecretString>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Create an executor with default settings.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ExecutorBuilder::new(base_url)?.build()
    }

    /// Start a builder for the given base URL.
    pub fn builder(base_url: impl AsRef<str>) -> Result<ExecutorBuilder> {
        ExecutorBuilder::new(base_url)
    }

    /// Create an executor from a [`MorpheusConfig`].
    pub fn from_config(config: &MorpheusConfig) -> Result<Self> {
        ExecutorBuilder::from_config(config)?.build()
    }

    /// Access the underlying base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute a request and decode its payload into `R`.
    pub async fn execute<R>(&self, request: Request) -> Result<Response<R>>
    where
        R: DeserializeOwned,
    {
        self.execute_value(request).await?.decode()
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);

        self.base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }

    fn build_form(files: Vec<FilePayload>) -> Result<Form> {
        let mut form = Form::new();
        for file in files {
            let content_type = file
                .content_type
                .as_deref()
                .unwrap_or(DEFAULT_FILE_CONTENT_TYPE);
            let part = Part::bytes(file.content.to_vec())
                .file_name(file.file_name)
                .mime_str(content_type)
                .map_err(|err| {
                    Error::SerializationError(format!(
                        "Invalid content type `{content_type}`: {err}"
                    ))
                })?;
            form = form.part(file.parameter_name, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl RequestExecutor for Executor {
    async fn execute_value(&self, request: Request) -> Result<Response<Value>> {
        let url = self.build_url(&request.path)?;
        let request_id = Uuid::new_v4().to_string();
        let Request {
            method,
            path,
            query_params,
            headers,
            body,
            is_multipart,
            multipart_files,
        } = request;

        let mut builder = self.http.request(method.into(), url);
        if !query_params.is_empty() {
            builder = builder.query(&query_params);
        }

        builder = builder
            .header("Accept", "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        for (name, value) in &headers {
            // reqwest sets the multipart boundary itself
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        if is_multipart {
            builder = builder.multipart(Self::build_form(multipart_files)?);
        } else if let Some(payload) = &body {
            builder = builder.json(payload);
        }

        info!(%method, path = %path, request_id = %request_id, "Morpheus request");

        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();
        let response_headers = response.headers().clone();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!(%method, path = %path, status = status.as_u16(), "Morpheus request failed");
            return Err(map_status_to_error(status, text));
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        let result = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|err| {
                Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
            })?
        };

        Ok(Response {
            status: status.as_u16(),
            headers: response_headers,
            request_id: Some(request_id),
            result,
        })
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized(format!("Morpheus authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Morpheus temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => Error::ServerError {
            status: status.as_u16(),
            message: text,
        },
        _ => Error::HttpError(format!("Morpheus error {status}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{
        body_json, body_string_contains, header, header_exists, header_regex, method, path,
        query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_executor(server: &MockServer) -> Executor {
        Executor::new(server.uri()).unwrap()
    }

    #[test]
    fn method_conversions() {
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::Post), reqwest::Method::POST);
        assert_eq!(Method::default(), Method::Get);
    }

    #[test]
    fn request_builders() {
        let request = Request::post("/api/things")
            .with_query("name", "a")
            .with_header("X-Trace", "1")
            .with_body(&json!({"thing": {"name": "a"}}))
            .unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/api/things");
        assert_eq!(request.query_params.get("name").map(String::as_str), Some("a"));
        assert_eq!(request.body, Some(json!({"thing": {"name": "a"}})));
        assert!(!request.is_multipart);

        let upload = Request::post("/api/things/1/image")
            .with_files(vec![FilePayload::new("file", "logo.png", &b"png"[..])]);
        assert!(upload.is_multipart);
        assert_eq!(upload.multipart_files.len(), 1);
        assert!(upload.body.is_none());
    }

    #[test]
    fn file_payload_content_type() {
        let file = FilePayload::new("logo", "logo.svg", "<svg/>").with_content_type("image/svg+xml");
        assert_eq!(file.content, Bytes::from_static(b"<svg/>"));
        assert_eq!(file.content_type.as_deref(), Some("image/svg+xml"));
    }

    #[test]
    fn decode_keeps_metadata() {
        let mut response = Response::new(201, json!({"count": 3}));
        response.request_id = Some("abc".to_string());

        #[derive(serde::Deserialize)]
        struct Count {
            count: u32,
        }

        let decoded: Response<Count> = response.decode().unwrap();
        assert_eq!(decoded.status, 201);
        assert_eq!(decoded.request_id.as_deref(), Some("abc"));
        assert_eq!(decoded.into_result().count, 3);
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let response = Response::new(200, json!("not an object"));
        let err = response.decode::<BTreeMap<String, String>>().unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn builder_keeps_base_sub_path() {
        let executor = Executor::new("https://morpheus.example.com/portal").unwrap();
        assert_eq!(executor.base_url().as_str(), "https://morpheus.example.com/portal/");
        let url = executor.build_url("/api/blueprints/4").unwrap();
        assert_eq!(
            url.as_str(),
            "https://morpheus.example.com/portal/api/blueprints/4"
        );
    }

    #[test]
    fn builder_rejects_invalid_url() {
        assert!(matches!(
            Executor::new("not a url"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn from_config_carries_token() {
        let config = MorpheusConfig::new("https://morpheus.example.com")
            .unwrap()
            .with_access_token("tok");
        let executor = Executor::from_config(&config).unwrap();
        assert!(format!("{executor:?}").contains("authenticated: true"));
        assert!(!format!("{executor:?}").contains("tok\""));
    }

    #[test]
    fn from_config_rejects_out_of_range_timeout() {
        let config: MorpheusConfig = serde_json::from_value(json!({
            "url": "https://morpheus.example.com",
            "request_timeout_secs": 0
        }))
        .unwrap();

        assert!(matches!(
            ExecutorBuilder::from_config(&config),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            Executor::from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn from_config_rejects_invalid_url() {
        let config: MorpheusConfig =
            serde_json::from_value(json!({"url": "not a url"})).unwrap();
        assert!(matches!(
            Executor::from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn get_sends_query_and_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things"))
            .and(query_param("name", "web"))
            .and(header("Accept", "application/json"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header_exists("X-Request-Id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"things": []})))
            .expect(1)
            .mount(&server)
            .await;

        let executor = ExecutorBuilder::new(server.uri())
            .unwrap()
            .with_access_token("secret-token")
            .build()
            .unwrap();

        let response = executor
            .execute_value(Request::get("/api/things").with_query("name", "web"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert!(response.request_id.is_some());
        assert_eq!(response.result, json!({"things": []}));
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/things"))
            .and(body_json(json!({"thing": {"name": "a"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let executor = test_executor(&server);
        let request = Request::post("/api/things").with_json(json!({"thing": {"name": "a"}}));
        let response: Response<crate::types::StandardResult> =
            executor.execute(request).await.unwrap();
        assert!(response.result.success);
    }

    #[tokio::test]
    async fn multipart_sends_files_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/things/1/image"))
            .and(header_regex("content-type", "^multipart/form-data; boundary=.+$"))
            .and(body_string_contains("name=\"templateImage\""))
            .and(body_string_contains("filename=\"logo.png\""))
            .and(body_string_contains("PNGDATA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let executor = test_executor(&server);
        let request = Request::post("/api/things/1/image")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_json(json!({"ignored": true}))
            .with_files(vec![FilePayload::new(
                "templateImage",
                "logo.png",
                &b"PNGDATA"[..],
            )
            .with_content_type("image/png")]);

        let response = executor.execute_value(request).await.unwrap();
        assert_eq!(response.result["success"], true);
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/things/9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let executor = test_executor(&server);
        let response: Response<Option<Value>> =
            executor.execute(Request::delete("/api/things/9")).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn not_found_maps_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let executor = test_executor(&server);
        let err = executor
            .execute_value(Request::get("/api/things/404"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let server = MockServer::start().await;
        for (status, route) in [(401, "/a"), (409, "/b"), (500, "/c"), (503, "/d"), (418, "/e")] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;
        }

        let executor = test_executor(&server);
        let err = executor.execute_value(Request::get("/a")).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        let err = executor.execute_value(Request::get("/b")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = executor.execute_value(Request::get("/c")).await.unwrap_err();
        assert_eq!(
            err,
            Error::ServerError {
                status: 500,
                message: "nope".to_string()
            }
        );
        let err = executor.execute_value(Request::get("/d")).await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
        let err = executor.execute_value(Request::get("/e")).await.unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let executor = test_executor(&server);
        let err = executor
            .execute_value(Request::get("/api/things"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn mock_executor_returns_canned_response() {
        let mut mock = MockRequestExecutor::new();
        mock.expect_execute_value()
            .withf(|request| request.method == Method::Get && request.path == "/api/things")
            .times(1)
            .returning(|_| Ok(Response::new(200, json!({"ok": true}))));

        let response = mock.execute_value(Request::get("/api/things")).await.unwrap();
        assert_eq!(response.result["ok"], true);
    }
}
