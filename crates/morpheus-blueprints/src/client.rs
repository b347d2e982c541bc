//! Asynchronous Blueprints client implementation.

use crate::models::{
    BlueprintListParams, CreateBlueprintResult, DeleteBlueprintResult, GetBlueprintResult,
    ListBlueprintsResult, UpdateBlueprintResult,
};
use crate::Result;
use morpheus_core::client::HttpConfig;
use morpheus_core::executor::{
    ExecutorBuilder, FilePayload, Request, RequestExecutor, Response,
};
use morpheus_core::id::BlueprintId;
use morpheus_core::{Error, MorpheusConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// API endpoint for blueprints.
pub const BLUEPRINTS_PATH: &str = "/api/blueprints";

const USER_AGENT: &str = concat!("morpheus-blueprints/", env!("CARGO_PKG_VERSION"));

/// Builder for [`BlueprintsClient`].
#[derive(Debug, Clone)]
pub struct BlueprintsClientBuilder {
    inner: ExecutorBuilder,
}

impl BlueprintsClientBuilder {
    /// Create a builder for the specified appliance URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ExecutorBuilder::new(base_url)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Create a builder from a [`MorpheusConfig`].
    pub fn from_config(config: &MorpheusConfig) -> Result<Self> {
        let mut builder = ExecutorBuilder::from_config(config)?;
        if config.user_agent.is_none() {
            builder = builder.with_user_agent(USER_AGENT);
        }
        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure the bearer access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_access_token(token);
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner = self.inner.with_user_agent(user_agent);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BlueprintsClient> {
        let executor = self.inner.build()?;
        Ok(BlueprintsClient::with_executor(Arc::new(executor)))
    }
}

/// Asynchronous client for the Blueprints resource.
///
/// Every method performs exactly one request, except
/// [`find_blueprint_by_name`](Self::find_blueprint_by_name) which lists and
/// then fetches.
#[derive(Clone)]
pub struct BlueprintsClient {
    executor: Arc<dyn RequestExecutor>,
}

impl BlueprintsClient {
    /// Construct a client directly from the appliance URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        BlueprintsClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a [`MorpheusConfig`].
    pub fn from_config(config: &MorpheusConfig) -> Result<Self> {
        BlueprintsClientBuilder::from_config(config)?.build()
    }

    /// Construct a client over an existing executor.
    #[must_use]
    pub fn with_executor(executor: Arc<dyn RequestExecutor>) -> Self {
        Self { executor }
    }

    /// List blueprints matching the given filters.
    pub async fn list_blueprints(
        &self,
        params: &BlueprintListParams,
    ) -> Result<Response<ListBlueprintsResult>> {
        self.list_blueprints_raw(params.to_query()).await
    }

    /// List blueprints, forwarding `query` unchanged.
    pub async fn list_blueprints_raw(
        &self,
        query: BTreeMap<String, String>,
    ) -> Result<Response<ListBlueprintsResult>> {
        self.execute(Request::get(BLUEPRINTS_PATH).with_query_params(query))
            .await
    }

    /// Fetch a single blueprint by id.
    pub async fn get_blueprint(&self, id: BlueprintId) -> Result<Response<GetBlueprintResult>> {
        self.execute(Request::get(blueprint_path(id))).await
    }

    /// Create a blueprint. `body` is sent as-is, typically a
    /// [`BlueprintPayload`](crate::models::BlueprintPayload).
    pub async fn create_blueprint<B>(&self, body: &B) -> Result<Response<CreateBlueprintResult>>
    where
        B: Serialize + ?Sized,
    {
        let request = Request::post(BLUEPRINTS_PATH).with_body(body)?;
        debug!(path = BLUEPRINTS_PATH, "Creating blueprint");
        self.execute(request).await
    }

    /// Update an existing blueprint.
    pub async fn update_blueprint<B>(
        &self,
        id: BlueprintId,
        body: &B,
    ) -> Result<Response<UpdateBlueprintResult>>
    where
        B: Serialize + ?Sized,
    {
        let request = Request::put(blueprint_path(id)).with_body(body)?;
        self.execute(request).await
    }

    /// Upload a new logo for a blueprint as a multipart form.
    pub async fn update_blueprint_logo(
        &self,
        id: BlueprintId,
        files: Vec<FilePayload>,
    ) -> Result<Response<UpdateBlueprintResult>> {
        let path = format!("{}/image", blueprint_path(id));
        self.execute(Request::post(path).with_files(files)).await
    }

    /// Delete a blueprint.
    ///
    /// A 2xx reply with no body (e.g. `204 No Content`) counts as success.
    pub async fn delete_blueprint(
        &self,
        id: BlueprintId,
    ) -> Result<Response<DeleteBlueprintResult>> {
        let mut response = self
            .executor
            .execute_value(Request::delete(blueprint_path(id)))
            .await?;
        if response.result.is_null() {
            debug!(%id, status = response.status, "Empty delete reply");
            response.result = json!({ "success": true });
        }
        response.decode()
    }

    /// Find the single blueprint with the given name and fetch it in full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameLookup`] when zero or several blueprints carry
    /// the name; no fetch is made in that case.
    pub async fn find_blueprint_by_name(
        &self,
        name: &str,
    ) -> Result<Response<GetBlueprintResult>> {
        let mut query = BTreeMap::new();
        query.insert("name".to_string(), name.to_string());

        let listed = self.list_blueprints_raw(query).await?;
        let matches = &listed.result.blueprints;
        debug!(name, count = matches.len(), "Blueprint name lookup");

        match matches.as_slice() {
            [only] => self.get_blueprint(only.id).await,
            _ => Err(Error::NameLookup {
                resource: "Blueprints".to_string(),
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    async fn execute<R>(&self, request: Request) -> Result<Response<R>>
    where
        R: DeserializeOwned,
    {
        self.executor.execute_value(request).await?.decode()
    }
}

fn blueprint_path(id: BlueprintId) -> String {
    format!("{BLUEPRINTS_PATH}/{id}")
}
