//! Asynchronous Director client implementation.

use crate::models::{
    associated_galleries_options, AlbumListParams, AlbumParams, ContentListParams, GalleryParams,
    UserListParams,
};
use crate::Result;
use director_core::client::{ApiRequest, HttpTransport, Transport};
use director_core::config::{ApiKey, ApiPath, DirectorConfig, InstallType};
use director_core::envelope::{self, take_field};
use director_core::format::{FormatRegistry, FormatSpec, Rendition};
use director_core::query::{IdList, QueryOptions};
use director_core::Error;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::debug;

/// Builder for [`DirectorClient`].
#[derive(Clone)]
pub struct DirectorClientBuilder {
    api_key: ApiKey,
    api_path: ApiPath,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for DirectorClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorClientBuilder")
            .field("api_key", &self.api_key)
            .field("api_path", &self.api_path)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl DirectorClientBuilder {
    /// Create a builder from an API key and install path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or path is invalid.
    pub fn new(api_key: &str, api_path: &str) -> Result<Self> {
        Ok(Self {
            api_key: ApiKey::parse(api_key)?,
            api_path: ApiPath::parse(api_path)?,
            transport: None,
        })
    }

    /// Create a builder from a [`DirectorConfig`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or path is invalid.
    pub fn from_config(config: &DirectorConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.parse_api_key()?,
            api_path: config.parse_api_path()?,
            transport: None,
        })
    }

    /// Use a custom transport instead of the default reqwest one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the default HTTP client cannot be built.
    pub fn build(self) -> Result<DirectorClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let base_path = self.api_path.base_path(self.api_key.install());
        debug!(%base_path, install = %self.api_key.install(), "Built Director client");

        Ok(DirectorClient {
            api_key: self.api_key,
            base_path,
            transport,
            formats: RwLock::new(FormatRegistry::new()),
        })
    }
}

/// Asynchronous client for a Director install.
///
/// Formats registered on a client are sent with every request that client
/// makes, until [`DirectorClient::clear_formats`] is called.
pub struct DirectorClient {
    api_key: ApiKey,
    base_path: String,
    transport: Arc<dyn Transport>,
    formats: RwLock<FormatRegistry>,
}

impl std::fmt::Debug for DirectorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorClient")
            .field("api_key", &self.api_key)
            .field("base_path", &self.base_path)
            .field("formats", &*self.read_formats())
            .finish_non_exhaustive()
    }
}

impl DirectorClient {
    /// Construct a client directly from an API key and install path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or path is invalid.
    pub fn new(api_key: &str, api_path: &str) -> Result<Self> {
        DirectorClientBuilder::new(api_key, api_path)?.build()
    }

    /// Construct a client from a [`DirectorConfig`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid.
    pub fn from_config(config: &DirectorConfig) -> Result<Self> {
        DirectorClientBuilder::from_config(config)?.build()
    }

    /// Start a builder.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or path is invalid.
    pub fn builder(api_key: &str, api_path: &str) -> Result<DirectorClientBuilder> {
        DirectorClientBuilder::new(api_key, api_path)
    }

    /// Install type taken from the API key.
    #[must_use]
    pub fn install(&self) -> InstallType {
        self.api_key.install()
    }

    /// Base path every endpoint is appended to.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // ------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------

    /// Version of the API the install is running.
    pub async fn get_version(&self) -> Result<String> {
        let version = take_field(self.get("app_version", QueryOptions::new()).await?, "version")?;
        match version {
            Value::String(version) => Ok(version),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(Error::MalformedPayload(format!(
                "`version` is not a string: {other}"
            ))),
        }
    }

    /// Upload limits of the install.
    pub async fn get_limits(&self) -> Result<Value> {
        self.get("app_limits", QueryOptions::new()).await
    }

    /// Object counts and aggregate file size of the install.
    pub async fn get_totals(&self) -> Result<Value> {
        self.get("app_totals", QueryOptions::new()).await
    }

    // ------------------------------------------------------------------
    // Galleries
    // ------------------------------------------------------------------

    /// Every gallery with its member albums (album content not included).
    pub async fn get_galleries(&self) -> Result<Value> {
        let data = self.get("get_gallery_list", QueryOptions::new()).await?;
        take_field(data, "galleries")
    }

    /// One gallery with its member albums.
    pub async fn get_gallery(&self, gallery_id: u64, params: &GalleryParams) -> Result<Value> {
        self.get("get_gallery", params.to_options(gallery_id)).await
    }

    // ------------------------------------------------------------------
    // Albums
    // ------------------------------------------------------------------

    /// Every album matching the filters.
    pub async fn get_albums(&self, params: &AlbumListParams) -> Result<Value> {
        let data = self.get("get_album_list", params.to_options()).await?;
        take_field(data, "albums")
    }

    /// One album with its content.
    pub async fn get_album(&self, album_id: u64, params: &AlbumParams) -> Result<Value> {
        self.get("get_album", params.to_options(album_id)).await
    }

    /// Galleries the album belongs to, minus the excluded ones.
    pub async fn get_galleries_by_album(
        &self,
        album_id: u64,
        exclude: impl Into<IdList>,
    ) -> Result<Value> {
        let options = associated_galleries_options(album_id, &exclude.into());
        let data = self.get("get_associated_galleries", options).await?;
        take_field(data, "galleries")
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Every content item matching the filters.
    pub async fn get_contents(&self, params: &ContentListParams) -> Result<Value> {
        let data = self.get("get_content_list", params.to_options()).await?;
        take_field(data, "contents")
    }

    /// Alias of [`DirectorClient::get_contents`].
    pub async fn get_images(&self, params: &ContentListParams) -> Result<Value> {
        self.get_contents(params).await
    }

    /// One content item.
    pub async fn get_content(&self, content_id: u64) -> Result<Value> {
        let mut options = QueryOptions::new();
        options.insert("content_id", content_id);
        self.get("get_content", options).await
    }

    /// Alias of [`DirectorClient::get_content`].
    pub async fn get_image(&self, content_id: u64) -> Result<Value> {
        self.get_content(content_id).await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Every user matching the filters.
    pub async fn get_users(&self, params: &UserListParams) -> Result<Value> {
        let data = self.get("get_users", params.to_options()).await?;
        take_field(data, "users")
    }

    // ------------------------------------------------------------------
    // Formats
    // ------------------------------------------------------------------

    /// Register a content size sent with every subsequent request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn add_format(&self, spec: FormatSpec) -> Result<()> {
        self.write_formats().add_size(spec)
    }

    /// Register a user avatar size sent with every subsequent request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn add_user_format(&self, spec: FormatSpec) -> Result<()> {
        self.write_formats().add_user_size(spec)
    }

    /// Set the preview format, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality is above 100.
    pub fn set_preview_format(&self, rendition: Rendition) -> Result<()> {
        self.write_formats().set_preview(rendition)
    }

    /// Remove every registered format.
    pub fn clear_formats(&self) {
        self.write_formats().clear();
    }

    /// Snapshot of the registered formats.
    #[must_use]
    pub fn formats(&self) -> FormatRegistry {
        self.read_formats().clone()
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    /// Enable response caching under `key`.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn set_cache(&self, key: &str, expire: Option<Duration>) -> Result<()> {
        Err(Error::NotImplemented(format!(
            "set_cache (key `{key}`, expire {expire:?})"
        )))
    }

    /// Disable response caching.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn disable_cache(&self) -> Result<()> {
        Err(Error::NotImplemented("disable_cache".to_string()))
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Build the request for `scope`, merging in the registered formats.
    #[must_use]
    pub fn build_request(&self, scope: &str, mut options: QueryOptions) -> ApiRequest {
        self.read_formats().apply_to(&mut options);
        ApiRequest::new(&self.base_path, scope, &options)
    }

    async fn get(&self, scope: &str, options: QueryOptions) -> Result<Value> {
        let request = self.build_request(scope, options);
        debug!(scope, url = %request, "Requesting Director endpoint");

        let body = self.transport.get(&request).await?;
        envelope::decode(&body)
    }

    fn read_formats(&self) -> RwLockReadGuard<'_, FormatRegistry> {
        self.formats.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_formats(&self) -> RwLockWriteGuard<'_, FormatRegistry> {
        self.formats.write().unwrap_or_else(PoisonError::into_inner)
    }
}
