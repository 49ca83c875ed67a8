use crate::transport::{HttpTransport, ResourceRequest, Transport};
use crate::types::{Collection, HomePage, ImageRef, PageSummary};
use crate::validate;
use crate::{ApiConfig, Error, Result};
use tracing::debug;

/// Maps resource descriptors onto API requests and validates the replies.
///
/// Holds no cached state; every call issues exactly one request through the
/// underlying [`Transport`] and performs no retries.
pub struct ResourceClient<T> {
    transport: T,
    home_page_type: String,
}

impl ResourceClient<HttpTransport> {
    /// Creates a client backed by [`HttpTransport`]
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_home_page_type(transport, config.home_page_type.clone()))
    }
}

impl<T: Transport> ResourceClient<T> {
    /// Creates a client over any transport, looking up the home page by the
    /// default `home.HomePage` type
    pub fn new(transport: T) -> Self {
        Self::with_home_page_type(transport, ApiConfig::default().home_page_type)
    }

    /// Creates a client that locates the home page by a custom page type
    pub fn with_home_page_type(transport: T, home_page_type: impl Into<String>) -> Self {
        Self {
            transport,
            home_page_type: home_page_type.into(),
        }
    }

    /// The transport requests are issued through
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists pages (`GET pages/`)
    pub async fn list_pages(&self) -> Result<Collection<PageSummary>> {
        let body = self.transport.get(&ResourceRequest::new("pages/")).await?;
        validate::collection(&body, validate::page).into_result()
    }

    /// Fetches a single page by id (`GET pages/{id}/`)
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for `id == 0` (no request is made),
    /// [`Error::NotFound`] when the page does not exist, and
    /// [`Error::MalformedResponse`] when the payload lacks `id` or `title`.
    pub async fn get_page(&self, id: u64) -> Result<PageSummary> {
        if id == 0 {
            return Err(Error::InvalidRequest("page id must be positive".to_string()));
        }
        let body = self
            .transport
            .get(&ResourceRequest::new(format!("pages/{id}/")))
            .await?;
        validate::page(&body).into_result()
    }

    /// Fetches the home page: the first page of the configured home page type,
    /// with all fields expanded (`GET pages/?type=..&fields=*`)
    ///
    /// # Errors
    ///
    /// [`Error::NoHomePage`] when the listing is empty and
    /// [`Error::MalformedResponse`] when it or its first item has the wrong shape.
    pub async fn get_home_page(&self) -> Result<HomePage> {
        let request = ResourceRequest::new("pages/")
            .with_query("type", self.home_page_type.as_str())
            .with_query("fields", "*");
        let body = self.transport.get(&request).await?;

        let listing = validate::envelope(&body).into_result()?;
        let Some(first) = listing.items.first() else {
            debug!("No pages of type {} returned", self.home_page_type);
            return Err(Error::NoHomePage);
        };
        validate::home_page(first).into_result()
    }

    /// Lists images (`GET images/`)
    pub async fn list_images(&self) -> Result<Collection<ImageRef>> {
        let body = self.transport.get(&ResourceRequest::new("images/")).await?;
        validate::collection(&body, validate::image).into_result()
    }
}
