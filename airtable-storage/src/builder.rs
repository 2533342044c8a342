use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::{IntoUrl, Url};
use slog::{Logger, o};

use crate::AirtableClientResult;
use crate::client::AirtableClient;
use crate::error::AirtableClientError;
use crate::logging::LoggerExtensions;
use crate::secret::ApiKey;

/// Version segment of the Airtable REST API routes.
const API_VERSION_SEGMENT: &str = "v0";

/// A builder of [AirtableClient]
pub struct AirtableClientBuilder {
    endpoint_result: reqwest::Result<Url>,
    base_id: String,
    api_key: ApiKey,
    timeout: Option<Duration>,
    logger: Option<Logger>,
}

impl AirtableClientBuilder {
    /// Constructs a new `AirtableClientBuilder`.
    //
    // This is the same as `AirtableClient::builder()`.
    pub fn new<U: IntoUrl, B: Into<String>>(endpoint: U, base_id: B) -> Self {
        Self {
            endpoint_result: endpoint.into_url(),
            base_id: base_id.into(),
            api_key: ApiKey::default(),
            timeout: None,
            logger: None,
        }
    }

    /// Set the key sent as bearer token.
    pub fn with_api_key<K: Into<ApiKey>>(mut self, api_key: K) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the timeout applied to each request.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the [Logger] to use.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns an [AirtableClient] based on the builder configuration
    pub fn build(self) -> AirtableClientResult<AirtableClient> {
        let endpoint = self
            .endpoint_result
            .with_context(|| "Invalid Airtable endpoint, it must be a correctly formed url")
            .map_err(AirtableClientError::InvalidEndpoint)?;
        let base_endpoint = base_endpoint(endpoint, &self.base_id)?;
        let logger = self
            .logger
            .unwrap_or_else(|| Logger::root(slog::Discard, o!()))
            .new_with_component_name::<AirtableClient>();

        let mut client_builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder
            .build()
            .map_err(|e| AirtableClientError::HttpClientCreation(anyhow!(e)))?;

        Ok(AirtableClient {
            base_endpoint,
            api_key: self.api_key,
            client,
            logger,
        })
    }
}

/// Append the API version and the base id to the path of the endpoint.
fn base_endpoint(endpoint: Url, base_id: &str) -> AirtableClientResult<Url> {
    let mut url = endpoint;
    url.path_segments_mut()
        .map_err(|_| {
            AirtableClientError::InvalidEndpoint(anyhow!(
                "Invalid Airtable endpoint, it can not be used as a base url"
            ))
        })?
        .pop_if_empty()
        .push(API_VERSION_SEGMENT)
        .push(base_id);

    Ok(url)
}
