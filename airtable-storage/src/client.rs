use anyhow::anyhow;
use reqwest::{IntoUrl, Url};
use slog::{Logger, debug};

use crate::AirtableClientResult;
use crate::builder::AirtableClientBuilder;
use crate::error::AirtableClientError;
use crate::query::{AirtableQuery, QueryContext, QueryMethod};
use crate::secret::ApiKey;

/// HTTP client of the Airtable REST API, scoped to one base.
pub struct AirtableClient {
    pub(super) base_endpoint: Url,
    pub(super) api_key: ApiKey,
    pub(super) client: reqwest::Client,
    pub(super) logger: Logger,
}

impl AirtableClient {
    /// Creates a [AirtableClientBuilder] to configure a `AirtableClient`.
    //
    // This is the same as `AirtableClientBuilder::new()`.
    pub fn builder<U: IntoUrl, B: Into<String>>(endpoint: U, base_id: B) -> AirtableClientBuilder {
        AirtableClientBuilder::new(endpoint, base_id)
    }

    /// Url of the base, all query routes are relative to it.
    pub fn base_endpoint(&self) -> &Url {
        &self.base_endpoint
    }

    /// Send the query and handle its response.
    pub async fn send<Q: AirtableQuery>(&self, query: Q) -> AirtableClientResult<Q::Response> {
        let url = self.join_base_endpoint(&query.route())?;
        debug!(
            self.logger, "Sending query";
            "method" => %Q::method(), "url" => %url, query.entry_log_additional_fields()
        );

        let mut request_builder = match Q::method() {
            QueryMethod::Get => self.client.get(url),
            QueryMethod::Post => self.client.post(url),
            QueryMethod::Patch => self.client.patch(url),
            QueryMethod::Delete => self.client.delete(url),
        }
        .bearer_auth(self.api_key.expose_secret());

        let parameters = query.query_parameters();
        if !parameters.is_empty() {
            request_builder = request_builder.query(&parameters);
        }

        if let Some(body) = query.body() {
            request_builder = request_builder.json(&body);
        }

        match request_builder.send().await {
            Ok(response) => {
                let context = QueryContext {
                    response,
                    logger: self.logger.clone(),
                };
                query.handle_response(context).await
            }
            Err(err) => Err(AirtableClientError::RemoteServerUnreachable(anyhow!(err))),
        }
    }

    fn join_base_endpoint(&self, segments: &[String]) -> AirtableClientResult<Url> {
        let mut url = self.base_endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AirtableClientError::InvalidEndpoint(anyhow!(
                    "Airtable url '{}' cannot have path segments",
                    self.base_endpoint
                ))
            })?
            .extend(segments);

        Ok(url)
    }
}
