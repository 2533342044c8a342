use anyhow::anyhow;
use reqwest::Response;
use serde::de::DeserializeOwned;
use slog::{Logger, Record, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::AirtableClientResult;
use crate::error::AirtableClientError;

/// HTTP method of an [AirtableQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    /// Read records
    Get,
    /// Create a record
    Post,
    /// Partially update a record
    Patch,
    /// Delete a record
    Delete,
}

impl Display for QueryMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMethod::Get => write!(f, "GET"),
            QueryMethod::Post => write!(f, "POST"),
            QueryMethod::Patch => write!(f, "PATCH"),
            QueryMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request to the Airtable API, scoped to the base of the client that sends it.
#[async_trait::async_trait]
pub trait AirtableQuery {
    /// Value produced from a successful response.
    type Response: DeserializeOwned;
    /// JSON body sent with the request.
    type Body: serde::Serialize + Sized;

    /// HTTP method of the query.
    fn method() -> QueryMethod;

    /// Path segments under the base endpoint, each segment is percent-encoded when sent.
    fn route(&self) -> Vec<String>;

    /// Url query parameters.
    fn query_parameters(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// JSON body of the request, if any.
    fn body(&self) -> Option<Self::Body> {
        None
    }

    /// Additional key-values added to the log emitted when the query is sent.
    fn entry_log_additional_fields(&self) -> QueryLogFields {
        QueryLogFields::default()
    }

    /// Turn the response into the query result.
    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response>;
}

/// What a query gets to handle its response.
pub struct QueryContext {
    pub(crate) response: Response,
    pub(crate) logger: Logger,
}

impl QueryContext {
    /// Build the error of a response whose status is not handled by the query.
    pub async fn unhandled_status_code(self) -> AirtableClientError {
        AirtableClientError::from_response(self.response).await
    }
}

/// Key-values logged along a query.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QueryLogFields {
    kv: BTreeSet<(&'static str, String)>,
}

impl<const N: usize> From<[(&'static str, String); N]> for QueryLogFields {
    fn from(value: [(&'static str, String); N]) -> Self {
        Self {
            kv: BTreeSet::from(value),
        }
    }
}

impl slog::KV for QueryLogFields {
    fn serialize(&self, _record: &Record, serializer: &mut dyn Serializer) -> slog::Result {
        for (k, v) in &self.kv {
            serializer.emit_arguments(k, &format_args!("{v}"))?;
        }
        Ok(())
    }
}

/// Extension trait for [reqwest::Response] to reduce boilerplate with our library.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Try to deserialize the response body as JSON, wrapping the error in
    /// [AirtableClientError::JsonParseFailed].
    async fn parse_json<T: DeserializeOwned>(self) -> AirtableClientResult<T>;
}

#[async_trait::async_trait]
impl ResponseExt for Response {
    async fn parse_json<T: DeserializeOwned>(self) -> AirtableClientResult<T> {
        self.json()
            .await
            .map_err(|err| AirtableClientError::JsonParseFailed(anyhow!(err)))
    }
}
