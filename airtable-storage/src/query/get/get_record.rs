use async_trait::async_trait;
use reqwest::StatusCode;
use slog::debug;

use crate::error::ErrorResponse;
use crate::query::{AirtableQuery, QueryContext, QueryMethod, ResponseExt};
use crate::{AirtableClientResult, Record};

/// Error code of a 404 caused by a missing record, a missing table has its own code.
const RECORD_NOT_FOUND_CODE: &str = "NOT_FOUND";

/// Query to get a record by its remote key
pub struct GetRecordQuery {
    table_name: String,
    record_id: String,
}

impl GetRecordQuery {
    /// Instantiate a query to get the record with the given remote key
    pub fn by_key<T: Into<String>, K: Into<String>>(table_name: T, record_id: K) -> Self {
        Self {
            table_name: table_name.into(),
            record_id: record_id.into(),
        }
    }
}

#[async_trait]
impl AirtableQuery for GetRecordQuery {
    type Response = Option<Record>;
    type Body = ();

    fn method() -> QueryMethod {
        QueryMethod::Get
    }

    fn route(&self) -> Vec<String> {
        vec![self.table_name.clone(), self.record_id.clone()]
    }

    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response> {
        debug!(
            context.logger, "/GET: Record";
            "table" => &self.table_name, "record_id" => &self.record_id
        );

        match context.response.status() {
            StatusCode::OK => context.response.parse_json().await.map(Some),
            StatusCode::NOT_FOUND => {
                let error_response = ErrorResponse::read(context.response).await;
                match error_response.airtable_error_code().as_deref() {
                    Some(RECORD_NOT_FOUND_CODE) => Ok(None),
                    _ => Err(error_response.into()),
                }
            }
            _ => Err(context.unhandled_status_code().await),
        }
    }
}
