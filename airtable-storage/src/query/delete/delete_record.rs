use async_trait::async_trait;
use reqwest::StatusCode;
use slog::debug;

use crate::query::{AirtableQuery, QueryContext, QueryMethod, ResponseExt};
use crate::{AirtableClientResult, DeletedRecord};

/// Query to delete a record by its remote key.
pub struct DeleteRecordQuery {
    table_name: String,
    record_id: String,
}

impl DeleteRecordQuery {
    /// Instantiate a new query to delete the record with the given remote key
    pub fn new<T: Into<String>, K: Into<String>>(table_name: T, record_id: K) -> Self {
        Self {
            table_name: table_name.into(),
            record_id: record_id.into(),
        }
    }
}

#[async_trait]
impl AirtableQuery for DeleteRecordQuery {
    type Response = DeletedRecord;
    type Body = ();

    fn method() -> QueryMethod {
        QueryMethod::Delete
    }

    fn route(&self) -> Vec<String> {
        vec![self.table_name.clone(), self.record_id.clone()]
    }

    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response> {
        debug!(
            context.logger, "/DELETE: Record";
            "table" => &self.table_name, "record_id" => &self.record_id
        );

        match context.response.status() {
            StatusCode::OK => context.response.parse_json().await,
            _ => Err(context.unhandled_status_code().await),
        }
    }
}
