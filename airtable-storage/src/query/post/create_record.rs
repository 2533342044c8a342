use async_trait::async_trait;
use reqwest::StatusCode;

use crate::query::{
    AirtableQuery, QueryContext, QueryLogFields, QueryMethod, RecordFieldsMessage, ResponseExt,
};
use crate::{AirtableClientResult, Fields, Record};

/// Query to create a record in a table.
pub struct CreateRecordQuery {
    table_name: String,
    message: RecordFieldsMessage,
}

impl CreateRecordQuery {
    /// Instantiate a new query to create a record with the given fields
    pub fn new<T: Into<String>>(table_name: T, fields: Fields) -> Self {
        Self {
            table_name: table_name.into(),
            message: RecordFieldsMessage { fields },
        }
    }
}

#[async_trait]
impl AirtableQuery for CreateRecordQuery {
    type Response = Record;
    type Body = RecordFieldsMessage;

    fn method() -> QueryMethod {
        QueryMethod::Post
    }

    fn route(&self) -> Vec<String> {
        vec![self.table_name.clone()]
    }

    fn body(&self) -> Option<Self::Body> {
        Some(self.message.clone())
    }

    fn entry_log_additional_fields(&self) -> QueryLogFields {
        QueryLogFields::from([("fields_count", self.message.fields.len().to_string())])
    }

    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response> {
        match context.response.status() {
            StatusCode::OK | StatusCode::CREATED => context.response.parse_json().await,
            _ => Err(context.unhandled_status_code().await),
        }
    }
}
