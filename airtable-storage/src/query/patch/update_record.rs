use async_trait::async_trait;
use reqwest::StatusCode;

use crate::query::{
    AirtableQuery, QueryContext, QueryLogFields, QueryMethod, RecordFieldsMessage, ResponseExt,
};
use crate::{AirtableClientResult, Fields, Record};

/// Query to update some fields of a record, the other fields are left untouched.
pub struct UpdateRecordQuery {
    table_name: String,
    record_id: String,
    message: RecordFieldsMessage,
}

impl UpdateRecordQuery {
    /// Instantiate a new query to update the record with the given remote key
    pub fn new<T: Into<String>, K: Into<String>>(
        table_name: T,
        record_id: K,
        fields: Fields,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            record_id: record_id.into(),
            message: RecordFieldsMessage { fields },
        }
    }
}

#[async_trait]
impl AirtableQuery for UpdateRecordQuery {
    type Response = Record;
    type Body = RecordFieldsMessage;

    fn method() -> QueryMethod {
        QueryMethod::Patch
    }

    fn route(&self) -> Vec<String> {
        vec![self.table_name.clone(), self.record_id.clone()]
    }

    fn body(&self) -> Option<Self::Body> {
        Some(self.message.clone())
    }

    fn entry_log_additional_fields(&self) -> QueryLogFields {
        QueryLogFields::from([
            ("record_id", self.record_id.clone()),
            ("fields_count", self.message.fields.len().to_string()),
        ])
    }

    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response> {
        match context.response.status() {
            StatusCode::OK => context.response.parse_json().await,
            _ => Err(context.unhandled_status_code().await),
        }
    }
}
