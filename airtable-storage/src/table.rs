use std::sync::Arc;

use async_trait::async_trait;

use crate::query::{
    CreateRecordQuery, DeleteRecordQuery, GetRecordQuery, ListRecordsQuery, UpdateRecordQuery,
};
use crate::{
    AirtableClient, AirtableClientResult, DeletedRecord, Fields, FilterFormula, Record, RecordPage,
};

/// The operations of a remote table the storage operations are built upon.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteTable: Sync + Send {
    /// Records of the first page matching the formula.
    async fn query_first_page(
        &self,
        page_size: u32,
        formula: &FilterFormula,
    ) -> AirtableClientResult<Vec<Record>>;

    /// One page of all the records, `None` offset meaning the first page.
    async fn query_page(
        &self,
        page_size: u32,
        offset: Option<String>,
    ) -> AirtableClientResult<RecordPage>;

    /// Record with the given remote key, `None` if it does not exist.
    async fn find_record(&self, remote_key: &str) -> AirtableClientResult<Option<Record>>;

    /// Create a record with the given fields.
    async fn create_record(&self, fields: Fields) -> AirtableClientResult<Record>;

    /// Update the given fields of the record with the given remote key.
    async fn update_record(
        &self,
        remote_key: &str,
        fields: Fields,
    ) -> AirtableClientResult<Record>;

    /// Delete the record with the given remote key.
    async fn delete_record(&self, remote_key: &str) -> AirtableClientResult<DeletedRecord>;
}

/// [RemoteTable] backed by the Airtable REST API.
pub struct AirtableTable {
    client: Arc<AirtableClient>,
    name: String,
}

impl AirtableTable {
    /// Open the table with the given name, no request is sent.
    pub fn new<T: Into<String>>(client: Arc<AirtableClient>, name: T) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    /// Name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl RemoteTable for AirtableTable {
    async fn query_first_page(
        &self,
        page_size: u32,
        formula: &FilterFormula,
    ) -> AirtableClientResult<Vec<Record>> {
        let page = self
            .client
            .send(ListRecordsQuery::first_page(
                &self.name,
                page_size,
                formula.clone(),
            ))
            .await?;

        Ok(page.records)
    }

    async fn query_page(
        &self,
        page_size: u32,
        offset: Option<String>,
    ) -> AirtableClientResult<RecordPage> {
        self.client
            .send(ListRecordsQuery::page(&self.name, page_size, offset))
            .await
    }

    async fn find_record(&self, remote_key: &str) -> AirtableClientResult<Option<Record>> {
        self.client.send(GetRecordQuery::by_key(&self.name, remote_key)).await
    }

    async fn create_record(&self, fields: Fields) -> AirtableClientResult<Record> {
        self.client.send(CreateRecordQuery::new(&self.name, fields)).await
    }

    async fn update_record(
        &self,
        remote_key: &str,
        fields: Fields,
    ) -> AirtableClientResult<Record> {
        self.client
            .send(UpdateRecordQuery::new(&self.name, remote_key, fields))
            .await
    }

    async fn delete_record(&self, remote_key: &str) -> AirtableClientResult<DeletedRecord> {
        self.client.send(DeleteRecordQuery::new(&self.name, remote_key)).await
    }
}
