use std::sync::Arc;

use serde_json::Value;
use slog::{Logger, debug, warn};

use crate::logging::LoggerExtensions;
use crate::{
    DeletedRecord, Fields, FilterFormula, FilterValue, Record, RemoteTable, StorageError,
    StorageObject, StorageResult,
};

/// Number of records requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Name of the field holding the domain identifier of the stored objects.
pub const DOMAIN_ID_FIELD: &str = "id";

/// Outcome of the lookup step of an upsert.
#[derive(Debug, PartialEq, Eq)]
enum UpsertTarget {
    /// A record already holds the domain id, it is updated through its remote key.
    Existing { remote_key: String },
    /// No record holds the domain id, one is created.
    Missing,
}

/// Storage operations on one table.
#[derive(Clone)]
pub struct RecordAccessor {
    table_name: String,
    table: Arc<dyn RemoteTable>,
    logger: Logger,
}

impl RecordAccessor {
    /// Create an accessor over the given remote table.
    pub fn new<T: Into<String>>(
        table_name: T,
        table: Arc<dyn RemoteTable>,
        logger: Logger,
    ) -> Self {
        let table_name = table_name.into();
        let logger = logger
            .new_with_component_name::<Self>()
            .new_with_table_name(&table_name);

        Self {
            table_name,
            table,
            logger,
        }
    }

    /// Name of the table.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Get the first record whose domain `id` equals the given one.
    pub async fn get(&self, id: &str) -> StorageResult<Option<Record>> {
        require_non_empty(id, "get function requires an id")?;

        self.first_match(&FilterFormula::field_equals(DOMAIN_ID_FIELD, id)).await
    }

    /// Get the first record whose `field` equals `value`.
    ///
    /// `value` must be a JSON scalar: string, number or boolean.
    pub async fn lookup(&self, field: &str, value: &Value) -> StorageResult<Option<Record>> {
        require_non_empty(field, "lookup function requires a field")?;
        if value.is_null() {
            return Err(StorageError::Validation(
                "lookup function requires a value".to_string(),
            ));
        }
        let value = FilterValue::from_json(value).ok_or_else(|| {
            StorageError::Validation(
                "lookup function value must be a string, a number or a boolean".to_string(),
            )
        })?;

        self.first_match(&FilterFormula::field_equals(field, value)).await
    }

    /// Get the record with the given remote key, `None` if there is none.
    pub async fn find(&self, remote_key: &str) -> StorageResult<Option<Record>> {
        require_non_empty(remote_key, "find function requires an id")?;

        Ok(self
            .table
            .find_record(remote_key)
            .await
            .inspect_err(|e| {
                warn!(self.logger, "Find failed"; "remote_key" => remote_key, "error" => ?e)
            })?)
    }

    /// Store the object: update the record holding its `id` if any, otherwise create one.
    ///
    /// The update only sends the data fields, the `id` of an existing record is never rewritten.
    pub async fn save(&self, object: StorageObject) -> StorageResult<Record> {
        let id = domain_id(&object, "save function requires an id")?;

        let record = match self.locate(id).await? {
            UpsertTarget::Existing { remote_key } => {
                debug!(self.logger, "Save: updating existing record"; "remote_key" => &remote_key);
                self.table
                    .update_record(&remote_key, object.into_data_fields())
                    .await
            }
            UpsertTarget::Missing => {
                debug!(self.logger, "Save: creating record");
                self.table.create_record(object.into_fields()).await
            }
        }
        .inspect_err(|e| warn!(self.logger, "Save failed"; "error" => ?e))?;

        Ok(record)
    }

    /// Create a record from the object, which must have an `id`.
    pub async fn create(&self, object: StorageObject) -> StorageResult<Record> {
        domain_id(
            &object,
            "create function requires a unique id for the object to be saved",
        )?;

        Ok(self
            .table
            .create_record(object.into_fields())
            .await
            .inspect_err(|e| warn!(self.logger, "Create failed"; "error" => ?e))?)
    }

    /// Update the given fields of the record with the given remote key.
    pub async fn update(&self, remote_key: &str, fields: Fields) -> StorageResult<Record> {
        require_non_empty(remote_key, "update function requires an id")?;
        if fields.is_empty() {
            return Err(StorageError::Validation(
                "update function requires a payload object".to_string(),
            ));
        }

        Ok(self
            .table
            .update_record(remote_key, fields)
            .await
            .inspect_err(|e| {
                warn!(self.logger, "Update failed"; "remote_key" => remote_key, "error" => ?e)
            })?)
    }

    /// Delete the record with the given remote key.
    pub async fn destroy(&self, id: &str) -> StorageResult<DeletedRecord> {
        require_non_empty(id, "destroy function requires an id")?;

        Ok(self
            .table
            .delete_record(id)
            .await
            .inspect_err(|e| {
                warn!(self.logger, "Destroy failed"; "remote_key" => id, "error" => ?e)
            })?)
    }

    /// All the records of the table, in delivery order.
    ///
    /// Pages are requested one after the other until the last one. If any page fails, the
    /// records already received are dropped and the error is returned.
    pub async fn all(&self) -> StorageResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut offset = None;

        loop {
            let page = self
                .table
                .query_page(PAGE_SIZE, offset)
                .await
                .inspect_err(|e| {
                    warn!(
                        self.logger, "Listing all records failed, received records are discarded";
                        "received_records" => records.len(), "error" => ?e
                    )
                })?;
            records.extend(page.records);

            match page.offset {
                Some(next_offset) => offset = Some(next_offset),
                None => break,
            }
        }
        debug!(self.logger, "Listed all records"; "records" => records.len());

        Ok(records)
    }

    async fn first_match(&self, formula: &FilterFormula) -> StorageResult<Option<Record>> {
        let records = self
            .table
            .query_first_page(PAGE_SIZE, formula)
            .await
            .inspect_err(|e| {
                warn!(self.logger, "Query failed"; "formula" => %formula, "error" => ?e)
            })?;

        Ok(records.into_iter().next())
    }

    async fn locate(&self, id: FilterValue) -> StorageResult<UpsertTarget> {
        let target = match self
            .first_match(&FilterFormula::field_equals(DOMAIN_ID_FIELD, id))
            .await?
        {
            Some(record) => UpsertTarget::Existing {
                remote_key: record.id,
            },
            None => UpsertTarget::Missing,
        };

        Ok(target)
    }
}

fn require_non_empty(value: &str, message: &str) -> StorageResult<()> {
    if value.is_empty() {
        return Err(StorageError::Validation(message.to_string()));
    }

    Ok(())
}

/// Domain id of the object, only non empty strings and numbers are accepted.
fn domain_id(object: &StorageObject, message: &str) -> StorageResult<FilterValue> {
    match object.id() {
        Some(Value::String(id)) if !id.is_empty() => Ok(FilterValue::from(id.as_str())),
        Some(Value::Number(id)) => Ok(FilterValue::Number(id.clone())),
        _ => Err(StorageError::Validation(message.to_string())),
    }
}
