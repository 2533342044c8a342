use std::sync::Arc;

use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::{
    AirtableClient, AirtableTable, RawStorageConfiguration, RecordAccessor, StorageConfiguration,
    StorageError, StorageResult,
};

/// One [RecordAccessor] per configured table, sharing a single [AirtableClient].
pub struct TableRegistry {
    configuration: StorageConfiguration,
    accessors: Vec<RecordAccessor>,
}

impl TableRegistry {
    /// Validate the configuration then build the accessors, in configuration order.
    ///
    /// No request is sent.
    pub fn build(
        configuration: Option<&RawStorageConfiguration>,
        logger: Logger,
    ) -> StorageResult<Self> {
        let configuration = configuration
            .ok_or_else(|| StorageError::Configuration("airtable config is required.".to_string()))?
            .validate()?;

        Self::from_configuration(configuration, logger)
    }

    /// Build the accessors of an already validated configuration.
    ///
    /// A table name listed more than once gets a single accessor, at its first position.
    pub fn from_configuration(
        configuration: StorageConfiguration,
        logger: Logger,
    ) -> StorageResult<Self> {
        let logger = logger.new_with_component_name::<Self>();
        let client = AirtableClient::builder(configuration.endpoint(), configuration.base_id())
            .with_api_key(configuration.api_key().clone())
            .with_timeout(configuration.request_timeout())
            .with_logger(logger.clone())
            .build()
            .map_err(|e| StorageError::Configuration(format!("{e:?}")))?;
        let client = Arc::new(client);

        let mut accessors: Vec<RecordAccessor> =
            Vec::with_capacity(configuration.table_names().len());
        for table_name in configuration.table_names() {
            if accessors.iter().any(|accessor| accessor.table_name() == table_name) {
                debug!(logger, "Skipping duplicated table name"; "table" => table_name);
                continue;
            }
            let table = AirtableTable::new(client.clone(), table_name);
            accessors.push(RecordAccessor::new(
                table_name,
                Arc::new(table),
                logger.clone(),
            ));
            debug!(logger, "Built record accessor"; "table" => table_name);
        }

        Ok(Self {
            configuration,
            accessors,
        })
    }

    /// Accessor of the table with the given name.
    pub fn table(&self, name: &str) -> Option<&RecordAccessor> {
        self.accessors
            .iter()
            .find(|accessor| accessor.table_name() == name)
    }

    /// Names of the tables, in configuration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.accessors.iter().map(RecordAccessor::table_name).collect()
    }

    /// Iterate over the accessors, in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordAccessor> {
        self.accessors.iter()
    }

    /// Number of accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Whether there is no accessor, never true for a built registry.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// The validated configuration the registry was built from.
    pub fn configuration(&self) -> &StorageConfiguration {
        &self.configuration
    }
}
