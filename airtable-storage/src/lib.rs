#![warn(missing_docs)]
//! Storage adapter over an [Airtable](https://airtable.com) base.
//!
//! A [TableRegistry] is built from a [RawStorageConfiguration] (or an already validated
//! [StorageConfiguration]) and hands out one [RecordAccessor] per configured table.
//! Accessors expose the storage operations:
//! - read: [get][RecordAccessor::get], [lookup][RecordAccessor::lookup],
//!   [find][RecordAccessor::find], [all][RecordAccessor::all]
//! - write: [save][RecordAccessor::save] (upsert by `id`), [create][RecordAccessor::create],
//!   [update][RecordAccessor::update], [destroy][RecordAccessor::destroy]
//!
//! Remote calls go through the [RemoteTable] trait, implemented over HTTP by [AirtableTable].

mod accessor;
mod builder;
mod client;
mod configuration;
mod entities;
mod error;
mod formula;
pub mod logging;
pub mod query;
mod registry;
mod secret;
mod table;

#[cfg(test)]
pub(crate) mod test;

pub use accessor::{DOMAIN_ID_FIELD, PAGE_SIZE, RecordAccessor};
pub use builder::AirtableClientBuilder;
pub use client::AirtableClient;
pub use configuration::{
    DEFAULT_AIRTABLE_ENDPOINT, DefaultConfiguration, RawStorageConfiguration, StorageConfiguration,
};
pub use entities::{DeletedRecord, Fields, Record, RecordPage, StorageObject};
pub use error::{AirtableClientError, StorageError};
pub use formula::{FilterFormula, FilterValue};
pub use registry::TableRegistry;
pub use secret::ApiKey;
pub use table::{AirtableTable, RemoteTable};

/// Result type of the Airtable HTTP client.
pub type AirtableClientResult<T> = Result<T, AirtableClientError>;

/// Result type of the storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
