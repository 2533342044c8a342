//! Provides the queries sent to the Airtable REST API
//!
//! Available queries
//! - Get:
//!   - Records: [List a page, optionally filtered][ListRecordsQuery],
//!     [Get by remote key][GetRecordQuery]
//! - Post:
//!   - Record: [Create][CreateRecordQuery]
//! - Patch:
//!   - Record: [Update fields][UpdateRecordQuery]
//! - Delete:
//!   - Record: [Delete][DeleteRecordQuery]
//!
mod api;
mod delete;
mod get;
mod patch;
mod post;

pub use api::*;
pub use delete::*;
pub use get::*;
pub use patch::*;
pub use post::*;

use serde::Serialize;

use crate::Fields;

/// Body of the record mutation requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFieldsMessage {
    /// Field values to write.
    pub fields: Fields,
}
