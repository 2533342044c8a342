use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accessor::DOMAIN_ID_FIELD;

/// Field values of a record, keyed by field name.
pub type Fields = serde_json::Map<String, Value>;

/// A record of an Airtable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Remote key, assigned by Airtable when the record is created (`rec...`).
    pub id: String,

    /// Creation date, as reported by Airtable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,

    /// Field values. Airtable omits empty fields.
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Value of the given field, if set.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Value of the domain `id` field, distinct from the remote key.
    pub fn domain_id(&self) -> Option<&Value> {
        self.field(DOMAIN_ID_FIELD)
    }
}

/// A page of records, as returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Records of the page, in delivery order.
    #[serde(default)]
    pub records: Vec<Record>,

    /// Continuation token of the next page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Confirmation of a record deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRecord {
    /// Remote key of the deleted record.
    pub id: String,

    /// Whether the record was deleted.
    pub deleted: bool,
}

/// An application object to store, its `id` entry being the domain identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageObject(Fields);

impl StorageObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn with_field<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Value of the `id` entry, if any.
    pub fn id(&self) -> Option<&Value> {
        self.0.get(DOMAIN_ID_FIELD)
    }

    /// All the fields, `id` included.
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Consume the object, returning all its fields, `id` included.
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// Consume the object, returning its data fields without `id`.
    pub fn into_data_fields(mut self) -> Fields {
        self.0.remove(DOMAIN_ID_FIELD);
        self.0
    }
}

impl From<Fields> for StorageObject {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}
