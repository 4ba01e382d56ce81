//! Typed documents stored as records

use serde::de::DeserializeOwned;
use serde::Serialize;

use tastebook_storage::{Record, Table};

use crate::Result;

/// A domain type persisted as the body of a record in `TABLE`.
pub trait Document: Serialize + DeserializeOwned {
    const TABLE: Table;

    fn id(&self) -> &str;

    fn to_record(&self) -> Result<Record> {
        Ok(Record::from_document(serde_json::to_value(self)?)?)
    }

    fn from_record(record: Record) -> Result<Self> {
        Ok(serde_json::from_value(record.body)?)
    }
}
