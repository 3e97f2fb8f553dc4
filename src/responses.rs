//! Response bodies shared by the write endpoints.

use serde::Serialize;
use uuid::Uuid;

use crate::store::UpdateOutcome;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertResponse {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Uuid>,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(o: UpdateOutcome) -> Self {
        Self {
            acknowledged: true,
            matched_count: o.matched,
            modified_count: o.modified,
            upserted_count: u64::from(o.upserted_id.is_some()),
            upserted_id: o.upserted_id,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResponse {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
