use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::core::memory::Versioned;
use crate::utils::date::serializer;

// ItemEntity is the stored shape of a physical copy, the location hierarchy is flattened so
// that every level can be used as a filter attribute.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ItemEntity {
    pub item_id: String,
    pub version: i64,
    pub barcode: String,
    pub title: String,
    pub item_status: ItemStatus,
    pub institution_id: String,
    pub campus_id: String,
    pub library_id: String,
    pub location_id: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemEntity {
    pub fn new(barcode: &str, title: &str, status: ItemStatus) -> Self {
        Self {
            item_id: Uuid::new_v4().to_string(),
            version: 0,
            barcode: barcode.to_string(),
            title: title.to_string(),
            item_status: status,
            institution_id: Uuid::new_v4().to_string(), // random for testing purpose
            campus_id: Uuid::new_v4().to_string(),
            library_id: Uuid::new_v4().to_string(),
            location_id: Uuid::new_v4().to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for ItemEntity {
    fn id(&self) -> String {
        self.item_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for ItemEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
