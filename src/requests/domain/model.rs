use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::{FulfilmentPreference, RequestStatus, RequestType};
use crate::core::memory::Versioned;
use crate::utils::date::serializer;

// RequestEntity is a patron's claim on an item, stored by the request service.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequestEntity {
    pub request_id: String,
    pub version: i64,
    pub item_id: String,
    pub requester_id: String,
    pub proxy_user_id: Option<String>,
    pub request_type: RequestType,
    pub fulfilment_preference: FulfilmentPreference,
    pub status: RequestStatus,
    pub position: i64,
    #[serde(with = "serializer")]
    pub request_date: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl RequestEntity {
    pub fn new(item_id: &str, requester_id: &str, request_type: RequestType, position: i64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            version: 0,
            item_id: item_id.to_string(),
            requester_id: requester_id.to_string(),
            proxy_user_id: None,
            request_type,
            fulfilment_preference: FulfilmentPreference::HoldShelf,
            status: RequestStatus::OpenNotYetFilled,
            position,
            request_date: Utc::now().naive_utc(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for RequestEntity {
    fn id(&self) -> String {
        self.request_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for RequestEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
