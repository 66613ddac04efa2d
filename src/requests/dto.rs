use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{FulfilmentPreference, RequestStatus, RequestType};
use crate::requests::domain::model::RequestEntity;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequestDto {
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

impl RequestDto {
    pub fn new(item_id: &str, requester_id: &str, request_type: RequestType, position: i64) -> Self {
        RequestDto::from(&RequestEntity::new(item_id, requester_id, request_type, position))
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    // hold shelf requests are fulfilled at the desk, delivery goes through another workflow
    pub fn is_fulfillable(&self) -> bool {
        self.fulfilment_preference == FulfilmentPreference::HoldShelf
    }

    pub fn change_status(&mut self, status: RequestStatus) {
        self.status = status;
    }
}

impl Identifiable for RequestDto {
    fn id(&self) -> String {
        self.request_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&RequestEntity> for RequestDto {
    fn from(other: &RequestEntity) -> RequestDto {
        RequestDto {
            request_id: other.request_id.to_string(),
            version: other.version,
            item_id: other.item_id.to_string(),
            requester_id: other.requester_id.to_string(),
            proxy_user_id: other.proxy_user_id.clone(),
            request_type: other.request_type,
            fulfilment_preference: other.fulfilment_preference,
            status: other.status,
            position: other.position,
            request_date: other.request_date,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&RequestDto> for RequestEntity {
    fn from(other: &RequestDto) -> RequestEntity {
        RequestEntity {
            request_id: other.request_id.to_string(),
            version: other.version,
            item_id: other.item_id.to_string(),
            requester_id: other.requester_id.to_string(),
            proxy_user_id: other.proxy_user_id.clone(),
            request_type: other.request_type,
            fulfilment_preference: other.fulfilment_preference,
            status: other.status,
            position: other.position,
            request_date: other.request_date,
            created_at: other.created_at,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
