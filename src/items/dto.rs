use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::items::domain::model::ItemEntity;
use crate::utils::date::serializer;

// Location places an item in the institution > campus > library > location hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub institution_id: String,
    pub campus_id: String,
    pub library_id: String,
    pub location_id: String,
}

// ItemDto is the item snapshot the circulation desk works with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDto {
    pub item_id: String,
    pub version: i64,
    pub barcode: String,
    pub title: String,
    pub item_status: ItemStatus,
    pub location: Location,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemDto {
    pub fn new(barcode: &str, title: &str, status: ItemStatus) -> ItemDto {
        ItemDto::from(&ItemEntity::new(barcode, title, status))
    }

    pub fn status(&self) -> ItemStatus {
        self.item_status
    }

    pub fn is_same_status(&self, status: ItemStatus) -> bool {
        self.item_status == status
    }

    pub fn with_status(&self, status: ItemStatus) -> ItemDto {
        ItemDto {
            item_status: status,
            ..self.clone()
        }
    }
}

impl Identifiable for ItemDto {
    fn id(&self) -> String {
        self.item_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&ItemEntity> for ItemDto {
    fn from(other: &ItemEntity) -> ItemDto {
        ItemDto {
            item_id: other.item_id.to_string(),
            version: other.version,
            barcode: other.barcode.to_string(),
            title: other.title.to_string(),
            item_status: other.item_status,
            location: Location {
                institution_id: other.institution_id.to_string(),
                campus_id: other.campus_id.to_string(),
                library_id: other.library_id.to_string(),
                location_id: other.location_id.to_string(),
            },
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&ItemDto> for ItemEntity {
    fn from(other: &ItemDto) -> ItemEntity {
        ItemEntity {
            item_id: other.item_id.to_string(),
            version: other.version,
            barcode: other.barcode.to_string(),
            title: other.title.to_string(),
            item_status: other.item_status,
            institution_id: other.location.institution_id.to_string(),
            campus_id: other.location.campus_id.to_string(),
            library_id: other.location.library_id.to_string(),
            location_id: other.location.location_id.to_string(),
            created_at: other.created_at,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::ItemStatus;
    use crate::items::domain::model::ItemEntity;
    use crate::items::dto::ItemDto;

    #[tokio::test]
    async fn test_should_build_item() {
        let item = ItemDto::new("barcode", "title", ItemStatus::Available);
        assert_eq!("barcode", item.barcode.as_str());
        assert!(item.is_same_status(ItemStatus::Available));
    }

    #[tokio::test]
    async fn test_should_change_only_status() {
        let item = ItemDto::new("barcode", "title", ItemStatus::Available);
        let updated = item.with_status(ItemStatus::CheckedOut);
        assert_eq!(ItemStatus::CheckedOut, updated.status());
        assert_eq!(item.item_id, updated.item_id);
        assert_eq!(item.location, updated.location);
        assert_eq!(ItemStatus::Available, item.status());
    }

    #[tokio::test]
    async fn test_should_flatten_location() {
        let item = ItemDto::new("barcode", "title", ItemStatus::Paged);
        let entity = ItemEntity::from(&item);
        assert_eq!(item.location.library_id, entity.library_id);
        assert_eq!(item.location, ItemDto::from(&entity).location);
    }
}
