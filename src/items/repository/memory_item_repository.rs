use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::memory::MemoryRepository;
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;

pub type MemoryItemRepository = MemoryRepository<ItemEntity>;

#[async_trait]
impl ItemRepository for MemoryRepository<ItemEntity> {
    async fn find_by_barcode(&self, barcode: &str) -> LibraryResult<ItemEntity> {
        let res = self.query(
            &HashMap::from([("barcode".to_string(), barcode.to_string())]), None, 2).await?;
        match res.records.len() {
            0 => Err(LibraryError::not_found(format!("item not found for barcode {}", barcode).as_str())),
            1 => Ok(res.records[0].clone()),
            _ => Err(LibraryError::database(format!("too many items for barcode {}", barcode).as_str(), None, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::ItemStatus;
    use crate::core::repository::Repository;
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ItemRepository;
    use crate::items::repository::memory_item_repository::MemoryItemRepository;

    #[tokio::test]
    async fn test_should_find_by_barcode() {
        let repo = MemoryItemRepository::new();
        let item = ItemEntity::new("36000291452", "Small Angry Planet", ItemStatus::Available);
        repo.create(&item).await.expect("should create item");
        let loaded = repo.find_by_barcode("36000291452").await.expect("should find item");
        assert_eq!(item.item_id, loaded.item_id);
        assert!(repo.find_by_barcode("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_should_update_status() {
        let repo = MemoryItemRepository::new();
        let mut item = ItemEntity::new("barcode", "title", ItemStatus::Available);
        repo.create(&item).await.expect("should create item");
        item.item_status = ItemStatus::CheckedOut;
        repo.update(&item).await.expect("should update item");
        let loaded = repo.get(item.item_id.as_str()).await.expect("should get item");
        assert_eq!(ItemStatus::CheckedOut, loaded.item_status);
        assert_eq!(1, loaded.version);
    }
}
