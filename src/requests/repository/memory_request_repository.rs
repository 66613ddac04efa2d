use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::memory::MemoryRepository;
use crate::core::repository::Repository;
use crate::requests::domain::model::RequestEntity;
use crate::requests::repository::RequestRepository;

pub type MemoryRequestRepository = MemoryRepository<RequestEntity>;

#[async_trait]
impl RequestRepository for MemoryRepository<RequestEntity> {
    async fn find_by_item(&self, item_id: &str, page_size: usize) -> LibraryResult<Vec<RequestEntity>> {
        let predicate = HashMap::from([("item_id".to_string(), item_id.to_string())]);
        let mut records = vec![];
        let mut page: Option<String> = None;
        loop {
            let res = self.query(&predicate, page.as_deref(), page_size).await?;
            records.extend(res.records);
            match res.next_page {
                Some(next) => page = Some(next),
                None => break,
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::RequestType;
    use crate::core::repository::Repository;
    use crate::requests::domain::model::RequestEntity;
    use crate::requests::repository::RequestRepository;
    use crate::requests::repository::memory_request_repository::MemoryRequestRepository;

    #[tokio::test]
    async fn test_should_find_all_pages_for_item() {
        let repo = MemoryRequestRepository::new();
        for position in 1..=7 {
            repo.create(&RequestEntity::new("item1", "user1", RequestType::Hold, position))
                .await.expect("should create request");
        }
        repo.create(&RequestEntity::new("item2", "user1", RequestType::Page, 1))
            .await.expect("should create request");
        let requests = repo.find_by_item("item1", 3).await.expect("should find requests");
        assert_eq!(7, requests.len());
        assert!(requests.iter().all(|r| r.item_id == "item1"));
    }

    #[tokio::test]
    async fn test_should_reject_zero_page_size() {
        let repo = MemoryRequestRepository::new();
        repo.create(&RequestEntity::new("item1", "user1", RequestType::Hold, 1))
            .await.expect("should create request");
        let err = repo.find_by_item("item1", 0).await.expect_err("should reject zero page size");
        assert!(err.is_validation());
    }
}
