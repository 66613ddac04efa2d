pub mod memory_request_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::requests::domain::model::RequestEntity;

#[async_trait]
pub trait RequestRepository: Repository<RequestEntity> {
    // every request recorded against the item, open or closed, across all pages
    async fn find_by_item(&self, item_id: &str, page_size: usize) -> LibraryResult<Vec<RequestEntity>>;
}
