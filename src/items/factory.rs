use crate::core::repository::RepositoryStore;
use crate::items::repository::ItemRepository;
use crate::items::repository::ddb_item_repository::DDBItemRepository;
use crate::items::repository::memory_item_repository::MemoryItemRepository;
use crate::utils::ddb::{build_db_client, create_table, ITEMS_TABLE};

pub async fn create_item_repository(store: RepositoryStore) -> Box<dyn ItemRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBItemRepository::new(client, &ITEMS_TABLE))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &ITEMS_TABLE).await;
            Box::new(DDBItemRepository::new(client, &ITEMS_TABLE))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryItemRepository::new())
        }
    }
}
