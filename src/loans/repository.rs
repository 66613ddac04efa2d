pub mod ddb_loan_repository;
pub mod memory_loan_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;

#[async_trait]
pub trait LoanRepository: Repository<LoanEntity> {
    // the open loan for an item, an item has at most one
    async fn find_open_loan(&self, item_id: &str) -> LibraryResult<LoanEntity>;
}
