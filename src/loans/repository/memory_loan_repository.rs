use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult, LoanStatus};
use crate::core::memory::MemoryRepository;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;

pub type MemoryLoanRepository = MemoryRepository<LoanEntity>;

#[async_trait]
impl LoanRepository for MemoryRepository<LoanEntity> {
    async fn find_open_loan(&self, item_id: &str) -> LibraryResult<LoanEntity> {
        let res = self.query(&HashMap::from([
            ("item_id".to_string(), item_id.to_string()),
            ("loan_status".to_string(), LoanStatus::Open.to_string()),
        ]), None, 2).await?;
        match res.records.len() {
            0 => Err(LibraryError::not_found(format!("open loan not found for item {}", item_id).as_str())),
            1 => Ok(res.records[0].clone()),
            _ => Err(LibraryError::database(format!("too many open loans for item {}", item_id).as_str(), None, false)),
        }
    }
}
