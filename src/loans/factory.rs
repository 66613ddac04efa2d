use crate::core::repository::RepositoryStore;
use crate::loans::repository::LoanRepository;
use crate::loans::repository::ddb_loan_repository::DDBLoanRepository;
use crate::loans::repository::memory_loan_repository::MemoryLoanRepository;
use crate::utils::ddb::{build_db_client, create_table, LOANS_TABLE};

pub async fn create_loan_repository(store: RepositoryStore) -> Box<dyn LoanRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBLoanRepository::new(client, &LOANS_TABLE))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, &LOANS_TABLE).await;
            Box::new(DDBLoanRepository::new(client, &LOANS_TABLE))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryLoanRepository::new())
        }
    }
}
