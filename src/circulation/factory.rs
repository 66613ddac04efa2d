use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::CirculationServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::items::factory::create_item_repository;
use crate::loans::factory::create_loan_repository;
use crate::policy::repository::LoanPolicyRepository;
use crate::requests::repository::RequestRepository;

// requests and loan policies belong to other services, so their repositories are passed in
pub async fn create_circulation_service(config: &Configuration, store: RepositoryStore,
                                        request_repository: Box<dyn RequestRepository>,
                                        policy_repository: Box<dyn LoanPolicyRepository>) -> Box<dyn CirculationService> {
    let item_repo = create_item_repository(store).await;
    let loan_repo = create_loan_repository(store).await;
    Box::new(CirculationServiceImpl::new(config, item_repo, loan_repo,
                                         request_repository, policy_repository))
}
