use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, error, info};
use crate::circulation::domain::{CirculationService, ItemUpdate};
use crate::circulation::domain::availability::ItemAvailabilityCoordinator;
use crate::circulation::domain::renewal::{RenewalGate, RenewalMode};
use crate::circulation::dto::{LoanAndRelatedRecords, RequestAndRelatedRecords};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, RequestStatus};
use crate::items::domain::model::ItemEntity;
use crate::items::dto::ItemDto;
use crate::items::repository::ItemRepository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::dto::LoanDto;
use crate::loans::repository::LoanRepository;
use crate::policy::domain::due_date::DueDateStrategy;
use crate::policy::repository::LoanPolicyRepository;
use crate::requests::domain::model::RequestEntity;
use crate::requests::domain::queue::RequestQueue;
use crate::requests::dto::RequestDto;
use crate::requests::repository::RequestRepository;

// CirculationServiceImpl fetches the records an operation needs, runs the allocation rules over
// them and persists what changed. Each operation is a single sequential pipeline.
pub struct CirculationServiceImpl {
    branch_id: String,
    request_page_size: usize,
    item_repository: Box<dyn ItemRepository>,
    loan_repository: Box<dyn LoanRepository>,
    request_repository: Box<dyn RequestRepository>,
    policy_repository: Box<dyn LoanPolicyRepository>,
    coordinator: ItemAvailabilityCoordinator,
    renewal_gate: RenewalGate,
}

impl CirculationServiceImpl {
    pub fn new(config: &Configuration, item_repository: Box<dyn ItemRepository>,
               loan_repository: Box<dyn LoanRepository>, request_repository: Box<dyn RequestRepository>,
               policy_repository: Box<dyn LoanPolicyRepository>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            request_page_size: config.request_page_size,
            item_repository,
            loan_repository,
            request_repository,
            policy_repository,
            coordinator: ItemAvailabilityCoordinator::new(config),
            renewal_gate: RenewalGate,
        }
    }

    async fn load_queue(&self, item_id: &str) -> LibraryResult<RequestQueue> {
        let requests = self.request_repository.find_by_item(item_id, self.request_page_size).await?;
        Ok(RequestQueue::new(requests.iter().map(RequestDto::from).collect()))
    }

    async fn save_item(&self, item: &mut ItemDto) -> LibraryResult<()> {
        self.item_repository.update(&ItemEntity::from(&*item)).await.map_err(|err| {
            error!("failed to update item {} to {}: {}", item.item_id, item.item_status, err);
            LibraryError::runtime("failed to update item", None)
        })?;
        item.version += 1;
        Ok(())
    }

    async fn save_loan(&self, loan: &mut LoanDto) -> LibraryResult<()> {
        self.loan_repository.update(&LoanEntity::from(&*loan)).await.map_err(|err| {
            error!("failed to update loan {}: {}", loan.loan_id, err);
            LibraryError::runtime("failed to update loan", None)
        })?;
        loan.version += 1;
        Ok(())
    }

    async fn save_item_update(&self, update: ItemUpdate<LoanAndRelatedRecords>) -> LibraryResult<LoanAndRelatedRecords> {
        match update {
            ItemUpdate::Changed(mut records) => {
                self.save_item(&mut records.item).await?;
                info!("branch {} moved item {} to {}", self.branch_id, records.item.item_id, records.item.item_status);
                Ok(records)
            }
            ItemUpdate::Unchanged(records) => {
                debug!("item {} stays {}", records.item.item_id, records.item.item_status);
                Ok(records)
            }
        }
    }

    // best effort, failures are logged and the original error is what the caller sees
    async fn undo_check_out(&self, loan_id: &str, restored_item: Option<ItemDto>) {
        if let Err(err) = self.loan_repository.delete(loan_id).await {
            error!("failed to remove loan {} after aborted check out: {}", loan_id, err);
        }
        if let Some(item) = restored_item {
            if let Err(err) = self.item_repository.update(&ItemEntity::from(&item)).await {
                error!("failed to restore item {} to {} after aborted check out: {}", item.item_id, item.item_status, err);
            }
        }
    }

    async fn renew_with(&self, loan_id: &str, now: NaiveDateTime, mode: RenewalMode) -> LibraryResult<LoanAndRelatedRecords> {
        let loan = LoanDto::from(&self.loan_repository.get(loan_id).await?);
        if loan.is_closed() {
            return Err(LibraryError::validation(
                format!("loan {} is closed and cannot be renewed", loan_id).as_str(), Some("loan".to_string())));
        }
        let item = ItemDto::from(&self.item_repository.get(loan.item_id.as_str()).await?);
        let request_queue = self.load_queue(loan.item_id.as_str()).await?;
        let policy = self.policy_repository.get(loan.loan_policy_id.as_str()).await?;

        let renewal = self.renewal_gate.renew(&loan, &request_queue, &policy, now, &mode).map_err(|err| {
            info!("renewal of loan {} rejected: {}", loan_id, err);
            err
        })?;
        let loan = renewal.apply_to(loan);
        let update = self.coordinator.on_loan_update(LoanAndRelatedRecords::new(loan, item, request_queue))?;

        let mut loan = update.records().loan.clone();
        self.save_loan(&mut loan).await?;
        info!("branch {} {} loan {} until {}", self.branch_id, loan.action, loan.loan_id, loan.due_date);
        let records = self.save_item_update(update).await?;
        Ok(records.with_loan(loan))
    }
}

#[async_trait]
impl CirculationService for CirculationServiceImpl {
    async fn check_out(&self, item_barcode: &str, user_id: &str, proxy_user_id: Option<&str>,
                       loan_policy_id: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords> {
        let item = ItemDto::from(&self.item_repository.find_by_barcode(item_barcode).await?);
        match self.loan_repository.find_open_loan(item.item_id.as_str()).await {
            Ok(existing) => {
                return Err(LibraryError::validation(
                    format!("item {} is already checked out on loan {}", item_barcode, existing.loan_id).as_str(),
                    Some("itemBarcode".to_string())));
            }
            Err(LibraryError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        let mut request_queue = self.load_queue(item.item_id.as_str()).await?;
        let policy = self.policy_repository.get(loan_policy_id).await?;

        // the borrower's own request at the head of the queue is fulfilled by this loan
        let fulfilled = request_queue.highest_priority_request()
            .filter(|head| head.requester_id == user_id && head.is_fulfillable())
            .cloned()
            .map(|mut head| {
                head.change_status(RequestStatus::ClosedFilled);
                head
            });
        if let Some(ref fulfilled) = fulfilled {
            request_queue = request_queue.without(fulfilled.request_id.as_str());
        }

        let original_item = item.clone();
        let mut loan = LoanDto::new(item.item_id.as_str(), user_id, policy.loan_policy_id.as_str(), now)
            .with_proxy(proxy_user_id.map(str::to_string));
        loan.due_date = DueDateStrategy::for_check_out(&policy).calculate_due_date(&loan, now)?;
        let update = self.coordinator.on_check_out(LoanAndRelatedRecords::new(loan, item, request_queue))?;
        let item_changed = update.is_changed();

        // loan first, then item, then request; a failed step undoes the ones before it
        let loan_id = update.records().loan.loan_id.clone();
        self.loan_repository.create(&LoanEntity::from(&update.records().loan)).await.map_err(|err| {
            error!("failed to create loan {}: {}", loan_id, err);
            LibraryError::runtime("failed to update loan", None)
        })?;
        let records = match self.save_item_update(update).await {
            Ok(records) => records,
            Err(err) => {
                self.undo_check_out(loan_id.as_str(), None).await;
                return Err(err);
            }
        };
        if let Some(fulfilled) = fulfilled {
            if let Err(err) = self.request_repository.update(&RequestEntity::from(&fulfilled)).await {
                error!("failed to fulfil request {} on check out: {}", fulfilled.request_id, err);
                let restored = if item_changed {
                    let mut restored = original_item;
                    restored.version = records.item.version;
                    Some(restored)
                } else {
                    None
                };
                self.undo_check_out(loan_id.as_str(), restored).await;
                return Err(LibraryError::runtime("failed to update request", None));
            }
            info!("request {} fulfilled by check out to {}", fulfilled.request_id, user_id);
        }
        info!("branch {} checked out item {} to {} until {}", self.branch_id, item_barcode, user_id, records.loan.due_date);
        Ok(records)
    }

    async fn renew(&self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords> {
        self.renew_with(loan_id, now, RenewalMode::Standard).await
    }

    async fn override_renewal(&self, loan_id: &str, comment: &str, due_date: Option<NaiveDateTime>,
                              now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords> {
        self.renew_with(loan_id, now, RenewalMode::Override { comment: comment.to_string(), due_date }).await
    }

    async fn check_in(&self, item_barcode: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords> {
        let item = ItemDto::from(&self.item_repository.find_by_barcode(item_barcode).await?);
        let mut loan = LoanDto::from(&self.loan_repository.find_open_loan(item.item_id.as_str()).await?);
        let request_queue = self.load_queue(item.item_id.as_str()).await?;
        loan.close(now);
        let update = self.coordinator.on_loan_update(LoanAndRelatedRecords::new(loan, item, request_queue))?;

        let mut loan = update.records().loan.clone();
        self.save_loan(&mut loan).await?;
        let records = self.save_item_update(update).await?;
        info!("branch {} checked in item {}", self.branch_id, item_barcode);
        Ok(records.with_loan(loan))
    }

    async fn place_request(&self, request: RequestDto) -> LibraryResult<RequestAndRelatedRecords> {
        if !request.is_open() {
            return Err(LibraryError::validation(
                format!("request {} must be open when placed", request.request_id).as_str(), Some("status".to_string())));
        }
        let item = ItemDto::from(&self.item_repository.get(request.item_id.as_str()).await?);
        let request_queue = self.load_queue(item.item_id.as_str()).await?;
        let mut request = request;
        request.position = request_queue.next_position();
        let update = self.coordinator.on_request_creation(RequestAndRelatedRecords::new(request, item, request_queue))?;

        self.request_repository.create(&RequestEntity::from(&update.records().request)).await?;
        match update {
            ItemUpdate::Changed(mut records) => {
                self.save_item(&mut records.item).await?;
                info!("branch {} moved item {} to {} for {} request {}", self.branch_id, records.item.item_id,
                      records.item.item_status, records.request.request_type, records.request.request_id);
                Ok(records)
            }
            ItemUpdate::Unchanged(records) => {
                debug!("item {} stays {} for request {}", records.item.item_id, records.item.item_status,
                       records.request.request_id);
                Ok(records)
            }
        }
    }

    async fn find_loan(&self, loan_id: &str) -> LibraryResult<LoanDto> {
        self.loan_repository.get(loan_id).await.map(|loan| LoanDto::from(&loan))
    }

    async fn find_item(&self, item_barcode: &str) -> LibraryResult<ItemDto> {
        self.item_repository.find_by_barcode(item_barcode).await.map(|item| ItemDto::from(&item))
    }

    async fn find_request_queue(&self, item_id: &str) -> LibraryResult<RequestQueue> {
        self.load_queue(item_id).await
    }
}
