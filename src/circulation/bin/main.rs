use chrono::{Duration, Utc};
use tracing::{error, info};
use circulation_core::circulation::domain::CirculationService;
use circulation_core::circulation::domain::service::CirculationServiceImpl;
use circulation_core::core::domain::Configuration;
use circulation_core::core::library::{ItemStatus, LibraryError, RequestType};
use circulation_core::core::repository::Repository;
use circulation_core::items::domain::model::ItemEntity;
use circulation_core::items::repository::memory_item_repository::MemoryItemRepository;
use circulation_core::loans::repository::memory_loan_repository::MemoryLoanRepository;
use circulation_core::policy::domain::model::{LoanPolicy, Period};
use circulation_core::policy::repository::memory_policy_repository::MemoryLoanPolicyRepository;
use circulation_core::requests::dto::RequestDto;
use circulation_core::requests::repository::memory_request_repository::MemoryRequestRepository;
use circulation_core::utils::ddb::setup_tracing;

// Walks one item through a day at the desk against the in-memory store:
// check out, queued requests, a renewal, an override renewal and check in.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), LibraryError> {
    setup_tracing();
    let config = Configuration::from_env()?;

    let items = MemoryItemRepository::new();
    let item = ItemEntity::new("36000291452", "Small Angry Planet", ItemStatus::Available);
    items.create(&item).await?;
    let policies = MemoryLoanPolicyRepository::new();
    let policy = LoanPolicy::rolling("three weeks", Period::weeks(3));
    policies.create(&policy).await?;

    let desk = CirculationServiceImpl::new(&config, Box::new(items), Box::new(MemoryLoanRepository::new()),
                                           Box::new(MemoryRequestRepository::new()), Box::new(policies));
    let now = Utc::now().naive_utc();

    let checked_out = desk.check_out(item.barcode.as_str(), "jessica", None, policy.loan_policy_id.as_str(), now).await?;
    info!("checked out {} due {}, item is {}", checked_out.loan.loan_id, checked_out.loan.due_date,
        checked_out.item.item_status);

    let hold = desk.place_request(RequestDto::new(item.item_id.as_str(), "steve", RequestType::Hold, 0)).await?;
    info!("hold placed at position {}, item is {}", hold.request.position, hold.item.item_status);

    let recall = desk.place_request(RequestDto::new(item.item_id.as_str(), "rebecca", RequestType::Recall, 0)).await?;
    info!("recall placed at position {}, item is {}", recall.request.position, recall.item.item_status);

    let renewed = desk.renew(checked_out.loan.loan_id.as_str(), now + Duration::days(7)).await?;
    info!("renewed {} now due {}", renewed.loan.loan_id, renewed.loan.due_date);

    let overridden = desk.override_renewal(checked_out.loan.loan_id.as_str(), "patron on field trip", None,
                                           now + Duration::days(14)).await;
    match overridden {
        Ok(records) => info!("override renewal {} now due {}", records.loan.action, records.loan.due_date),
        Err(err) => error!("override renewal refused: {}", err),
    }

    let checked_in = desk.check_in(item.barcode.as_str(), now + Duration::days(20)).await?;
    info!("checked in {}, item is {}", checked_in.loan.loan_id, checked_in.item.item_status);

    let queue = desk.find_request_queue(item.item_id.as_str()).await?;
    info!("{} requests still waiting for {}", queue.len(), item.title);
    Ok(())
}
