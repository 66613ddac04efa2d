use std::panic;
use std::panic::AssertUnwindSafe;
use tracing::error;
use crate::circulation::domain::ItemUpdate;
use crate::circulation::dto::{LoanAndRelatedRecords, RequestAndRelatedRecords};
use crate::core::domain::Configuration;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult, RequestType};
use crate::requests::domain::queue::RequestQueue;

// ItemAvailabilityCoordinator derives the status an item should have from its loan and request
// queue. It never writes, the caller persists the item when the result is Changed.
#[derive(Debug, Clone)]
pub struct ItemAvailabilityCoordinator {
    config: Configuration,
}

impl ItemAvailabilityCoordinator {
    pub fn new(config: &Configuration) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn on_check_out(&self, records: LoanAndRelatedRecords) -> LibraryResult<ItemUpdate<LoanAndRelatedRecords>> {
        // a closed loan here records an item that was already returned
        if records.loan.is_closed() {
            return Ok(ItemUpdate::Unchanged(records));
        }
        let target = guarded("check out", || self.open_loan_status(&records.request_queue))?;
        Ok(update_loan_item(records, target))
    }

    pub fn on_loan_update(&self, records: LoanAndRelatedRecords) -> LibraryResult<ItemUpdate<LoanAndRelatedRecords>> {
        let target = guarded("loan update", || {
            if records.loan.is_closed() {
                Ok(ItemStatus::Available)
            } else {
                self.open_loan_status(&records.request_queue)
            }
        })?;
        Ok(update_loan_item(records, target))
    }

    // the queue holds the requests placed before this one
    pub fn on_request_creation(&self, records: RequestAndRelatedRecords) -> LibraryResult<ItemUpdate<RequestAndRelatedRecords>> {
        let target = guarded("request creation", || {
            match records.request_queue.highest_priority_request() {
                Some(head) => self.map_request_type_to_status(head.request_type),
                None => self.map_request_type_to_status(records.request.request_type),
            }
        })?;
        if records.item.is_same_status(target) {
            Ok(ItemUpdate::Unchanged(records))
        } else {
            let item = records.item.with_status(target);
            Ok(ItemUpdate::Changed(records.with_item(item)))
        }
    }

    pub fn map_request_type_to_status(&self, request_type: RequestType) -> LibraryResult<ItemStatus> {
        self.config.item_status_for(request_type).ok_or_else(|| LibraryError::runtime(
            format!("no item status configured for {} requests", request_type).as_str(), None))
    }

    fn open_loan_status(&self, request_queue: &RequestQueue) -> LibraryResult<ItemStatus> {
        match request_queue.highest_priority_request() {
            Some(head) => self.map_request_type_to_status(head.request_type),
            None => Ok(ItemStatus::CheckedOut),
        }
    }
}

fn update_loan_item(records: LoanAndRelatedRecords, target: ItemStatus) -> ItemUpdate<LoanAndRelatedRecords> {
    if records.item.is_same_status(target) {
        ItemUpdate::Unchanged(records)
    } else {
        let item = records.item.with_status(target);
        ItemUpdate::Changed(records.with_item(item))
    }
}

// Runs a status computation, internal failures and panics are logged and surface as a generic
// runtime error. Validation errors pass through untouched.
fn guarded<F>(operation: &str, compute: F) -> LibraryResult<ItemStatus>
    where F: FnOnce() -> LibraryResult<ItemStatus> {
    match panic::catch_unwind(AssertUnwindSafe(compute)) {
        Ok(Ok(status)) => Ok(status),
        Ok(Err(err)) if err.is_validation() => Err(err),
        Ok(Err(err)) => {
            error!("failed to compute item status on {}: {}", operation, err);
            Err(LibraryError::runtime("failed to compute item status", None))
        }
        Err(_) => {
            error!("unexpected fault whilst computing item status on {}", operation);
            Err(LibraryError::runtime("failed to compute item status", None))
        }
    }
}
