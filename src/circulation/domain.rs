use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::circulation::dto::{LoanAndRelatedRecords, RequestAndRelatedRecords};
use crate::core::library::LibraryResult;
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;
use crate::requests::domain::queue::RequestQueue;
use crate::requests::dto::RequestDto;

pub mod availability;
pub mod renewal;
pub mod service;

// ItemUpdate tells the caller whether the item status in the bundle has to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate<T> {
    Changed(T),
    Unchanged(T),
}

impl<T> ItemUpdate<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, ItemUpdate::Changed(_))
    }

    pub fn records(&self) -> &T {
        match self {
            ItemUpdate::Changed(records) => records,
            ItemUpdate::Unchanged(records) => records,
        }
    }

    pub fn into_records(self) -> T {
        match self {
            ItemUpdate::Changed(records) => records,
            ItemUpdate::Unchanged(records) => records,
        }
    }
}

#[async_trait]
pub trait CirculationService: Sync + Send {
    async fn check_out(&self, item_barcode: &str, user_id: &str, proxy_user_id: Option<&str>,
                       loan_policy_id: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords>;
    async fn renew(&self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords>;
    async fn override_renewal(&self, loan_id: &str, comment: &str, due_date: Option<NaiveDateTime>,
                              now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords>;
    async fn check_in(&self, item_barcode: &str, now: NaiveDateTime) -> LibraryResult<LoanAndRelatedRecords>;
    async fn place_request(&self, request: RequestDto) -> LibraryResult<RequestAndRelatedRecords>;
    async fn find_loan(&self, loan_id: &str) -> LibraryResult<LoanDto>;
    async fn find_item(&self, item_barcode: &str) -> LibraryResult<ItemDto>;
    async fn find_request_queue(&self, item_id: &str) -> LibraryResult<RequestQueue>;
}
