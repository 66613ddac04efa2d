use serde::Serialize;
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;
use crate::requests::domain::queue::RequestQueue;
use crate::requests::dto::RequestDto;

// LoanAndRelatedRecords bundles an already fetched loan with its item and request queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanAndRelatedRecords {
    pub loan: LoanDto,
    pub item: ItemDto,
    pub request_queue: RequestQueue,
}

impl LoanAndRelatedRecords {
    pub fn new(loan: LoanDto, item: ItemDto, request_queue: RequestQueue) -> Self {
        Self {
            loan,
            item,
            request_queue,
        }
    }

    pub fn with_item(self, item: ItemDto) -> Self {
        Self { item, ..self }
    }

    pub fn with_loan(self, loan: LoanDto) -> Self {
        Self { loan, ..self }
    }
}

// RequestAndRelatedRecords bundles a new request with its item and the queue it joins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestAndRelatedRecords {
    pub request: RequestDto,
    pub item: ItemDto,
    pub request_queue: RequestQueue,
}

impl RequestAndRelatedRecords {
    pub fn new(request: RequestDto, item: ItemDto, request_queue: RequestQueue) -> Self {
        Self {
            request,
            item,
            request_queue,
        }
    }

    pub fn with_item(self, item: ItemDto) -> Self {
        Self { item, ..self }
    }
}
