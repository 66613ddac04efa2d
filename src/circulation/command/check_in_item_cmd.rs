use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::LoanAndRelatedRecords;
use crate::core::command::{Command, CommandError};
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;

pub struct CheckInItemCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl CheckInItemCommand {
    pub fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckInItemCommandRequest {
    item_barcode: String,
}

impl CheckInItemCommandRequest {
    pub fn new(item_barcode: &str) -> Self {
        Self {
            item_barcode: item_barcode.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckInItemCommandResponse {
    pub loan: LoanDto,
    pub item: ItemDto,
}

impl CheckInItemCommandResponse {
    pub fn new(records: LoanAndRelatedRecords) -> Self {
        Self {
            loan: records.loan,
            item: records.item,
        }
    }
}

#[async_trait]
impl Command<CheckInItemCommandRequest, CheckInItemCommandResponse> for CheckInItemCommand {
    async fn execute(&self, req: CheckInItemCommandRequest) -> Result<CheckInItemCommandResponse, CommandError> {
        self.circulation_service.check_in(req.item_barcode.as_str(), Utc::now().naive_utc())
            .await.map_err(CommandError::from).map(CheckInItemCommandResponse::new)
    }
}
