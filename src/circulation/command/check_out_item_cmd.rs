use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::LoanAndRelatedRecords;
use crate::core::command::{Command, CommandError};
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;

pub struct CheckOutItemCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl CheckOutItemCommand {
    pub fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

// loan_policy_id is the policy the circulation rules selected for this item and borrower
#[derive(Debug, Deserialize)]
pub struct CheckOutItemCommandRequest {
    item_barcode: String,
    user_id: String,
    proxy_user_id: Option<String>,
    loan_policy_id: String,
}

impl CheckOutItemCommandRequest {
    pub fn new(item_barcode: &str, user_id: &str, proxy_user_id: Option<&str>, loan_policy_id: &str) -> Self {
        Self {
            item_barcode: item_barcode.to_string(),
            user_id: user_id.to_string(),
            proxy_user_id: proxy_user_id.map(str::to_string),
            loan_policy_id: loan_policy_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutItemCommandResponse {
    pub loan: LoanDto,
    pub item: ItemDto,
}

impl CheckOutItemCommandResponse {
    pub fn new(records: LoanAndRelatedRecords) -> Self {
        Self {
            loan: records.loan,
            item: records.item,
        }
    }
}

#[async_trait]
impl Command<CheckOutItemCommandRequest, CheckOutItemCommandResponse> for CheckOutItemCommand {
    async fn execute(&self, req: CheckOutItemCommandRequest) -> Result<CheckOutItemCommandResponse, CommandError> {
        self.circulation_service.check_out(req.item_barcode.as_str(), req.user_id.as_str(),
                                           req.proxy_user_id.as_deref(), req.loan_policy_id.as_str(),
                                           Utc::now().naive_utc())
            .await.map_err(CommandError::from).map(CheckOutItemCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::check_out_item_cmd::{CheckOutItemCommand, CheckOutItemCommandRequest};
    use crate::circulation::factory::tests::memory_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::library::ItemStatus;
    use crate::policy::domain::model::{LoanPolicy, LoansProfile, Period};

    #[tokio::test]
    async fn test_should_run_check_out_item() {
        let policy = LoanPolicy::rolling("three weeks", Period::weeks(3));
        let (svc, item) = memory_service(&policy).await;
        let cmd = CheckOutItemCommand::new(svc);
        let res = cmd.execute(CheckOutItemCommandRequest::new(
            item.barcode.as_str(), "borrower", None, policy.loan_policy_id.as_str())).await.expect("should check out");
        assert_eq!(item.item_id, res.loan.item_id);
        assert_eq!(ItemStatus::CheckedOut, res.item.item_status);
        assert!(res.loan.due_date > res.loan.loan_date);
    }

    #[tokio::test]
    async fn test_should_surface_validation_message() {
        let policy = LoanPolicy::new("odd", LoansProfile::Unrecognized("Indefinite".to_string()));
        let (svc, item) = memory_service(&policy).await;
        let cmd = CheckOutItemCommand::new(svc);
        let err = cmd.execute(CheckOutItemCommandRequest::new(
            item.barcode.as_str(), "borrower", None, policy.loan_policy_id.as_str())).await.expect_err("should fail");
        assert_eq!(CommandError::Validation {
            message: "Item can't be checked out as profile \"Indefinite\" in the loan policy is not recognised.".to_string(),
            reason_code: None,
        }, err);
    }

    #[tokio::test]
    async fn test_should_parse_request_json() {
        let req: CheckOutItemCommandRequest = serde_json::from_str(
            r#"{"item_barcode": "123", "user_id": "u1", "loan_policy_id": "p1"}"#).expect("should parse");
        assert_eq!("123", req.item_barcode.as_str());
        assert_eq!(None, req.proxy_user_id);
    }
}
