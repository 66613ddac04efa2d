use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::LoanAndRelatedRecords;
use crate::core::command::{Command, CommandError};
use crate::items::dto::ItemDto;
use crate::loans::dto::LoanDto;

pub struct RenewLoanCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl RenewLoanCommand {
    pub fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

// a comment turns the renewal into an override, due_date is only honoured for overrides
#[derive(Debug, Deserialize)]
pub struct RenewLoanCommandRequest {
    loan_id: String,
    comment: Option<String>,
    due_date: Option<NaiveDateTime>,
}

impl RenewLoanCommandRequest {
    pub fn new(loan_id: &str) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            comment: None,
            due_date: None,
        }
    }

    pub fn with_override(loan_id: &str, comment: &str, due_date: Option<NaiveDateTime>) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            comment: Some(comment.to_string()),
            due_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenewLoanCommandResponse {
    pub loan: LoanDto,
    pub item: ItemDto,
}

impl RenewLoanCommandResponse {
    pub fn new(records: LoanAndRelatedRecords) -> Self {
        Self {
            loan: records.loan,
            item: records.item,
        }
    }
}

#[async_trait]
impl Command<RenewLoanCommandRequest, RenewLoanCommandResponse> for RenewLoanCommand {
    async fn execute(&self, req: RenewLoanCommandRequest) -> Result<RenewLoanCommandResponse, CommandError> {
        let now = Utc::now().naive_utc();
        let res = match req.comment {
            Some(comment) => {
                self.circulation_service.override_renewal(req.loan_id.as_str(), comment.as_str(), req.due_date, now).await
            }
            None => self.circulation_service.renew(req.loan_id.as_str(), now).await,
        };
        res.map_err(CommandError::from).map(RenewLoanCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::circulation::command::renew_loan_cmd::{RenewLoanCommand, RenewLoanCommandRequest};
    use crate::circulation::domain::CirculationService;
    use crate::circulation::factory::tests::memory_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::library::LoanAction;
    use crate::policy::domain::model::{LoanPolicy, Period};

    #[tokio::test]
    async fn test_should_run_renew_and_override() {
        let policy = LoanPolicy::rolling("three weeks", Period::weeks(3)).with_renewable(false);
        let (svc, item) = memory_service(&policy).await;
        let checked_out = svc.check_out(item.barcode.as_str(), "borrower", None, policy.loan_policy_id.as_str(),
                                        Utc::now().naive_utc() - Duration::days(7)).await.expect("should check out");
        let cmd = RenewLoanCommand::new(svc);
        let loan_id = checked_out.loan.loan_id.as_str();

        let err = cmd.execute(RenewLoanCommandRequest::new(loan_id)).await.expect_err("should reject");
        assert!(matches!(err, CommandError::Validation { .. }));

        let due_date = checked_out.loan.due_date + Duration::days(30);
        let res = cmd.execute(RenewLoanCommandRequest::with_override(loan_id, "approved by supervisor", Some(due_date)))
            .await.expect("should override");
        assert_eq!(LoanAction::RenewedThroughOverride, res.loan.action);
        assert_eq!(due_date, res.loan.due_date);
        assert_eq!(Some("approved by supervisor".to_string()), res.loan.action_comment);
    }
}
