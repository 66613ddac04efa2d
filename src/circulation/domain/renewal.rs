use chrono::NaiveDateTime;
use crate::core::library::{LibraryError, LibraryResult, LoanAction, RequestType};
use crate::loans::dto::LoanDto;
use crate::policy::domain::due_date::DueDateStrategy;
use crate::policy::domain::model::LoanPolicy;
use crate::requests::domain::queue::RequestQueue;

#[derive(Debug, Clone, PartialEq)]
pub enum RenewalMode {
    Standard,
    // staff override, skips the queue and policy checks
    Override {
        comment: String,
        due_date: Option<NaiveDateTime>,
    },
}

// Renewal is the accepted outcome, applying it is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Renewal {
    pub due_date: NaiveDateTime,
    pub action: LoanAction,
    pub comment: Option<String>,
}

impl Renewal {
    pub fn apply_to(&self, mut loan: LoanDto) -> LoanDto {
        loan.due_date = self.due_date;
        loan.action = self.action;
        loan.action_comment = self.comment.clone();
        loan.renewal_count += 1;
        loan
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenewalGate;

impl RenewalGate {
    pub fn renew(&self, loan: &LoanDto, request_queue: &RequestQueue, policy: &LoanPolicy,
                 now: NaiveDateTime, mode: &RenewalMode) -> LibraryResult<Renewal> {
        match mode {
            RenewalMode::Standard => {
                let recalled = request_queue.highest_priority_request()
                    .map(|head| head.request_type == RequestType::Recall)
                    .unwrap_or(false);
                if recalled {
                    return Err(LibraryError::validation(
                        "Items cannot be renewed when there is an active recall request", Some("request".to_string())));
                }
                if !policy.renewable {
                    return Err(LibraryError::validation(
                        "item is not renewable under this policy", Some("loanPolicy".to_string())));
                }
                if let Some(allowed) = policy.renewals.number_allowed {
                    if loan.renewal_count >= allowed {
                        return Err(LibraryError::validation(
                            "loan has reached its maximum number of renewals", Some("loanPolicy".to_string())));
                    }
                }
                Ok(Renewal {
                    due_date: self.proposed_due_date(loan, policy, now)?,
                    action: LoanAction::Renewed,
                    comment: None,
                })
            }
            RenewalMode::Override { comment, due_date } => {
                let comment = comment.trim();
                if comment.is_empty() {
                    return Err(LibraryError::validation(
                        "override renewal requires a comment", Some("comment".to_string())));
                }
                let due_date = match due_date {
                    Some(due_date) if *due_date <= loan.loan_date => {
                        return Err(LibraryError::validation(
                            "due date must be after the loan date", Some("dueDate".to_string())));
                    }
                    Some(due_date) => *due_date,
                    None => self.proposed_due_date(loan, policy, now)?,
                };
                Ok(Renewal {
                    due_date,
                    action: LoanAction::RenewedThroughOverride,
                    comment: Some(comment.to_string()),
                })
            }
        }
    }

    fn proposed_due_date(&self, loan: &LoanDto, policy: &LoanPolicy, now: NaiveDateTime) -> LibraryResult<NaiveDateTime> {
        let due_date = DueDateStrategy::for_renewal(policy).calculate_due_date(loan, now)?;
        if due_date <= loan.due_date {
            return Err(LibraryError::validation("renewal would not change the due date", None));
        }
        Ok(due_date)
    }
}
