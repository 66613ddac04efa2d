use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::{LoanAction, LoanStatus};
use crate::core::memory::Versioned;
use crate::utils::date::serializer;

// LoanEntity abstracts the stored record of an item lent to a borrower.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub item_id: String,
    pub user_id: String,
    pub proxy_user_id: Option<String>,
    pub loan_policy_id: String,
    pub loan_status: LoanStatus,
    pub action: LoanAction,
    pub action_comment: Option<String>,
    pub renewal_count: i64,
    #[serde(with = "serializer")]
    pub loan_date: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn new(item_id: &str, user_id: &str, loan_policy_id: &str, loan_date: NaiveDateTime) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
            proxy_user_id: None,
            loan_policy_id: loan_policy_id.to_string(),
            loan_status: LoanStatus::Open,
            action: LoanAction::CheckedOut,
            action_comment: None,
            renewal_count: 0,
            loan_date,
            due_date: loan_date,
            return_date: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for LoanEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
