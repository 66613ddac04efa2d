use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LoanAction, LoanStatus};
use crate::loans::domain::model::LoanEntity;
use crate::utils::date::serializer;

// LoanDto is the loan snapshot the allocation rules read and the service persists.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanDto {
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

impl LoanDto {
    // an open loan whose due date is set once the loan policy has been applied
    pub fn new(item_id: &str, user_id: &str, loan_policy_id: &str, loan_date: NaiveDateTime) -> Self {
        LoanDto::from(&LoanEntity::new(item_id, user_id, loan_policy_id, loan_date))
    }

    pub fn with_proxy(mut self, proxy_user_id: Option<String>) -> Self {
        self.proxy_user_id = proxy_user_id;
        self
    }

    pub fn is_open(&self) -> bool {
        self.loan_status == LoanStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.loan_status == LoanStatus::Closed
    }

    pub fn close(&mut self, return_date: NaiveDateTime) {
        self.loan_status = LoanStatus::Closed;
        self.action = LoanAction::CheckedIn;
        self.return_date = Some(return_date);
    }
}

impl Identifiable for LoanDto {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> LoanDto {
        LoanDto {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            item_id: other.item_id.to_string(),
            user_id: other.user_id.to_string(),
            proxy_user_id: other.proxy_user_id.clone(),
            loan_policy_id: other.loan_policy_id.to_string(),
            loan_status: other.loan_status,
            action: other.action,
            action_comment: other.action_comment.clone(),
            renewal_count: other.renewal_count,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&LoanDto> for LoanEntity {
    fn from(other: &LoanDto) -> LoanEntity {
        LoanEntity {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            item_id: other.item_id.to_string(),
            user_id: other.user_id.to_string(),
            proxy_user_id: other.proxy_user_id.clone(),
            loan_policy_id: other.loan_policy_id.to_string(),
            loan_status: other.loan_status,
            action: other.action,
            action_comment: other.action_comment.clone(),
            renewal_count: other.renewal_count,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            created_at: other.created_at,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::{LoanAction, LoanStatus};
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::dto::LoanDto;

    #[tokio::test]
    async fn test_should_close_loan() {
        let now = Utc::now().naive_utc();
        let mut loan = LoanDto::new("item1", "user1", "policy1", now);
        assert!(loan.is_open());
        loan.close(now + Duration::days(3));
        assert!(loan.is_closed());
        assert_eq!(LoanAction::CheckedIn, loan.action);
        assert_eq!(Some(now + Duration::days(3)), loan.return_date);
    }

    #[tokio::test]
    async fn test_should_keep_loan_fields_through_entity() {
        let loan = LoanDto::new("item1", "user1", "policy1", Utc::now().naive_utc())
            .with_proxy(Some("proxy1".to_string()));
        let entity = LoanEntity::from(&loan);
        assert_eq!(Some("proxy1".to_string()), entity.proxy_user_id);
        assert_eq!(LoanStatus::Open, entity.loan_status);
        assert_eq!(loan.due_date, LoanDto::from(&entity).due_date);
    }
}
