use chrono::NaiveDateTime;
use crate::core::library::{LibraryError, LibraryResult};
use crate::loans::dto::LoanDto;
use crate::policy::domain::model::{FixedDueDateSchedule, LoanPolicy, LoansProfile, Period, RenewFrom};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DueDateMode {
    CheckOut,
    Renewal,
}

impl DueDateMode {
    fn verb(&self) -> &'static str {
        match self {
            DueDateMode::CheckOut => "checked out",
            DueDateMode::Renewal => "renewed",
        }
    }
}

// DueDateStrategy is resolved once from a loan policy for either a check out or a renewal.
#[derive(Debug, PartialEq, Clone)]
pub enum DueDateStrategy {
    Rolling {
        mode: DueDateMode,
        period: Option<Period>,
        limit_schedule: Option<FixedDueDateSchedule>,
        renew_from: RenewFrom,
    },
    FixedSchedule {
        mode: DueDateMode,
        schedule: Option<FixedDueDateSchedule>,
    },
    Unrecognized {
        mode: DueDateMode,
        profile_id: String,
    },
}

impl DueDateStrategy {
    pub fn for_check_out(policy: &LoanPolicy) -> Self {
        DueDateStrategy::from_policy(policy, DueDateMode::CheckOut)
    }

    pub fn for_renewal(policy: &LoanPolicy) -> Self {
        DueDateStrategy::from_policy(policy, DueDateMode::Renewal)
    }

    fn from_policy(policy: &LoanPolicy, mode: DueDateMode) -> Self {
        match &policy.profile {
            LoansProfile::Rolling => {
                let period = match mode {
                    DueDateMode::CheckOut => policy.period,
                    DueDateMode::Renewal => policy.renewals.period.or(policy.period),
                };
                DueDateStrategy::Rolling {
                    mode,
                    period,
                    limit_schedule: policy.due_date_limit_schedule.clone(),
                    renew_from: policy.renewals.renew_from,
                }
            }
            LoansProfile::Fixed => DueDateStrategy::FixedSchedule {
                mode,
                schedule: policy.fixed_due_date_schedule.clone(),
            },
            LoansProfile::Unrecognized(profile_id) => DueDateStrategy::Unrecognized {
                mode,
                profile_id: profile_id.to_string(),
            },
        }
    }

    pub fn mode(&self) -> DueDateMode {
        match self {
            DueDateStrategy::Rolling { mode, .. } => *mode,
            DueDateStrategy::FixedSchedule { mode, .. } => *mode,
            DueDateStrategy::Unrecognized { mode, .. } => *mode,
        }
    }

    pub fn calculate_due_date(&self, loan: &LoanDto, now: NaiveDateTime) -> LibraryResult<NaiveDateTime> {
        let due_date = match self {
            DueDateStrategy::Rolling { mode, period, limit_schedule, renew_from } => {
                let period = period.ok_or_else(|| LibraryError::validation(
                    format!("Item can't be {} as the loan period in the loan policy is not recognised.",
                            mode.verb()).as_str(), None))?;
                let (base, reference) = match (mode, renew_from) {
                    (DueDateMode::CheckOut, _) => (loan.loan_date, loan.loan_date),
                    (DueDateMode::Renewal, RenewFrom::SystemDate) => (now, now),
                    (DueDateMode::Renewal, RenewFrom::CurrentDueDate) => (loan.due_date, now),
                };
                let due_date = period.add_to(base).ok_or_else(|| LibraryError::validation(
                    format!("Item can't be {} as the loan period in the loan policy is not recognised.",
                            mode.verb()).as_str(), None))?;
                match limit_schedule.as_ref().and_then(|s| s.find_entry(reference)) {
                    Some(entry) if entry.due_date < due_date => entry.due_date,
                    _ => due_date,
                }
            }
            DueDateStrategy::FixedSchedule { mode, schedule } => {
                let reference = match mode {
                    DueDateMode::CheckOut => loan.loan_date,
                    DueDateMode::Renewal => now,
                };
                schedule.as_ref().and_then(|s| s.find_entry(reference)).map(|e| e.due_date)
                    .ok_or_else(|| LibraryError::validation("no schedule period matches the loan date", None))?
            }
            DueDateStrategy::Unrecognized { mode, profile_id } => {
                return Err(LibraryError::validation(
                    format!("Item can't be {} as profile \"{}\" in the loan policy is not recognised.",
                            mode.verb(), profile_id).as_str(), None));
            }
        };
        if due_date <= loan.loan_date {
            return Err(LibraryError::validation("due date must be after the loan date", None));
        }
        Ok(due_date)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use crate::core::library::LibraryError;
    use crate::loans::dto::LoanDto;
    use crate::policy::domain::due_date::{DueDateMode, DueDateStrategy};
    use crate::policy::domain::model::{FixedDueDateSchedule, LoanPolicy, LoansProfile, Period, RenewFrom, RenewalsPolicy, ScheduleEntry};
    use crate::utils::date::start_of_day;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        start_of_day(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
    }

    fn january_schedule() -> FixedDueDateSchedule {
        FixedDueDateSchedule::new("january", vec![ScheduleEntry::new(
            date(2021, 1, 1).date(), date(2021, 1, 31).date(), date(2021, 2, 1))])
    }

    fn loan_at(loan_date: NaiveDateTime) -> LoanDto {
        LoanDto::new("item1", "user1", "policy1", loan_date)
    }

    fn validation_message(err: LibraryError) -> String {
        assert!(err.is_validation());
        err.message().to_string()
    }

    #[tokio::test]
    async fn test_should_add_rolling_period() {
        let policy = LoanPolicy::rolling("two weeks", Period::weeks(2));
        let strategy = DueDateStrategy::for_check_out(&policy);
        let due = strategy.calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 1)).expect("should calculate");
        assert_eq!(date(2021, 1, 15), due);
        assert_eq!(DueDateMode::CheckOut, strategy.mode());
    }

    #[tokio::test]
    async fn test_should_truncate_rolling_to_limit_schedule() {
        let limit = FixedDueDateSchedule::new("limit", vec![ScheduleEntry::new(
            date(2021, 1, 1).date(), date(2021, 1, 31).date(), date(2021, 1, 10))]);
        let policy = LoanPolicy::rolling("two weeks", Period::weeks(2)).with_limit_schedule(limit);
        let due = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 1)).expect("should calculate");
        assert_eq!(date(2021, 1, 10), due);
    }

    #[tokio::test]
    async fn test_should_ignore_limit_schedule_not_covering_loan() {
        let limit = FixedDueDateSchedule::new("limit", vec![ScheduleEntry::new(
            date(2021, 3, 1).date(), date(2021, 3, 31).date(), date(2021, 3, 10))]);
        let policy = LoanPolicy::rolling("two weeks", Period::weeks(2)).with_limit_schedule(limit);
        let due = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 1)).expect("should calculate");
        assert_eq!(date(2021, 1, 15), due);
    }

    #[tokio::test]
    async fn test_should_use_fixed_schedule() {
        let policy = LoanPolicy::fixed("semester", january_schedule());
        let due = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 15)), date(2021, 1, 15)).expect("should calculate");
        assert_eq!(date(2021, 2, 1), due);
    }

    #[tokio::test]
    async fn test_should_fail_fixed_schedule_outside_ranges() {
        let policy = LoanPolicy::fixed("semester", january_schedule());
        let err = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 2, 5)), date(2021, 2, 5)).expect_err("should fail");
        assert_eq!("no schedule period matches the loan date", validation_message(err));
    }

    #[tokio::test]
    async fn test_should_fail_unrecognized_profile_on_check_out() {
        let policy = LoanPolicy::new("odd", LoansProfile::Unrecognized("Indefinite".to_string()));
        let err = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 1)).expect_err("should fail");
        assert_eq!("Item can't be checked out as profile \"Indefinite\" in the loan policy is not recognised.",
                   validation_message(err));
    }

    #[tokio::test]
    async fn test_should_fail_unrecognized_profile_on_renewal() {
        let policy = LoanPolicy::new("odd", LoansProfile::Unrecognized("Indefinite".to_string()));
        let err = DueDateStrategy::for_renewal(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 5)).expect_err("should fail");
        assert_eq!("Item can't be renewed as profile \"Indefinite\" in the loan policy is not recognised.",
                   validation_message(err));
    }

    #[tokio::test]
    async fn test_should_fail_rolling_without_period() {
        let policy = LoanPolicy::new("no period", LoansProfile::Rolling);
        let err = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 1)).expect_err("should fail");
        assert_eq!("Item can't be checked out as the loan period in the loan policy is not recognised.",
                   validation_message(err));
    }

    #[tokio::test]
    async fn test_should_renew_from_system_date() {
        let policy = LoanPolicy::rolling("two weeks", Period::weeks(2));
        let due = DueDateStrategy::for_renewal(&policy)
            .calculate_due_date(&loan_at(date(2021, 1, 1)), date(2021, 1, 10)).expect("should calculate");
        assert_eq!(date(2021, 1, 24), due);
    }

    #[tokio::test]
    async fn test_should_renew_from_current_due_date_with_renewal_period() {
        let policy = LoanPolicy::rolling("two weeks", Period::weeks(2))
            .with_renewals(RenewalsPolicy {
                renew_from: RenewFrom::CurrentDueDate,
                period: Some(Period::days(7)),
                number_allowed: None,
            });
        let mut loan = loan_at(date(2021, 1, 1));
        loan.due_date = date(2021, 1, 15);
        let due = DueDateStrategy::for_renewal(&policy)
            .calculate_due_date(&loan, date(2021, 1, 10)).expect("should calculate");
        assert_eq!(date(2021, 1, 22), due);
    }

    #[tokio::test]
    async fn test_should_reject_fixed_due_date_before_loan() {
        let policy = LoanPolicy::fixed("semester", january_schedule());
        let last_minute = date(2021, 2, 1) - Duration::minutes(1);
        let due = DueDateStrategy::for_check_out(&policy)
            .calculate_due_date(&loan_at(last_minute), last_minute).expect("should calculate");
        assert_eq!(date(2021, 2, 1), due);

        let late = FixedDueDateSchedule::new("stale", vec![ScheduleEntry::new(
            date(2021, 1, 1).date(), date(2021, 1, 31).date(), date(2021, 1, 5))]);
        let err = DueDateStrategy::for_check_out(&LoanPolicy::fixed("stale", late))
            .calculate_due_date(&loan_at(date(2021, 1, 15)), date(2021, 1, 15)).expect_err("should fail");
        assert_eq!("due date must be after the loan date", validation_message(err));
    }
}
