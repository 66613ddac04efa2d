use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::memory::Versioned;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Interval {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

// Period is a loan or renewal length such as 3 weeks
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Period {
    pub duration: u32,
    pub interval: Interval,
}

impl Period {
    pub fn new(duration: u32, interval: Interval) -> Self {
        Self { duration, interval }
    }

    pub fn days(duration: u32) -> Self {
        Period::new(duration, Interval::Days)
    }

    pub fn weeks(duration: u32) -> Self {
        Period::new(duration, Interval::Weeks)
    }

    // None when the result is outside the representable calendar
    pub fn add_to(&self, date: NaiveDateTime) -> Option<NaiveDateTime> {
        let duration = i64::from(self.duration);
        match self.interval {
            Interval::Minutes => date.checked_add_signed(Duration::minutes(duration)),
            Interval::Hours => date.checked_add_signed(Duration::hours(duration)),
            Interval::Days => date.checked_add_signed(Duration::days(duration)),
            Interval::Weeks => date.checked_add_signed(Duration::weeks(duration)),
            Interval::Months => date.checked_add_months(Months::new(self.duration)),
        }
    }
}

// ScheduleEntry maps loans made between from and to (both inclusive) to one due date
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub due_date: NaiveDateTime,
}

impl ScheduleEntry {
    pub fn new(from: NaiveDate, to: NaiveDate, due_date: NaiveDateTime) -> Self {
        Self { from, to, due_date }
    }

    pub fn covers(&self, date: NaiveDateTime) -> bool {
        let day = date.date();
        self.from <= day && day <= self.to
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FixedDueDateSchedule {
    pub schedule_id: String,
    pub name: String,
    pub entries: Vec<ScheduleEntry>,
}

impl FixedDueDateSchedule {
    pub fn new(name: &str, entries: Vec<ScheduleEntry>) -> Self {
        Self {
            schedule_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            entries,
        }
    }

    // first entry in schedule order whose range covers the date
    pub fn find_entry(&self, date: NaiveDateTime) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.covers(date))
    }
}

// LoansProfile selects how due dates are calculated, unknown profile ids are kept for messages
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum LoansProfile {
    Rolling,
    Fixed,
    Unrecognized(String),
}

impl From<String> for LoansProfile {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Rolling" => LoansProfile::Rolling,
            "Fixed" => LoansProfile::Fixed,
            _ => LoansProfile::Unrecognized(s),
        }
    }
}

impl Display for LoansProfile {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoansProfile::Rolling => write!(f, "Rolling"),
            LoansProfile::Fixed => write!(f, "Fixed"),
            LoansProfile::Unrecognized(profile_id) => write!(f, "{}", profile_id),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RenewFrom {
    SystemDate,
    CurrentDueDate,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RenewalsPolicy {
    pub renew_from: RenewFrom,
    // replaces the loan period for renewals when present
    pub period: Option<Period>,
    // None means unlimited
    pub number_allowed: Option<i64>,
}

impl Default for RenewalsPolicy {
    fn default() -> Self {
        Self {
            renew_from: RenewFrom::SystemDate,
            period: None,
            number_allowed: None,
        }
    }
}

// LoanPolicy is the resolved policy the circulation rules assigned to a loan. The schedules are
// embedded so that due dates can be calculated without further lookups.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanPolicy {
    pub loan_policy_id: String,
    pub version: i64,
    pub name: String,
    pub profile: LoansProfile,
    pub renewable: bool,
    pub period: Option<Period>,
    pub due_date_limit_schedule: Option<FixedDueDateSchedule>,
    pub fixed_due_date_schedule: Option<FixedDueDateSchedule>,
    pub renewals: RenewalsPolicy,
}

impl LoanPolicy {
    pub fn new(name: &str, profile: LoansProfile) -> Self {
        Self {
            loan_policy_id: Uuid::new_v4().to_string(),
            version: 0,
            name: name.to_string(),
            profile,
            renewable: true,
            period: None,
            due_date_limit_schedule: None,
            fixed_due_date_schedule: None,
            renewals: RenewalsPolicy::default(),
        }
    }

    pub fn rolling(name: &str, period: Period) -> Self {
        LoanPolicy {
            period: Some(period),
            ..LoanPolicy::new(name, LoansProfile::Rolling)
        }
    }

    pub fn fixed(name: &str, schedule: FixedDueDateSchedule) -> Self {
        LoanPolicy {
            fixed_due_date_schedule: Some(schedule),
            ..LoanPolicy::new(name, LoansProfile::Fixed)
        }
    }

    pub fn with_limit_schedule(mut self, schedule: FixedDueDateSchedule) -> Self {
        self.due_date_limit_schedule = Some(schedule);
        self
    }

    pub fn with_renewable(mut self, renewable: bool) -> Self {
        self.renewable = renewable;
        self
    }

    pub fn with_renewals(mut self, renewals: RenewalsPolicy) -> Self {
        self.renewals = renewals;
        self
    }
}

impl Identifiable for LoanPolicy {
    fn id(&self) -> String {
        self.loan_policy_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Versioned for LoanPolicy {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::policy::domain::model::{FixedDueDateSchedule, Interval, LoansProfile, Period, ScheduleEntry};
    use crate::utils::date::start_of_day;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[tokio::test]
    async fn test_should_add_periods() {
        let start = start_of_day(day(2021, 1, 31));
        assert_eq!(Some(start_of_day(day(2021, 2, 14))), Period::weeks(2).add_to(start));
        assert_eq!(Some(start_of_day(day(2021, 2, 3))), Period::days(3).add_to(start));
        assert_eq!(Some(start_of_day(day(2021, 2, 28))), Period::new(1, Interval::Months).add_to(start));
        assert_eq!(start.checked_add_signed(chrono::Duration::hours(5)), Period::new(5, Interval::Hours).add_to(start));
    }

    #[tokio::test]
    async fn test_should_cover_inclusive_range() {
        let entry = ScheduleEntry::new(day(2021, 1, 1), day(2021, 1, 31), start_of_day(day(2021, 2, 1)));
        assert!(entry.covers(start_of_day(day(2021, 1, 1))));
        assert!(entry.covers(day(2021, 1, 31).and_hms_opt(23, 59, 0).expect("valid time")));
        assert!(!entry.covers(start_of_day(day(2021, 2, 5))));
    }

    #[tokio::test]
    async fn test_should_find_first_matching_entry() {
        let schedule = FixedDueDateSchedule::new("semesters", vec![
            ScheduleEntry::new(day(2021, 1, 1), day(2021, 1, 31), start_of_day(day(2021, 2, 1))),
            ScheduleEntry::new(day(2021, 2, 1), day(2021, 2, 28), start_of_day(day(2021, 3, 1))),
        ]);
        let entry = schedule.find_entry(start_of_day(day(2021, 2, 5))).expect("should match");
        assert_eq!(start_of_day(day(2021, 3, 1)), entry.due_date);
        assert_eq!(None, schedule.find_entry(start_of_day(day(2021, 4, 1))));
    }

    #[tokio::test]
    async fn test_should_keep_unrecognized_profile_id() {
        assert_eq!(LoansProfile::Rolling, LoansProfile::from("Rolling".to_string()));
        let profile = LoansProfile::from("Indefinite".to_string());
        assert_eq!(LoansProfile::Unrecognized("Indefinite".to_string()), profile);
        assert_eq!("Indefinite", profile.to_string());
    }
}
