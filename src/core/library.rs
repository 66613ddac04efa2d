use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that the record being updated was changed by
    // another writer (conditional check on version failed) or the store is throttling requests.
    // The caller may re-fetch and retry; nothing in this crate retries on its own.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // User-correctable failure, the message is surfaced verbatim to the patron or staff member.
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    // Internal failure, the message is generic and never carries validation text.
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::access_denied(
                    format!("access-denied error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::AccessDenied { .. } => { false }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }

    // Only validation failures are part of the user-facing contract, everything else is internal.
    pub fn is_validation(&self) -> bool {
        matches!(self, LibraryError::Validation { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. } => message,
            LibraryError::AccessDenied { message, .. } => message,
            LibraryError::DuplicateKey { message } => message,
            LibraryError::NotFound { message } => message,
            LibraryError::CurrentlyUnavailable { message, .. } => message,
            LibraryError::Validation { message, .. } => message,
            LibraryError::Serialization { message } => message,
            LibraryError::Runtime { message, .. } => message,
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, .. } => {
                write!(f, "{}", message)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for circulation operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Available,
    CheckedOut,
    CheckedOutHeld,
    CheckedOutRecalled,
    AwaitingPickup,
    Paged,
    InTransit,
    Missing,
    Unknown,
}

impl From<String> for ItemStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Available" => ItemStatus::Available,
            "CheckedOut" => ItemStatus::CheckedOut,
            "CheckedOutHeld" => ItemStatus::CheckedOutHeld,
            "CheckedOutRecalled" => ItemStatus::CheckedOutRecalled,
            "AwaitingPickup" => ItemStatus::AwaitingPickup,
            "Paged" => ItemStatus::Paged,
            "InTransit" => ItemStatus::InTransit,
            "Missing" => ItemStatus::Missing,
            _ => ItemStatus::Unknown,
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ItemStatus::Available => write!(f, "Available"),
            ItemStatus::CheckedOut => write!(f, "CheckedOut"),
            ItemStatus::CheckedOutHeld => write!(f, "CheckedOutHeld"),
            ItemStatus::CheckedOutRecalled => write!(f, "CheckedOutRecalled"),
            ItemStatus::AwaitingPickup => write!(f, "AwaitingPickup"),
            ItemStatus::Paged => write!(f, "Paged"),
            ItemStatus::InTransit => write!(f, "InTransit"),
            ItemStatus::Missing => write!(f, "Missing"),
            ItemStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RequestType {
    Hold,
    Recall,
    Page,
}

impl TryFrom<String> for RequestType {
    type Error = LibraryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "Hold" => Ok(RequestType::Hold),
            "Recall" => Ok(RequestType::Recall),
            "Page" => Ok(RequestType::Page),
            other => Err(LibraryError::validation(
                format!("request type {} is not recognised", other).as_str(), Some("requestType".to_string()))),
        }
    }
}

impl Display for RequestType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RequestType::Hold => write!(f, "Hold"),
            RequestType::Recall => write!(f, "Recall"),
            RequestType::Page => write!(f, "Page"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RequestStatus {
    OpenNotYetFilled,
    OpenAwaitingPickup,
    ClosedFilled,
    ClosedCancelled,
    ClosedPickupExpired,
}

impl RequestStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::OpenNotYetFilled | RequestStatus::OpenAwaitingPickup)
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OpenNotYetFilled" => RequestStatus::OpenNotYetFilled,
            "OpenAwaitingPickup" => RequestStatus::OpenAwaitingPickup,
            "ClosedFilled" => RequestStatus::ClosedFilled,
            "ClosedCancelled" => RequestStatus::ClosedCancelled,
            "ClosedPickupExpired" => RequestStatus::ClosedPickupExpired,
            _ => RequestStatus::OpenNotYetFilled,
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RequestStatus::OpenNotYetFilled => write!(f, "OpenNotYetFilled"),
            RequestStatus::OpenAwaitingPickup => write!(f, "OpenAwaitingPickup"),
            RequestStatus::ClosedFilled => write!(f, "ClosedFilled"),
            RequestStatus::ClosedCancelled => write!(f, "ClosedCancelled"),
            RequestStatus::ClosedPickupExpired => write!(f, "ClosedPickupExpired"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FulfilmentPreference {
    HoldShelf,
    Delivery,
}

impl From<String> for FulfilmentPreference {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Delivery" => FulfilmentPreference::Delivery,
            _ => FulfilmentPreference::HoldShelf,
        }
    }
}

impl Display for FulfilmentPreference {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FulfilmentPreference::HoldShelf => write!(f, "HoldShelf"),
            FulfilmentPreference::Delivery => write!(f, "Delivery"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum LoanStatus {
    Open,
    Closed,
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Closed" => LoanStatus::Closed,
            _ => LoanStatus::Open,
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Open => write!(f, "Open"),
            LoanStatus::Closed => write!(f, "Closed"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum LoanAction {
    #[serde(rename = "checkedout")]
    CheckedOut,
    #[serde(rename = "renewed")]
    Renewed,
    #[serde(rename = "renewed through override")]
    RenewedThroughOverride,
    #[serde(rename = "checkedin")]
    CheckedIn,
}

impl From<String> for LoanAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "renewed" => LoanAction::Renewed,
            "renewed through override" => LoanAction::RenewedThroughOverride,
            "checkedin" => LoanAction::CheckedIn,
            _ => LoanAction::CheckedOut,
        }
    }
}

impl Display for LoanAction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanAction::CheckedOut => write!(f, "checkedout"),
            LoanAction::Renewed => write!(f, "renewed"),
            LoanAction::RenewedThroughOverride => write!(f, "renewed through override"),
            LoanAction::CheckedIn => write!(f, "checkedin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{ItemStatus, LibraryError, LoanAction, RequestStatus, RequestType};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        let err = LibraryError::validation("test", None);
        assert!(err.is_validation());
        assert_eq!("test", err.to_string());
    }

    #[tokio::test]
    async fn test_should_not_treat_runtime_as_validation() {
        assert!(!LibraryError::runtime("test", None).is_validation());
        assert!(!LibraryError::not_found("test").is_validation());
        assert_eq!("test", LibraryError::runtime("test", None).message());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("400".to_string()), false), LibraryError::AccessDenied{ message: _, reason_code: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(true, LibraryError::unavailable("test", None, true).retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_item_status() {
        let statuses = vec![
            ItemStatus::Available,
            ItemStatus::CheckedOut,
            ItemStatus::CheckedOutHeld,
            ItemStatus::CheckedOutRecalled,
            ItemStatus::AwaitingPickup,
            ItemStatus::Paged,
            ItemStatus::InTransit,
            ItemStatus::Missing,
            ItemStatus::Unknown,
        ];
        for status in statuses {
            let str = status.to_string();
            assert_eq!(status, ItemStatus::from(str));
        }
    }

    #[tokio::test]
    async fn test_should_reject_unknown_request_type() {
        assert_eq!(RequestType::Recall, RequestType::try_from("Recall".to_string()).expect("should parse"));
        let err = RequestType::try_from("Borrow".to_string()).expect_err("should reject");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_should_only_treat_open_statuses_as_open() {
        assert!(RequestStatus::OpenNotYetFilled.is_open());
        assert!(RequestStatus::OpenAwaitingPickup.is_open());
        assert!(!RequestStatus::ClosedFilled.is_open());
        assert!(!RequestStatus::ClosedCancelled.is_open());
    }

    #[tokio::test]
    async fn test_should_label_override_renewal() {
        assert_eq!("renewed", LoanAction::Renewed.to_string());
        assert_eq!("renewed through override", LoanAction::RenewedThroughOverride.to_string());
        assert_eq!(LoanAction::RenewedThroughOverride, LoanAction::from("renewed through override".to_string()));
    }
}
