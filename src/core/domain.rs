use std::collections::HashMap;
use std::env;
use serde::{Deserialize, Serialize};
use crate::core::library::{ItemStatus, LibraryError, LibraryResult, RequestType};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts config options for the circulation desk of a branch
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    // status an item takes while the given request type heads its queue
    pub request_item_statuses: HashMap<RequestType, ItemStatus>,
    pub request_page_size: usize,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            request_item_statuses: HashMap::from([
                (RequestType::Hold, ItemStatus::CheckedOutHeld),
                (RequestType::Recall, ItemStatus::CheckedOutRecalled),
                (RequestType::Page, ItemStatus::Paged),
            ]),
            request_page_size: 100,
        }
    }

    // Builds configuration from CIRCULATION_* environment variables on top of the defaults.
    pub fn from_env() -> LibraryResult<Self> {
        let branch_id = env::var("CIRCULATION_BRANCH_ID").unwrap_or_else(|_| "default".to_string());
        let mut config = Configuration::new(branch_id.as_str());
        for (request_type, key) in [
            (RequestType::Hold, "CIRCULATION_HOLD_STATUS"),
            (RequestType::Recall, "CIRCULATION_RECALL_STATUS"),
            (RequestType::Page, "CIRCULATION_PAGE_STATUS"),
        ] {
            if let Ok(value) = env::var(key) {
                let status = ItemStatus::from(value.clone());
                if status == ItemStatus::Unknown {
                    return Err(LibraryError::validation(
                        format!("{} has unrecognised item status {}", key, value).as_str(), Some(key.to_string())));
                }
                config.request_item_statuses.insert(request_type, status);
            }
        }
        if let Ok(value) = env::var("CIRCULATION_REQUEST_PAGE_SIZE") {
            config.request_page_size = parse_page_size(value.as_str())?;
        }
        Ok(config)
    }

    pub fn with_request_item_status(mut self, request_type: RequestType, status: ItemStatus) -> Self {
        self.request_item_statuses.insert(request_type, status);
        self
    }

    pub fn item_status_for(&self, request_type: RequestType) -> Option<ItemStatus> {
        self.request_item_statuses.get(&request_type).copied()
    }
}

fn parse_page_size(value: &str) -> LibraryResult<usize> {
    let page_size = value.parse::<usize>().map_err(|err| LibraryError::validation(
        format!("CIRCULATION_REQUEST_PAGE_SIZE {} is not a number: {}", value, err).as_str(),
        Some("CIRCULATION_REQUEST_PAGE_SIZE".to_string())))?;
    if page_size == 0 {
        return Err(LibraryError::validation("CIRCULATION_REQUEST_PAGE_SIZE must be greater than zero",
                                            Some("CIRCULATION_REQUEST_PAGE_SIZE".to_string())));
    }
    Ok(page_size)
}

#[cfg(test)]
mod tests {
    use crate::core::domain::{parse_page_size, Configuration};
    use crate::core::library::{ItemStatus, RequestType};

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!("test", config.branch_id.as_str());
        assert_eq!(Some(ItemStatus::CheckedOutHeld), config.item_status_for(RequestType::Hold));
        assert_eq!(Some(ItemStatus::CheckedOutRecalled), config.item_status_for(RequestType::Recall));
        assert_eq!(Some(ItemStatus::Paged), config.item_status_for(RequestType::Page));
    }

    #[tokio::test]
    async fn test_should_override_request_item_status() {
        let config = Configuration::new("test")
            .with_request_item_status(RequestType::Hold, ItemStatus::AwaitingPickup);
        assert_eq!(Some(ItemStatus::AwaitingPickup), config.item_status_for(RequestType::Hold));
    }

    #[tokio::test]
    async fn test_should_read_config_from_env() {
        std::env::set_var("CIRCULATION_PAGE_STATUS", "AwaitingPickup");
        let config = Configuration::from_env().expect("should build config");
        assert_eq!(Some(ItemStatus::AwaitingPickup), config.item_status_for(RequestType::Page));

        std::env::set_var("CIRCULATION_PAGE_STATUS", "Shelved somewhere");
        assert!(Configuration::from_env().is_err());
        std::env::remove_var("CIRCULATION_PAGE_STATUS");
    }

    #[tokio::test]
    async fn test_should_reject_zero_request_page_size() {
        assert_eq!(25, parse_page_size("25").expect("should parse"));
        let err = parse_page_size("0").expect_err("should reject zero");
        assert!(err.is_validation());
        assert!(parse_page_size("many").is_err());
    }

    #[tokio::test]
    async fn test_should_serialize_config() {
        let config = Configuration::new("test");
        let json = serde_json::to_string(&config).expect("should serialize");
        let loaded: Configuration = serde_json::from_str(json.as_str()).expect("should deserialize");
        assert_eq!(config, loaded);
    }
}
