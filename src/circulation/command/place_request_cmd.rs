use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::RequestAndRelatedRecords;
use crate::core::command::{Command, CommandError};
use crate::core::library::{FulfilmentPreference, LibraryResult, RequestType};
use crate::items::dto::ItemDto;
use crate::requests::dto::RequestDto;

pub struct PlaceRequestCommand {
    circulation_service: Box<dyn CirculationService>,
}

impl PlaceRequestCommand {
    pub fn new(circulation_service: Box<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceRequestCommandRequest {
    item_id: String,
    requester_id: String,
    proxy_user_id: Option<String>,
    request_type: String,
    fulfilment_preference: Option<String>,
}

impl PlaceRequestCommandRequest {
    pub fn new(item_id: &str, requester_id: &str, request_type: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            requester_id: requester_id.to_string(),
            proxy_user_id: None,
            request_type: request_type.to_string(),
            fulfilment_preference: None,
        }
    }

    // the queue position is assigned when the request is placed
    pub fn build_request(&self) -> LibraryResult<RequestDto> {
        let request_type = RequestType::try_from(self.request_type.clone())?;
        let mut request = RequestDto::new(self.item_id.as_str(), self.requester_id.as_str(), request_type, 0);
        request.proxy_user_id = self.proxy_user_id.clone();
        if let Some(preference) = &self.fulfilment_preference {
            request.fulfilment_preference = FulfilmentPreference::from(preference.clone());
        }
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceRequestCommandResponse {
    pub request: RequestDto,
    pub item: ItemDto,
}

impl PlaceRequestCommandResponse {
    pub fn new(records: RequestAndRelatedRecords) -> Self {
        Self {
            request: records.request,
            item: records.item,
        }
    }
}

#[async_trait]
impl Command<PlaceRequestCommandRequest, PlaceRequestCommandResponse> for PlaceRequestCommand {
    async fn execute(&self, req: PlaceRequestCommandRequest) -> Result<PlaceRequestCommandResponse, CommandError> {
        let request = req.build_request()?;
        self.circulation_service.place_request(request)
            .await.map_err(CommandError::from).map(PlaceRequestCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::place_request_cmd::{PlaceRequestCommand, PlaceRequestCommandRequest};
    use crate::circulation::factory::tests::memory_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::library::{FulfilmentPreference, ItemStatus, RequestType};
    use crate::policy::domain::model::{LoanPolicy, Period};

    #[tokio::test]
    async fn test_should_run_place_request() {
        let policy = LoanPolicy::rolling("three weeks", Period::weeks(3));
        let (svc, item) = memory_service(&policy).await;
        let cmd = PlaceRequestCommand::new(svc);
        let res = cmd.execute(PlaceRequestCommandRequest::new(item.item_id.as_str(), "requester", "Page"))
            .await.expect("should place request");
        assert_eq!(RequestType::Page, res.request.request_type);
        assert_eq!(1, res.request.position);
        assert_eq!(ItemStatus::Paged, res.item.item_status);
    }

    #[tokio::test]
    async fn test_should_reject_unknown_request_type() {
        let policy = LoanPolicy::rolling("three weeks", Period::weeks(3));
        let (svc, item) = memory_service(&policy).await;
        let cmd = PlaceRequestCommand::new(svc);
        let err = cmd.execute(PlaceRequestCommandRequest::new(item.item_id.as_str(), "requester", "Borrow"))
            .await.expect_err("should reject");
        assert!(matches!(err, CommandError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_should_build_delivery_request() {
        let req: PlaceRequestCommandRequest = serde_json::from_str(
            r#"{"item_id": "i1", "requester_id": "u1", "request_type": "Hold", "fulfilment_preference": "Delivery"}"#)
            .expect("should parse");
        let request = req.build_request().expect("should build");
        assert_eq!(FulfilmentPreference::Delivery, request.fulfilment_preference);
        assert!(!request.is_fulfillable());
    }
}
