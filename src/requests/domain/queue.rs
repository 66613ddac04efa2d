use serde::Serialize;
use crate::requests::dto::RequestDto;

// RequestQueue is the position-ordered view of the requests against a single item. Only open
// requests count towards the head, a closed request keeps its slot until it is removed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RequestQueue {
    requests: Vec<RequestDto>,
}

impl RequestQueue {
    pub fn new(mut requests: Vec<RequestDto>) -> Self {
        requests.sort_by_key(|r| r.position);
        Self { requests }
    }

    pub fn has_outstanding_requests(&self) -> bool {
        self.requests.iter().any(RequestDto::is_open)
    }

    // first open request by position, not the most severe request type
    pub fn highest_priority_request(&self) -> Option<&RequestDto> {
        self.requests.iter().find(|r| r.is_open())
    }

    pub fn requests(&self) -> &[RequestDto] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn position_of(&self, request_id: &str) -> Option<i64> {
        self.requests.iter().find(|r| r.request_id == request_id).map(|r| r.position)
    }

    pub fn next_position(&self) -> i64 {
        self.requests.iter().map(|r| r.position).max().unwrap_or(0) + 1
    }

    pub fn without(&self, request_id: &str) -> RequestQueue {
        RequestQueue {
            requests: self.requests.iter().filter(|r| r.request_id != request_id).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{RequestStatus, RequestType};
    use crate::requests::domain::queue::RequestQueue;
    use crate::requests::dto::RequestDto;

    fn request(request_type: RequestType, position: i64) -> RequestDto {
        RequestDto::new("item1", format!("user{}", position).as_str(), request_type, position)
    }

    #[tokio::test]
    async fn test_should_report_empty_queue() {
        let queue = RequestQueue::new(vec![]);
        assert!(!queue.has_outstanding_requests());
        assert_eq!(None, queue.highest_priority_request());
        assert_eq!(1, queue.next_position());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_should_order_by_position_not_type() {
        let queue = RequestQueue::new(vec![request(RequestType::Recall, 2), request(RequestType::Hold, 1)]);
        let head = queue.highest_priority_request().expect("should have head");
        assert_eq!(RequestType::Hold, head.request_type);
        assert_eq!(1, head.position);
        assert_eq!(3, queue.next_position());
    }

    #[tokio::test]
    async fn test_should_skip_closed_requests_for_head() {
        let mut filled = request(RequestType::Hold, 1);
        filled.change_status(RequestStatus::ClosedFilled);
        let queue = RequestQueue::new(vec![filled, request(RequestType::Recall, 2)]);
        assert!(queue.has_outstanding_requests());
        assert_eq!(RequestType::Recall, queue.highest_priority_request().expect("should have head").request_type);
        assert_eq!(2, queue.len());
    }

    #[tokio::test]
    async fn test_should_not_be_outstanding_when_all_closed() {
        let mut cancelled = request(RequestType::Page, 1);
        cancelled.change_status(RequestStatus::ClosedCancelled);
        let queue = RequestQueue::new(vec![cancelled]);
        assert!(!queue.has_outstanding_requests());
        assert_eq!(None, queue.highest_priority_request());
    }

    #[tokio::test]
    async fn test_should_remove_request() {
        let first = request(RequestType::Hold, 1);
        let second = request(RequestType::Recall, 2);
        let queue = RequestQueue::new(vec![first.clone(), second.clone()]);
        assert_eq!(Some(2), queue.position_of(second.request_id.as_str()));
        let remaining = queue.without(first.request_id.as_str());
        assert_eq!(1, remaining.len());
        assert_eq!(None, remaining.position_of(first.request_id.as_str()));
        assert_eq!(Some(&second), remaining.highest_priority_request());
        assert_eq!(2, queue.len());
    }
}
