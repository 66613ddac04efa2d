use std::collections::HashMap;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

// Versioned lets the in-memory store advance the version the same way the ddb update does
pub trait Versioned: Identifiable {
    fn set_version(&mut self, version: i64);
}

// MemoryRepository keeps records in a concurrent map keyed by id. It backs local runs and tests
// and mirrors the conditional-version semantics of the ddb repositories.
pub struct MemoryRepository<Entity> {
    records: DashMap<String, Entity>,
}

impl<Entity> Default for MemoryRepository<Entity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Entity> MemoryRepository<Entity> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn matches_predicate<Entity: Serialize>(entity: &Entity, predicate: &HashMap<String, String>) -> LibraryResult<bool> {
    if predicate.is_empty() {
        return Ok(true);
    }
    let value = serde_json::to_value(entity)?;
    for (k, expected) in predicate {
        let matched = match value.get(k) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *expected,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

#[async_trait]
impl<Entity> Repository<Entity> for MemoryRepository<Entity>
    where Entity: Versioned + Serialize + Clone + Sync + Send {
    async fn create(&self, entity: &Entity) -> LibraryResult<usize> {
        let id = entity.id();
        if self.records.contains_key(&id) {
            return Err(LibraryError::duplicate_key(format!("record {} already exists", id).as_str()));
        }
        self.records.insert(id, entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &Entity) -> LibraryResult<usize> {
        let id = entity.id();
        match self.records.get_mut(&id) {
            Some(mut existing) => {
                if existing.version() != entity.version() {
                    return Err(LibraryError::unavailable(
                        format!("record {} was updated concurrently, expected version {} but found {}",
                                id, entity.version(), existing.version()).as_str(), None, true));
                }
                let mut updated = entity.clone();
                updated.set_version(entity.version() + 1);
                *existing = updated;
                Ok(1)
            }
            None => Err(LibraryError::not_found(format!("record not found for {}", id).as_str())),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<Entity> {
        self.records.get(id).map(|e| e.value().clone())
            .ok_or_else(|| LibraryError::not_found(format!("record not found for {}", id).as_str()))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        Ok(self.records.remove(id).map(|_| 1).unwrap_or(0))
    }

    // the page token is the offset into the id-ordered result set
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>> {
        if page_size == 0 {
            return Err(LibraryError::validation("page size must be greater than zero", None));
        }
        let mut matched = vec![];
        for entry in self.records.iter() {
            if matches_predicate(entry.value(), predicate)? {
                matched.push(entry.value().clone());
            }
        }
        matched.sort_by_key(|e| e.id());
        let offset = match page {
            Some(token) => token.parse::<usize>().map_err(|err| LibraryError::validation(
                format!("invalid page token {}: {}", token, err).as_str(), None))?,
            None => 0,
        };
        let records: Vec<Entity> = matched.iter().skip(offset).take(page_size).cloned().collect();
        let next_page = if offset + records.len() < matched.len() {
            Some((offset + records.len()).to_string())
        } else {
            None
        };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use serde::Serialize;
    use crate::core::domain::Identifiable;
    use crate::core::library::LibraryError;
    use crate::core::memory::{MemoryRepository, Versioned};
    use crate::core::repository::Repository;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Shelf {
        shelf_id: String,
        version: i64,
        floor: String,
    }

    impl Identifiable for Shelf {
        fn id(&self) -> String {
            self.shelf_id.to_string()
        }

        fn version(&self) -> i64 {
            self.version
        }
    }

    impl Versioned for Shelf {
        fn set_version(&mut self, version: i64) {
            self.version = version;
        }
    }

    fn shelf(id: &str, floor: &str) -> Shelf {
        Shelf { shelf_id: id.to_string(), version: 0, floor: floor.to_string() }
    }

    #[tokio::test]
    async fn test_should_create_get_delete() {
        let repo = MemoryRepository::new();
        assert_eq!(1, repo.create(&shelf("a", "1")).await.expect("should create"));
        assert!(matches!(repo.create(&shelf("a", "1")).await, Err(LibraryError::DuplicateKey { .. })));
        assert_eq!("1", repo.get("a").await.expect("should get").floor.as_str());
        assert_eq!(1, repo.delete("a").await.expect("should delete"));
        assert!(repo.get("a").await.is_err());
    }

    #[tokio::test]
    async fn test_should_reject_stale_update() {
        let repo = MemoryRepository::new();
        let mut record = shelf("a", "1");
        repo.create(&record).await.expect("should create");
        record.floor = "2".to_string();
        repo.update(&record).await.expect("should update");
        let loaded = repo.get("a").await.expect("should get");
        assert_eq!(1, loaded.version);
        let err = repo.update(&record).await.expect_err("stale version");
        assert!(err.retryable());
    }

    #[tokio::test]
    async fn test_should_query_with_pages() {
        let repo = MemoryRepository::new();
        for i in 0..25 {
            repo.create(&shelf(format!("s{:02}", i).as_str(), if i % 5 == 0 { "top" } else { "low" }))
                .await.expect("should create");
        }
        let predicate = HashMap::from([("floor".to_string(), "top".to_string())]);
        let res = repo.query(&predicate, None, 10).await.expect("should query");
        assert_eq!(5, res.records.len());
        assert_eq!(None, res.next_page);

        let res = repo.query(&HashMap::new(), None, 10).await.expect("should query");
        assert_eq!(10, res.records.len());
        let res = repo.query(&HashMap::new(), res.next_page.as_deref(), 10).await.expect("should query");
        assert_eq!(10, res.records.len());
        let res = repo.query(&HashMap::new(), res.next_page.as_deref(), 10).await.expect("should query");
        assert_eq!(5, res.records.len());
        assert_eq!(None, res.next_page);
    }

    #[tokio::test]
    async fn test_should_reject_zero_page_size() {
        let repo = MemoryRepository::new();
        repo.create(&shelf("a", "1")).await.expect("should create");
        let err = repo.query(&HashMap::new(), None, 0).await.expect_err("should reject zero page size");
        assert!(err.is_validation());
    }
}
