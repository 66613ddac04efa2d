use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{ItemStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::ddb::{add_filter_expr, TableSpec, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

// DDBItemRepository stores items keyed by item_id, the secondary index is (barcode, item_status)
#[derive(Debug)]
pub struct DDBItemRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBItemRepository {
    pub(crate) fn new(client: Client, table: &TableSpec) -> Self {
        Self {
            client,
            table_name: table.table_name.to_string(),
            index_name: table.index_name(),
        }
    }

    async fn scan(&self, predicate: &HashMap<String, String>,
                  page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<ItemEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, &HashMap::new());
        let mut request = self.client
            .scan()
            .table_name(table_name)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size, 500) as i32);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            let ks = add_filter_expr(k.as_str(), &mut filter_expr);
            request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let def_items = vec![];
            let items = req.items.as_ref().unwrap_or(&def_items);
            let records = items.iter().map(map_to_item).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl Repository<ItemEntity> for DDBItemRepository {
    async fn create(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(item_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(entity.item_id.clone()))
            .update_expression("SET version = :version, item_status = :item_status, barcode = :barcode, title = :title, location_id = :location_id, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":item_status", AttributeValue::S(entity.item_status.to_string()))
            .expression_attribute_values(":barcode", AttributeValue::S(entity.barcode.to_string()))
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":location_id", AttributeValue::S(entity.location_id.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<ItemEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("item_id = :item_id")
            .expression_attribute_values(":item_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            match req.items {
                Some(items) if items.len() > 1 => {
                    Err(LibraryError::database(format!("too many items for {}", id).as_str(), None, false))
                }
                Some(items) => items.first().map(map_to_item)
                    .ok_or_else(|| LibraryError::not_found(format!("item not found for {}", id).as_str())),
                None => Err(LibraryError::not_found(format!("item not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // barcode is the index hash key, queries without it fall back to a filtered scan
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<ItemEntity>> {
        let barcode = match predicate.get("barcode") {
            Some(barcode) => barcode,
            None => return self.scan(predicate, page, page_size).await,
        };
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .expression_attribute_values(":barcode", AttributeValue::S(barcode.to_string()));
        let mut key_cond = String::new();
        key_cond.push_str("barcode = :barcode");
        if let Some(status) = predicate.get("item_status") {
            key_cond.push_str(" AND item_status = :item_status");
            request = request.expression_attribute_values(":item_status", AttributeValue::S(status.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "barcode" && k != "item_status" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }

        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(map_to_item).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl ItemRepository for DDBItemRepository {
    async fn find_by_barcode(&self, barcode: &str) -> LibraryResult<ItemEntity> {
        let predicate = HashMap::from([("barcode".to_string(), barcode.to_string())]);
        let res = self.query(&predicate, None, 2).await?;
        res.records.into_iter().next()
            .ok_or_else(|| LibraryError::not_found(format!("item not found for barcode {}", barcode).as_str()))
    }
}

fn map_to_item(map: &HashMap<String, AttributeValue>) -> ItemEntity {
    ItemEntity {
        item_id: parse_string_attribute("item_id", map).unwrap_or_default(),
        version: parse_number_attribute("version", map),
        barcode: parse_string_attribute("barcode", map).unwrap_or_default(),
        title: parse_string_attribute("title", map).unwrap_or_default(),
        item_status: ItemStatus::from(parse_string_attribute("item_status", map).unwrap_or_default()),
        institution_id: parse_string_attribute("institution_id", map).unwrap_or_default(),
        campus_id: parse_string_attribute("campus_id", map).unwrap_or_default(),
        library_id: parse_string_attribute("library_id", map).unwrap_or_default(),
        location_id: parse_string_attribute("location_id", map).unwrap_or_default(),
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
    }
}
