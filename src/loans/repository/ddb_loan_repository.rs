use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{LibraryError, LibraryResult, LoanAction, LoanStatus, PaginatedResult};
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::utils::ddb::{add_filter_expr, TableSpec, from_ddb, opt_string_date, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBLoanRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBLoanRepository {
    pub(crate) fn new(client: Client, table: &TableSpec) -> Self {
        Self {
            client,
            table_name: table.table_name.to_string(),
            index_name: table.index_name(),
        }
    }

    async fn scan(&self, predicate: &HashMap<String, String>,
                  page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
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
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(LoanEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl Repository<LoanEntity> for DDBLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(loan_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // action is a reserved word, see https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("loan_id", AttributeValue::S(entity.loan_id.clone()))
            .update_expression("SET version = :version, loan_status = :loan_status, #action = :action, action_comment = :action_comment, renewal_count = :renewal_count, due_date = :due_date, return_date = :return_date, updated_at = :updated_at")
            .expression_attribute_names("#action", "action")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":loan_status", AttributeValue::S(entity.loan_status.to_string()))
            .expression_attribute_values(":action", AttributeValue::S(entity.action.to_string()))
            .expression_attribute_values(":action_comment", AttributeValue::S(entity.action_comment.clone().unwrap_or_default()))
            .expression_attribute_values(":renewal_count", AttributeValue::N(entity.renewal_count.to_string()))
            .expression_attribute_values(":due_date", string_date(entity.due_date))
            .expression_attribute_values(":return_date", opt_string_date(entity.return_date))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "loan_id = :loan_id",
            )
            .expression_attribute_values(
                ":loan_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many loans for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(LoanEntity::from(map));
                }
            }
            Err(LibraryError::not_found(format!("loan not found for {}", id).as_str()))
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("loan_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // item_id is the index hash key and loan_status its range key, other attributes are filters
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let item_id = match predicate.get("item_id") {
            Some(item_id) => item_id,
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
            .expression_attribute_values(":item_id", AttributeValue::S(item_id.to_string()));
        let mut key_cond = String::new();
        key_cond.push_str("item_id = :item_id");
        if let Some(loan_status) = predicate.get("loan_status") {
            key_cond.push_str(" AND loan_status = :loan_status");
            request = request.expression_attribute_values(":loan_status", AttributeValue::S(loan_status.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "item_id" && k != "loan_status" {
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
                .map(LoanEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl LoanRepository for DDBLoanRepository {
    async fn find_open_loan(&self, item_id: &str) -> LibraryResult<LoanEntity> {
        let predicate = HashMap::from([
            ("item_id".to_string(), item_id.to_string()),
            ("loan_status".to_string(), LoanStatus::Open.to_string()),
        ]);
        let res = self.query(&predicate, None, 2).await?;
        match res.records.len() {
            0 => Err(LibraryError::not_found(format!("open loan not found for item {}", item_id).as_str())),
            1 => Ok(res.records[0].clone()),
            _ => Err(LibraryError::database(format!("too many open loans for item {}", item_id).as_str(), None, false)),
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for LoanEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        LoanEntity {
            loan_id: parse_string_attribute("loan_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            item_id: parse_string_attribute("item_id", map).unwrap_or_default(),
            user_id: parse_string_attribute("user_id", map).unwrap_or_default(),
            proxy_user_id: parse_string_attribute("proxy_user_id", map).filter(|s| !s.is_empty()),
            loan_policy_id: parse_string_attribute("loan_policy_id", map).unwrap_or_default(),
            loan_status: LoanStatus::from(parse_string_attribute("loan_status", map).unwrap_or_default()),
            action: LoanAction::from(parse_string_attribute("action", map).unwrap_or_default()),
            action_comment: parse_string_attribute("action_comment", map).filter(|s| !s.is_empty()),
            renewal_count: parse_number_attribute("renewal_count", map),
            loan_date: parse_date_attribute("loan_date", map).unwrap_or_else(|| Utc::now().naive_utc()),
            due_date: parse_date_attribute("due_date", map).unwrap_or_else(|| Utc::now().naive_utc()),
            return_date: parse_date_attribute("return_date", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
