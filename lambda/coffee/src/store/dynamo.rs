//! DynamoDB-backed [`RecordStore`].

use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use super::{GetOutput, QueryOutput, RecordStore, RecordUpdate, StoreError, ROASTER_INDEX};
use crate::model::CoffeeRecord;

type Item = HashMap<String, AttributeValue>;

pub(crate) struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

fn sdk_error<E>(err: SdkError<E, HttpResponse>) -> StoreError
where
    E: std::error::Error + 'static,
{
    let status = err.raw_response().map(|raw| raw.status().as_u16());
    StoreError::new(status, DisplayErrorContext(&err).to_string())
}

fn key(id: &str) -> Item {
    HashMap::from([("id".to_string(), AttributeValue::S(id.to_string()))])
}

pub(crate) fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

pub(crate) fn from_attribute(attr: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attr {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(from_attribute)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_attribute(v)?)))
                .collect::<Result<Map<_, _>, StoreError>>()?,
        ),
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(StoreError::new(
                None,
                format!("unsupported attribute type: {other:?}"),
            ))
        }
    };
    Ok(value)
}

fn parse_number(raw: &str) -> Result<Number, StoreError> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Number::from(n));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::new(None, format!("invalid number attribute: {raw}")))
}

pub(crate) fn record_to_item(record: &CoffeeRecord) -> Result<Item, StoreError> {
    let value = serde_json::to_value(record).map_err(|e| StoreError::new(None, e.to_string()))?;
    match to_attribute(&value) {
        AttributeValue::M(item) => Ok(item),
        _ => Err(StoreError::new(None, "record did not encode to a map")),
    }
}

pub(crate) fn item_to_record(item: &Item) -> Result<CoffeeRecord, StoreError> {
    let value = from_attribute(&AttributeValue::M(item.clone()))?;
    serde_json::from_value(value).map_err(|e| StoreError::new(None, format!("malformed record: {e}")))
}

fn items_to_records(items: &[Item]) -> Result<Vec<CoffeeRecord>, StoreError> {
    items.iter().map(item_to_record).collect()
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn put(&self, record: &CoffeeRecord) -> Result<(), StoreError> {
        let item = record_to_item(record)?;
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<GetOutput, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(key(id)))
            .send()
            .await
            .map_err(sdk_error)?;

        let item = result.item().map(item_to_record).transpose()?;
        Ok(GetOutput { item })
    }

    async fn scan(&self) -> Result<Vec<CoffeeRecord>, StoreError> {
        let result = self
            .client
            .scan()
            .table_name(&self.table)
            .send()
            .await
            .map_err(sdk_error)?;

        items_to_records(result.items())
    }

    async fn query_by_roaster(&self, roaster: &str) -> Result<QueryOutput, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(ROASTER_INDEX)
            .key_condition_expression("roaster = :a")
            .expression_attribute_values(":a", AttributeValue::S(roaster.to_string()))
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(QueryOutput {
            items: items_to_records(result.items())?,
            count: result.count(),
            scanned_count: result.scanned_count(),
        })
    }

    async fn update(&self, id: &str, update: &RecordUpdate) -> Result<CoffeeRecord, StoreError> {
        let values = update
            .attribute_values()
            .iter()
            .map(|(k, v)| (k.clone(), to_attribute(v)))
            .collect();

        let result = self
            .client
            .update_item()
            .table_name(&self.table)
            .set_key(Some(key(id)))
            .update_expression(update.expression())
            .condition_expression("attribute_exists(id)")
            .set_expression_attribute_names(Some(update.attribute_names()))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(sdk_error)?;

        let attributes = result
            .attributes()
            .ok_or_else(|| StoreError::new(None, "update returned no attributes"))?;
        item_to_record(attributes)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(key(id)))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CoffeeRecord {
        serde_json::from_value(json!({
            "id": "0192",
            "roaster": "Counter Culture",
            "country": "Colombia",
            "masl": 1700,
            "varietals": ["Caturra", "Castillo"],
            "createdAt": 1_700_000_000_000_i64,
            "updatedAt": 1_700_000_000_000_i64
        }))
        .unwrap()
    }

    #[test]
    fn record_becomes_typed_attributes() {
        let item = record_to_item(&sample()).unwrap();

        assert_eq!(item["id"], AttributeValue::S("0192".to_string()));
        assert_eq!(item["masl"], AttributeValue::N("1700".to_string()));
        assert_eq!(item["createdAt"], AttributeValue::N("1700000000000".to_string()));
        assert_eq!(
            item["varietals"],
            AttributeValue::L(vec![
                AttributeValue::S("Caturra".to_string()),
                AttributeValue::S("Castillo".to_string()),
            ])
        );
        assert!(!item.contains_key("name"));
    }

    #[test]
    fn item_reads_back_into_a_record() {
        let record = sample();
        let item = record_to_item(&record).unwrap();
        assert_eq!(item_to_record(&item).unwrap(), record);
    }

    #[test]
    fn string_sets_and_fractional_numbers_are_understood() {
        let mut item = record_to_item(&sample()).unwrap();
        item.insert("notes".to_string(), AttributeValue::Ss(vec!["plum".to_string()]));
        item.insert("masl".to_string(), AttributeValue::N("1700.5".to_string()));

        let record = item_to_record(&item).unwrap();
        assert_eq!(record.notes, Some(vec!["plum".to_string()]));
        assert_eq!(record.masl.and_then(|n| n.as_f64()), Some(1700.5));
    }

    #[test]
    fn item_missing_required_attributes_is_a_store_error() {
        let mut item = record_to_item(&sample()).unwrap();
        item.remove("roaster");

        let err = item_to_record(&item).unwrap_err();
        assert!(err.status().is_none());
        assert!(err.to_string().contains("malformed record"));
    }
}
