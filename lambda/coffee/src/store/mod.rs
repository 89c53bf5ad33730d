//! The record store the handlers talk to.
//!
//! Every operation maps onto exactly one call here. The production
//! implementation lives in [`dynamo`]; tests use the in-memory store.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{CoffeeRecord, MutableField};

pub(crate) mod dynamo;
#[cfg(test)]
pub(crate) mod memory;

/// Name of the secondary index keyed on `roaster`.
pub(crate) const ROASTER_INDEX: &str = "roaster-index";

/// A failed store call. `status` is the HTTP status the store answered with, if any.
#[derive(Debug, Error)]
#[error("record store call failed: {message}")]
pub(crate) struct StoreError {
    status: Option<u16>,
    message: String,
}

impl StoreError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Result of a primary-key lookup. Serializes to `{}` when nothing matched.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<CoffeeRecord>,
}

/// Result of a secondary-index query.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct QueryOutput {
    pub items: Vec<CoffeeRecord>,
    pub count: i32,
    pub scanned_count: i32,
}

/// A partial update: the fields to overwrite plus the refreshed `updatedAt`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordUpdate {
    pub updated_at: i64,
    pub fields: Vec<(MutableField, Value)>,
}

impl RecordUpdate {
    /// Collects every mutable field present in `body`. Other keys are ignored.
    pub fn from_body(body: &serde_json::Map<String, Value>, updated_at: i64) -> Self {
        let fields = MutableField::ALL
            .iter()
            .filter_map(|field| {
                body.get(field.as_str())
                    .filter(|v| !v.is_null())
                    .map(|v| (*field, v.clone()))
            })
            .collect();

        Self { updated_at, fields }
    }

    pub fn expression(&self) -> String {
        let mut expression = String::from("set #updatedAt = :updatedAt");
        for (field, _) in &self.fields {
            let name = field.as_str();
            expression.push_str(&format!(", #{name} = :{name}"));
        }
        expression
    }

    pub fn attribute_names(&self) -> HashMap<String, String> {
        let mut names = HashMap::from([("#updatedAt".to_string(), "updatedAt".to_string())]);
        for (field, _) in &self.fields {
            names.insert(format!("#{}", field.as_str()), field.as_str().to_string());
        }
        names
    }

    pub fn attribute_values(&self) -> HashMap<String, Value> {
        let mut values = HashMap::from([(":updatedAt".to_string(), Value::from(self.updated_at))]);
        for (field, value) in &self.fields {
            values.insert(format!(":{}", field.as_str()), value.clone());
        }
        values
    }
}

#[async_trait]
pub(crate) trait RecordStore: Send + Sync {
    async fn put(&self, record: &CoffeeRecord) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<GetOutput, StoreError>;

    /// Full table scan.
    async fn scan(&self) -> Result<Vec<CoffeeRecord>, StoreError>;

    /// Exact match on the roaster index.
    async fn query_by_roaster(&self, roaster: &str) -> Result<QueryOutput, StoreError>;

    /// Applies `update` to an existing record and returns the record as stored afterwards.
    async fn update(&self, id: &str, update: &RecordUpdate) -> Result<CoffeeRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
