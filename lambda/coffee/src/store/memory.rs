use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{GetOutput, QueryOutput, RecordStore, RecordUpdate, StoreError};
use crate::model::CoffeeRecord;

/// In-process store for handler tests. Counts calls and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    records: Mutex<BTreeMap<String, CoffeeRecord>>,
    calls: Mutex<Vec<&'static str>>,
    failure: Option<u16>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers with a store error carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Self::default()
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = CoffeeRecord>) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .extend(records.into_iter().map(|r| (r.id.clone(), r)));
        store
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn record(&self, id: &str) -> Option<CoffeeRecord> {
        self.records.lock().get(id).cloned()
    }

    fn enter(&self, call: &'static str) -> Result<(), StoreError> {
        self.calls.lock().push(call);
        match self.failure {
            Some(status) => Err(StoreError::new(Some(status), format!("{call} failed"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: &CoffeeRecord) -> Result<(), StoreError> {
        self.enter("put")?;
        self.records.lock().insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<GetOutput, StoreError> {
        self.enter("get")?;
        Ok(GetOutput {
            item: self.record(id),
        })
    }

    async fn scan(&self) -> Result<Vec<CoffeeRecord>, StoreError> {
        self.enter("scan")?;
        Ok(self.records.lock().values().cloned().collect())
    }

    async fn query_by_roaster(&self, roaster: &str) -> Result<QueryOutput, StoreError> {
        self.enter("query")?;
        let items: Vec<_> = self
            .records
            .lock()
            .values()
            .filter(|r| r.roaster == roaster)
            .cloned()
            .collect();
        let count = i32::try_from(items.len()).unwrap_or(i32::MAX);
        Ok(QueryOutput {
            items,
            count,
            scanned_count: count,
        })
    }

    async fn update(&self, id: &str, update: &RecordUpdate) -> Result<CoffeeRecord, StoreError> {
        self.enter("update")?;
        let mut records = self.records.lock();
        let existing = records
            .get(id)
            .ok_or_else(|| StoreError::new(Some(400), "The conditional request failed"))?;

        let mut value = serde_json::to_value(existing).map_err(|e| StoreError::new(None, e.to_string()))?;
        if let Value::Object(map) = &mut value {
            map.insert("updatedAt".to_string(), Value::from(update.updated_at));
            for (field, v) in &update.fields {
                map.insert(field.as_str().to_string(), v.clone());
            }
        }
        let updated: CoffeeRecord =
            serde_json::from_value(value).map_err(|e| StoreError::new(Some(400), e.to_string()))?;

        records.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.enter("delete")?;
        self.records.lock().remove(id);
        Ok(())
    }
}
