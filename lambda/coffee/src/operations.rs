//! The six operation handlers. Each validates its input, makes exactly one
//! store call and hands back the JSON payload for a 200 response.

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::ApiError;
use crate::model::{new_id, now_millis, CoffeeRecord, MutableField};
use crate::store::{RecordStore, RecordUpdate};
use crate::validate::{self, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Create,
    List,
    Get,
    Query,
    Update,
    Delete,
}

impl Operation {
    /// Caller-facing body when the store call fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "Couldn't create the coffee.",
            Self::List => "Couldn't fetch the list of coffees.",
            Self::Get => "Couldn't get the information for that coffee.",
            Self::Query => "Couldn't fetch the coffees for that roaster.",
            Self::Update => "Couldn't update the coffee.",
            Self::Delete => "Couldn't remove that coffee.",
        }
    }
}

fn logged(operation: Operation) -> impl FnOnce(crate::store::StoreError) -> ApiError {
    move |source| {
        error!(?operation, error = %source, "record store call failed");
        ApiError::store(operation)(source)
    }
}

pub(crate) async fn create(store: &dyn RecordStore, body: &[u8]) -> Result<Value, ApiError> {
    let fields = validate::parse_body(body)?;
    validate::check(&fields, Mode::Create)?;

    let timestamp = now_millis();
    let mut item: Map<String, Value> = MutableField::ALL
        .iter()
        .filter_map(|f| {
            fields
                .get(f.as_str())
                .filter(|v| !v.is_null())
                .map(|v| (f.as_str().to_string(), v.clone()))
        })
        .collect();
    item.insert("id".to_string(), Value::String(new_id()));
    item.insert("createdAt".to_string(), Value::from(timestamp));
    item.insert("updatedAt".to_string(), Value::from(timestamp));

    let record: CoffeeRecord = serde_json::from_value(Value::Object(item))
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    store.put(&record).await.map_err(logged(Operation::Create))?;
    info!(id = %record.id, roaster = %record.roaster, "created coffee");

    Ok(serde_json::to_value(&record)?)
}

pub(crate) async fn list(store: &dyn RecordStore) -> Result<Value, ApiError> {
    let records = store.scan().await.map_err(logged(Operation::List))?;
    Ok(serde_json::to_value(records)?)
}

pub(crate) async fn get(store: &dyn RecordStore, id: &str) -> Result<Value, ApiError> {
    let output = store.get(id).await.map_err(logged(Operation::Get))?;
    Ok(serde_json::to_value(output)?)
}

/// Underscores in the roaster name stand in for spaces.
pub(crate) fn decode_roaster(raw: &str) -> String {
    raw.replace('_', " ")
}

pub(crate) async fn query(store: &dyn RecordStore, roaster: &str) -> Result<Value, ApiError> {
    let roaster = decode_roaster(roaster);
    let output = store
        .query_by_roaster(&roaster)
        .await
        .map_err(logged(Operation::Query))?;
    Ok(serde_json::to_value(output)?)
}

pub(crate) async fn update(store: &dyn RecordStore, id: &str, body: &[u8]) -> Result<Value, ApiError> {
    let fields = validate::parse_body(body)?;
    validate::check(&fields, Mode::Update)?;

    let update = RecordUpdate::from_body(&fields, now_millis());
    let record = store
        .update(id, &update)
        .await
        .map_err(logged(Operation::Update))?;
    info!(%id, fields = update.fields.len(), "updated coffee");

    Ok(serde_json::to_value(record)?)
}

pub(crate) async fn delete(store: &dyn RecordStore, id: &str) -> Result<Value, ApiError> {
    store.delete(id).await.map_err(logged(Operation::Delete))?;
    info!(%id, "deleted coffee");
    Ok(Value::String("You deleted the coffee".to_string()))
}
