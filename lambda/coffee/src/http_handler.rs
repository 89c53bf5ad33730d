use lambda_http::{Body, Error, Request, RequestExt, Response};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::operations::{self, Operation};
use crate::response;
use crate::store::RecordStore;

/// Picks the operation from the method and which parameter maps are populated.
pub(crate) fn route(method: &str, has_query: bool, has_path: bool) -> Result<Operation, ApiError> {
    match method {
        "GET" if has_query => Ok(Operation::Query),
        "GET" if has_path => Ok(Operation::Get),
        "GET" => Ok(Operation::List),
        "POST" => Ok(Operation::Create),
        "PUT" => Ok(Operation::Update),
        "DELETE" => Ok(Operation::Delete),
        other => Err(ApiError::MethodNotAllowed(other.to_string())),
    }
}

fn coffee_id(event: &Request) -> Result<String, ApiError> {
    match event.path_parameters().first("id") {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ApiError::MissingParameter("Coffee id must be provided in the path")),
    }
}

async fn dispatch(
    store: &dyn RecordStore,
    operation: Operation,
    event: &Request,
) -> Result<serde_json::Value, ApiError> {
    match operation {
        Operation::Create => operations::create(store, event.body().as_ref()).await,
        Operation::List => operations::list(store).await,
        Operation::Get => operations::get(store, &coffee_id(event)?).await,
        Operation::Query => {
            let params = event.query_string_parameters();
            let roaster = params
                .first("roaster")
                .ok_or(ApiError::MissingParameter("Roaster query parameter must be provided"))?;
            operations::query(store, roaster).await
        }
        Operation::Update => {
            let id = coffee_id(event)?;
            operations::update(store, &id, event.body().as_ref()).await
        }
        Operation::Delete => operations::delete(store, &coffee_id(event)?).await,
    }
}

pub(crate) async fn function_handler(
    store: &dyn RecordStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let has_query = !event.query_string_parameters_ref().map_or(true, |q| q.is_empty());
    let has_path = !event.path_parameters_ref().map_or(true, |p| p.is_empty());

    let outcome = match route(method, has_query, has_path) {
        Ok(operation) => {
            info!(method, ?operation, "dispatching request");
            dispatch(store, operation, &event).await
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(payload) => response::ok(&payload),
        Err(err) => {
            if !matches!(err, ApiError::Store { .. }) {
                warn!(method, status = err.status(), error = %err, "rejected request");
            }
            response::failure(&err)
        }
    }
}
