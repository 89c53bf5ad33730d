//! Builds the `{statusCode, headers, body}` envelope returned to the runtime.

use lambda_http::{http::response::Builder, Body, Error, Response};
use serde_json::{json, Value};

use crate::error::ApiError;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain";

// Every response carries the same CORS headers.
fn builder(status: u16) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Credentials", "true")
}

pub(crate) fn ok(payload: &Value) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(payload)?;
    Ok(builder(200)
        .header("content-type", JSON)
        .body(Body::Text(body))?)
}

pub(crate) fn failure(err: &ApiError) -> Result<Response<Body>, Error> {
    let (content_type, body) = match err {
        ApiError::Validation(_) | ApiError::MissingParameter(_) => {
            (TEXT, json!({ "message": err.to_string() }).to_string())
        }
        ApiError::MethodNotAllowed(_) => (JSON, json!({ "message": err.to_string() }).to_string()),
        ApiError::Store { operation, .. } => (TEXT, operation.failure_message().to_string()),
        ApiError::Encode(_) => (TEXT, "Couldn't encode the response.".to_string()),
    };

    Ok(builder(err.status())
        .header("content-type", content_type)
        .body(Body::Text(body))?)
}
