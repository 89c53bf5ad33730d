use lambda_http::{run, service_fn, Error};

mod config;
mod error;
mod http_handler;
mod model;
mod operations;
mod response;
mod store;
mod validate;

use config::Config;
use http_handler::function_handler;
use store::dynamo::DynamoStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoStore::new(config.dynamodb_client(&sdk_config), config.table_name);

    run(service_fn(|event| function_handler(&store, event))).await
}
