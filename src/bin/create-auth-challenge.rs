/**
 * Create Auth Challenge
 * Lambda entry point issuing face challenges from the DynamoDB index
 */

use aws_config::BehaviorVersion;
use face_auth_challenge::{telemetry, AuthEvent, ChallengeIssuer, DynamoIndexStore, IssuerConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{debug, info};

async fn function_handler(
    issuer: &ChallengeIssuer,
    event: LambdaEvent<AuthEvent>,
) -> Result<AuthEvent, Error> {
    debug!(event = ?event.payload, "Create auth challenge");

    let event = issuer.issue(event.payload).await?;

    debug!(response = ?event.response, "Create challenge output");
    Ok(event)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let config = IssuerConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoIndexStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        &config.collection_name,
    );
    let issuer = ChallengeIssuer::new(Arc::new(store));

    info!(table = %config.collection_name, "Create auth challenge handler ready");

    let issuer = &issuer;
    run(service_fn(move |event| function_handler(issuer, event))).await
}
