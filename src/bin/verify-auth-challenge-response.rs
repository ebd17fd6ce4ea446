/**
 * Verify Auth Challenge Response
 * Lambda entry point checking the submitted photo against the face collection
 */

use aws_config::BehaviorVersion;
use face_auth_challenge::{
    telemetry, AuthEvent, ChallengeVerifier, RekognitionFaceMatcher, VerifierConfig,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{debug, info};

async fn function_handler(
    verifier: &ChallengeVerifier,
    event: LambdaEvent<AuthEvent>,
) -> Result<AuthEvent, Error> {
    debug!(event = ?event.payload, "Verify auth challenge");

    let event = verifier.verify(event.payload).await?;
    Ok(event)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let config = VerifierConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let matcher = RekognitionFaceMatcher::new(
        aws_sdk_rekognition::Client::new(&sdk_config),
        &config.collection_name,
        &config.bucket_sign_in,
    );
    let verifier = ChallengeVerifier::new(Arc::new(matcher));

    info!(
        collection = %config.collection_name,
        bucket = %config.bucket_sign_in,
        "Verify auth challenge handler ready"
    );

    let verifier = &verifier;
    run(service_fn(move |event| function_handler(verifier, event))).await
}
