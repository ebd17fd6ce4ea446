/**
 * Face Auth Challenge
 * Cognito custom-auth triggers that use face recognition as the challenge
 *
 * - Challenge issuance (index store lookup of the user's enrolled face)
 * - Challenge verification (face similarity search of the submitted photo)
 */

pub mod config;
pub mod error;
pub mod event;
pub mod issuer;
pub mod matcher;
pub mod store;
pub mod telemetry;
pub mod verifier;

pub use config::{IssuerConfig, VerifierConfig};
pub use error::{Error, Result};
pub use event::{AuthEvent, FaceReference, MatchResult};
pub use issuer::ChallengeIssuer;
pub use matcher::{FaceMatcher, RekognitionFaceMatcher};
pub use store::{DynamoIndexStore, IndexStore};
pub use verifier::ChallengeVerifier;
