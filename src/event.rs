/**
 * Auth Event
 * Cognito custom-auth trigger payload shared by both challenge handlers
 *
 * Only the fields the handlers read or write are typed; everything else
 * Cognito sends is carried through untouched so the event returned to the
 * user pool matches the one it delivered.
 */

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Challenge name Cognito uses for custom-auth challenges.
pub const CUSTOM_CHALLENGE: &str = "CUSTOM_CHALLENGE";

/// Metadata tag attached to challenges issued by this crate.
pub const REKOGNITION_CHALLENGE: &str = "REKOGNITION_CHALLENGE";

/// Public challenge parameter holding the face reference.
pub const PUBLIC_REFERENCE_KEY: &str = "captchaUrl";

/// Private challenge parameter holding the expected answer.
pub const PRIVATE_ANSWER_KEY: &str = "answer";

/// User attribute used as the index store lookup key.
pub const LOOKUP_ATTRIBUTE: &str = "email";

/// Opaque identifier of an enrolled face, shared by the index store and the
/// face collection. Compared by exact equality only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceReference(String);

impl FaceReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FaceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top candidate returned by a face similarity search.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub face_id: FaceReference,
    /// Similarity in percent (0-100).
    pub similarity: f32,
}

/// A field that may be absent, explicitly `null`, or set. Absent stays absent
/// and `null` stays `null` when the event is written back.
pub type Nullable<T> = Option<Option<T>>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthEvent {
    #[serde(default)]
    pub request: AuthRequest,
    #[serde(default)]
    pub response: AuthResponse,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub challenge_name: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub user_attributes: Nullable<HashMap<String, String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub challenge_answer: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub private_challenge_parameters: Nullable<HashMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub public_challenge_parameters: Nullable<HashMap<String, String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub private_challenge_parameters: Nullable<HashMap<String, String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub challenge_metadata: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub answer_correct: Nullable<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthEvent {
    pub fn challenge_name(&self) -> Option<&str> {
        self.request.challenge_name.as_ref().and_then(Option::as_deref)
    }

    pub fn is_custom_challenge(&self) -> bool {
        self.challenge_name() == Some(CUSTOM_CHALLENGE)
    }

    /// The user attribute the index store is keyed by, if present.
    pub fn lookup_key(&self) -> Option<&str> {
        self.request
            .user_attributes
            .as_ref()
            .and_then(Option::as_ref)
            .and_then(|attributes| attributes.get(LOOKUP_ATTRIBUTE))
            .map(String::as_str)
    }

    /// Expected answer set by the issuer earlier in the session.
    pub fn expected_answer(&self) -> Option<&str> {
        self.request
            .private_challenge_parameters
            .as_ref()
            .and_then(Option::as_ref)
            .and_then(|parameters| parameters.get(PRIVATE_ANSWER_KEY))
            .map(String::as_str)
    }

    /// Object key of the photo submitted by the user.
    pub fn submitted_image(&self) -> &str {
        self.request
            .challenge_answer
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    pub fn public_challenge_parameters(&self) -> Option<&HashMap<String, String>> {
        self.response
            .public_challenge_parameters
            .as_ref()
            .and_then(Option::as_ref)
    }

    pub fn private_challenge_parameters(&self) -> Option<&HashMap<String, String>> {
        self.response
            .private_challenge_parameters
            .as_ref()
            .and_then(Option::as_ref)
    }

    pub fn challenge_metadata(&self) -> Option<&str> {
        self.response
            .challenge_metadata
            .as_ref()
            .and_then(Option::as_deref)
    }

    pub fn answer_correct(&self) -> Option<bool> {
        self.response.answer_correct.flatten()
    }

    pub fn set_answer_correct(&mut self, correct: bool) {
        self.response.answer_correct = Some(Some(correct));
    }

    /// Start the challenge with no public parameters.
    pub fn clear_public_challenge_parameters(&mut self) {
        self.response.public_challenge_parameters = Some(Some(HashMap::new()));
    }

    /// Store `reference` as both the public and the private challenge
    /// parameter and tag the challenge.
    pub fn set_challenge(&mut self, reference: &FaceReference) {
        self.response
            .public_challenge_parameters
            .get_or_insert(None)
            .get_or_insert_with(HashMap::new)
            .insert(PUBLIC_REFERENCE_KEY.to_string(), reference.to_string());
        self.response.private_challenge_parameters = Some(Some(HashMap::from([(
            PRIVATE_ANSWER_KEY.to_string(),
            reference.to_string(),
        )])));
        self.response.challenge_metadata = Some(Some(REKOGNITION_CHALLENGE.to_string()));
    }
}

// Only called for keys present in the payload, so a `null` value becomes
// `Some(None)` and a missing key falls back to `None` via `default`.
fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
