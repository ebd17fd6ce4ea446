/**
 * Challenge Issuer
 * Create Auth Challenge trigger: looks up the user's enrolled face and
 * embeds it as the challenge answer
 */

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::event::{AuthEvent, LOOKUP_ATTRIBUTE};
use crate::store::IndexStore;

pub struct ChallengeIssuer {
    store: Arc<dyn IndexStore>,
}

impl ChallengeIssuer {
    pub fn new(store: Arc<dyn IndexStore>) -> Self {
        Self { store }
    }

    /// Issue a face challenge for custom-challenge events; anything else is
    /// returned untouched.
    pub async fn issue(&self, mut event: AuthEvent) -> Result<AuthEvent> {
        if !event.is_custom_challenge() {
            info!(
                challenge = event.challenge_name().unwrap_or("<none>"),
                "Not a custom challenge, passing through"
            );
            return Ok(event);
        }

        event.clear_public_challenge_parameters();

        let Some(key) = event.lookup_key().map(str::to_owned) else {
            error!(
                attribute = LOOKUP_ATTRIBUTE,
                "Unable to query index store: lookup attribute missing"
            );
            return Err(Error::MissingLookupAttribute {
                attribute: LOOKUP_ATTRIBUTE,
            });
        };

        let mut references = self.store.face_references(&key).await.map_err(|e| {
            error!(error = %e, "Unable to query index store");
            e
        })?;

        match references.len() {
            0 => {
                warn!("No face reference found for user, challenge left without an answer");
            }
            1 => {
                let reference = references.remove(0);
                event.set_challenge(&reference);
                info!(reference = %reference, "Face challenge issued");
            }
            count => {
                error!(count, "Lookup key resolved to several face references");
                return Err(Error::AmbiguousFaceReference { count });
            }
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FaceReference, CUSTOM_CHALLENGE, REKOGNITION_CHALLENGE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubStore {
        records: HashMap<String, Vec<&'static str>>,
        fail: bool,
        queried: Mutex<Vec<String>>,
    }

    impl StubStore {
        fn with(key: &str, references: &[&'static str]) -> Self {
            Self {
                records: HashMap::from([(key.to_string(), references.to_vec())]),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl IndexStore for StubStore {
        async fn face_references(&self, key: &str) -> Result<Vec<FaceReference>> {
            self.queried.lock().unwrap().push(key.to_string());
            if self.fail {
                return Err(Error::index_store("ResourceNotFoundException"));
            }
            Ok(self
                .records
                .get(key)
                .map(|refs| refs.iter().map(|r| FaceReference::new(*r)).collect())
                .unwrap_or_default())
        }
    }

    fn event(challenge: &str, email: Option<&str>) -> AuthEvent {
        let mut attributes = HashMap::from([("sub".to_string(), "0000-1111".to_string())]);
        if let Some(email) = email {
            attributes.insert("email".to_string(), email.to_string());
        }
        let mut event = AuthEvent::default();
        event.request.challenge_name = Some(Some(challenge.to_string()));
        event.request.user_attributes = Some(Some(attributes));
        event
    }

    #[tokio::test]
    async fn issues_challenge_for_single_reference() {
        let store = Arc::new(StubStore::with("a@x.com", &["face-123"]));
        let issuer = ChallengeIssuer::new(store.clone());

        let event = issuer
            .issue(event(CUSTOM_CHALLENGE, Some("a@x.com")))
            .await
            .unwrap();

        assert_eq!(event.public_challenge_parameters().unwrap()["captchaUrl"], "face-123");
        assert_eq!(event.private_challenge_parameters().unwrap()["answer"], "face-123");
        assert_eq!(event.challenge_metadata(), Some(REKOGNITION_CHALLENGE));
        assert_eq!(*store.queried.lock().unwrap(), vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn other_challenges_pass_through_unmodified() {
        let store = Arc::new(StubStore::with("a@x.com", &["face-123"]));
        let issuer = ChallengeIssuer::new(store.clone());
        let original = event("SRP_A", Some("a@x.com"));

        let event = issuer.issue(original.clone()).await.unwrap();

        assert_eq!(event, original);
        assert!(store.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_reference_leaves_challenge_unanswered() {
        let issuer = ChallengeIssuer::new(Arc::new(StubStore::default()));

        let event = issuer
            .issue(event(CUSTOM_CHALLENGE, Some("nobody@x.com")))
            .await
            .unwrap();

        assert_eq!(event.public_challenge_parameters(), Some(&HashMap::new()));
        assert_eq!(event.private_challenge_parameters(), None);
        assert_eq!(event.challenge_metadata(), None);
    }

    #[tokio::test]
    async fn missing_email_fails_without_lookup() {
        let store = Arc::new(StubStore::with("a@x.com", &["face-123"]));
        let issuer = ChallengeIssuer::new(store.clone());

        let err = issuer
            .issue(event(CUSTOM_CHALLENGE, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingLookupAttribute { attribute: "email" }
        ));
        assert!(store.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_user_attributes_fail() {
        let issuer = ChallengeIssuer::new(Arc::new(StubStore::default()));
        let event: AuthEvent = serde_json::from_value(json!({
            "request": { "challengeName": "CUSTOM_CHALLENGE", "userAttributes": null }
        }))
        .unwrap();

        let err = issuer.issue(event).await.unwrap_err();

        assert!(matches!(err, Error::MissingLookupAttribute { .. }));
    }

    #[tokio::test]
    async fn several_references_are_rejected() {
        let store = StubStore::with("a@x.com", &["face-123", "face-456"]);
        let issuer = ChallengeIssuer::new(Arc::new(store));

        let err = issuer
            .issue(event(CUSTOM_CHALLENGE, Some("a@x.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AmbiguousFaceReference { count: 2 }));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let issuer = ChallengeIssuer::new(Arc::new(StubStore::failing()));

        let err = issuer
            .issue(event(CUSTOM_CHALLENGE, Some("a@x.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::IndexStore(_)));
    }

    #[tokio::test]
    async fn lookup_key_is_passed_verbatim() {
        let store = Arc::new(StubStore::default());
        let issuer = ChallengeIssuer::new(store.clone());

        issuer
            .issue(event(CUSTOM_CHALLENGE, Some("A@X.com*")))
            .await
            .unwrap();

        assert_eq!(*store.queried.lock().unwrap(), vec!["A@X.com*".to_string()]);
    }
}
