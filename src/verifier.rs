/**
 * Challenge Verifier
 * Verify Auth Challenge Response trigger: matches the submitted photo
 * against the face collection
 *
 * The answer is correct only when the best candidate clears the similarity
 * threshold and is the exact face issued with the challenge.
 */

use std::sync::Arc;
use tracing::{error, info};

use crate::error::Result;
use crate::event::{AuthEvent, MatchResult};
use crate::matcher::{FaceMatcher, FACE_MATCH_THRESHOLD};

pub struct ChallengeVerifier {
    matcher: Arc<dyn FaceMatcher>,
}

impl ChallengeVerifier {
    pub fn new(matcher: Arc<dyn FaceMatcher>) -> Self {
        Self { matcher }
    }

    pub async fn verify(&self, mut event: AuthEvent) -> Result<AuthEvent> {
        event.set_answer_correct(false);

        let candidate = self
            .matcher
            .search_face(event.submitted_image())
            .await
            .map_err(|e| {
                error!(error = %e, "Unable to search face collection");
                e
            })?;

        let correct = match (&candidate, event.expected_answer()) {
            (Some(candidate), Some(expected)) => is_expected_face(candidate, expected),
            _ => false,
        };

        match &candidate {
            Some(candidate) => info!(
                face_id = %candidate.face_id,
                similarity = candidate.similarity,
                correct,
                "Face challenge evaluated"
            ),
            None => info!("No matching face found"),
        }

        event.set_answer_correct(correct);
        Ok(event)
    }
}

fn is_expected_face(candidate: &MatchResult, expected: &str) -> bool {
    candidate.similarity >= FACE_MATCH_THRESHOLD
        && !candidate.face_id.as_str().is_empty()
        && candidate.face_id.as_str() == expected
}
