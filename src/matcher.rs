/**
 * Face Matcher
 * Similarity search of a submitted photo against the enrolled face collection
 */

use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{FaceMatch, Image, S3Object};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{FaceReference, MatchResult};

/// Minimum similarity (percent) a candidate must reach to count as a match.
pub const FACE_MATCH_THRESHOLD: f32 = 90.0;

/// Only the best candidate is ever considered.
pub const MAX_FACES: i32 = 1;

#[async_trait]
pub trait FaceMatcher: Send + Sync {
    /// Best match for the photo stored under `image_key`, or `None` when the
    /// collection holds no face above the threshold.
    async fn search_face(&self, image_key: &str) -> Result<Option<MatchResult>>;
}

/// [`FaceMatcher`] backed by a Rekognition collection, reading photos from S3.
#[derive(Clone, Debug)]
pub struct RekognitionFaceMatcher {
    client: aws_sdk_rekognition::Client,
    collection_id: String,
    bucket: String,
}

impl RekognitionFaceMatcher {
    pub fn new(
        client: aws_sdk_rekognition::Client,
        collection_id: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            collection_id: collection_id.into(),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FaceMatcher for RekognitionFaceMatcher {
    async fn search_face(&self, image_key: &str) -> Result<Option<MatchResult>> {
        let image = Image::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&self.bucket)
                    .name(image_key)
                    .build(),
            )
            .build();

        let output = self
            .client
            .search_faces_by_image()
            .collection_id(&self.collection_id)
            .image(image)
            .max_faces(MAX_FACES)
            .face_match_threshold(FACE_MATCH_THRESHOLD)
            .send()
            .await
            .map_err(|e| {
                Error::face_matcher(format!(
                    "search in collection {} for s3://{}/{} failed: {}",
                    self.collection_id,
                    self.bucket,
                    image_key,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            collection = %self.collection_id,
            matches = output.face_matches().len(),
            "Face search returned"
        );

        Ok(top_match(output.face_matches()))
    }
}

/// First returned match that carries both a face id and a similarity score.
/// Matches missing either are skipped rather than scored.
pub fn top_match(matches: &[FaceMatch]) -> Option<MatchResult> {
    matches.iter().find_map(|face_match| {
        let face_id = face_match.face().and_then(|face| face.face_id())?;
        let similarity = face_match.similarity()?;
        Some(MatchResult {
            face_id: FaceReference::new(face_id),
            similarity,
        })
    })
}
