/**
 * Index Store
 * Resolves the face reference enrolled for a user
 */

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::FaceReference;

/// Secondary index keyed by the user's lookup attribute.
pub const LOOKUP_INDEX: &str = "FullName-index";

/// Partition key of [`LOOKUP_INDEX`].
pub const LOOKUP_KEY_ATTRIBUTE: &str = "FullName";

/// Attribute holding the Rekognition face id.
pub const REFERENCE_ATTRIBUTE: &str = "RekognitionId";

#[async_trait]
pub trait IndexStore: Send + Sync {
    /// All face references recorded for `key`, in result order. The key is
    /// matched exactly.
    async fn face_references(&self, key: &str) -> Result<Vec<FaceReference>>;
}

/// [`IndexStore`] backed by a DynamoDB table.
#[derive(Clone, Debug)]
pub struct DynamoIndexStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoIndexStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl IndexStore for DynamoIndexStore {
    async fn face_references(&self, key: &str) -> Result<Vec<FaceReference>> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(LOOKUP_INDEX)
            .projection_expression(REFERENCE_ATTRIBUTE)
            .key_condition_expression(format!("{LOOKUP_KEY_ATTRIBUTE} = :userId"))
            .expression_attribute_values(":userId", AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| {
                Error::index_store(format!(
                    "query on {}/{} failed: {}",
                    self.table_name,
                    LOOKUP_INDEX,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            table = %self.table_name,
            count = output.count(),
            "Index store query returned"
        );

        Ok(face_references(output.items()))
    }
}

/// Reads the face reference out of each returned record, keeping result order.
/// Records without a string reference are skipped.
pub fn face_references(items: &[HashMap<String, AttributeValue>]) -> Vec<FaceReference> {
    items
        .iter()
        .filter_map(|item| match item.get(REFERENCE_ATTRIBUTE) {
            Some(AttributeValue::S(reference)) => Some(FaceReference::new(reference.as_str())),
            _ => {
                warn!("Skipping index record without a string {REFERENCE_ATTRIBUTE}");
                None
            }
        })
        .collect()
}
