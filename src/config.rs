/**
 * Configuration
 * Environment surface shared by both challenge handlers
 */

use crate::error::{Error, Result};

/// DynamoDB table name and Rekognition collection id.
pub const COLLECTION_NAME_VAR: &str = "COLLECTION_NAME";

/// S3 bucket holding photos uploaded at sign-in.
pub const BUCKET_SIGN_IN_VAR: &str = "BUCKET_SIGN_IN";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuerConfig {
    pub collection_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierConfig {
    pub collection_name: String,
    pub bucket_sign_in: String,
}

impl IssuerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            collection_name: required(&lookup, COLLECTION_NAME_VAR)?,
        })
    }
}

impl VerifierConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            collection_name: required(&lookup, COLLECTION_NAME_VAR)?,
            bucket_sign_in: required(&lookup, BUCKET_SIGN_IN_VAR)?,
        })
    }
}

fn required<F>(lookup: &F, variable: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(variable)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::config(variable))
}
