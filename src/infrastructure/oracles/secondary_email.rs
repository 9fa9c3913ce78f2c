//! Secondary validity oracle client.

use async_trait::async_trait;
use serde::Deserialize;

use super::fetch_ok;
use crate::domain::entities::SecondaryReport;
use crate::domain::errors::OracleError;
use crate::domain::ports::SecondaryAddressOracle;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
struct SecondaryResponse {
    result: SecondaryResult,
}

#[derive(Debug, Deserialize)]
struct SecondaryResult {
    #[serde(default)]
    is_valid: bool,
    #[serde(default)]
    is_disposable: bool,
}

/// Queries `GET <endpoint>?email=<address>` with an `X-Api-Key` header.
pub struct SecondaryEmailOracle {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: String,
}

impl SecondaryEmailOracle {
    pub fn new(client: reqwest::Client, endpoint: Option<String>, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl SecondaryAddressOracle for SecondaryEmailOracle {
    async fn lookup(&self, address: &str) -> Result<SecondaryReport, OracleError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(OracleError::NotConfigured("SECONDARY_EMAIL_VERIFY_URL"))?;

        let request = self
            .client
            .get(endpoint)
            .query(&[("email", address)])
            .header(API_KEY_HEADER, &self.api_key);

        parse_report(&fetch_ok(request).await?)
    }
}

fn parse_report(body: &[u8]) -> Result<SecondaryReport, OracleError> {
    let response: SecondaryResponse =
        serde_json::from_slice(body).map_err(|e| OracleError::Decode(e.to_string()))?;

    Ok(SecondaryReport {
        is_valid: response.result.is_valid,
        is_disposable: response.result.is_disposable,
    })
}
