//! Primary deliverability oracle client.

use async_trait::async_trait;
use serde::Deserialize;

use super::fetch_ok;
use crate::domain::entities::PrimaryReport;
use crate::domain::errors::OracleError;
use crate::domain::ports::PrimaryAddressOracle;

#[derive(Debug, Deserialize)]
struct PrimaryResponse {
    result: PrimaryResult,
}

#[derive(Debug, Deserialize)]
struct PrimaryResult {
    validation_details: ValidationDetails,
}

#[derive(Debug, Deserialize)]
struct ValidationDetails {
    #[serde(default)]
    format_valid: bool,
    #[serde(default)]
    disposable: bool,
    #[serde(default)]
    smtp_check: bool,
}

/// Queries `GET <endpoint>?api_key=<key>&email_address=<address>`.
pub struct PrimaryEmailOracle {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: String,
}

impl PrimaryEmailOracle {
    pub fn new(client: reqwest::Client, endpoint: Option<String>, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl PrimaryAddressOracle for PrimaryEmailOracle {
    async fn lookup(&self, address: &str) -> Result<PrimaryReport, OracleError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(OracleError::NotConfigured("PRIMARY_EMAIL_VERIFY_URL"))?;

        let request = self.client.get(endpoint).query(&[
            ("api_key", self.api_key.as_str()),
            ("email_address", address),
        ]);

        parse_report(&fetch_ok(request).await?)
    }
}

fn parse_report(body: &[u8]) -> Result<PrimaryReport, OracleError> {
    let response: PrimaryResponse =
        serde_json::from_slice(body).map_err(|e| OracleError::Decode(e.to_string()))?;
    let details = response.result.validation_details;

    Ok(PrimaryReport {
        format_valid: details.format_valid,
        disposable: details.disposable,
        smtp_reachable: details.smtp_check,
    })
}
