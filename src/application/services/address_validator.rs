//! Address validation through a primary oracle with a secondary fallback.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use validator::ValidateEmail;

use crate::domain::entities::{AddressOracleResult, OracleSource, ValidationVerdict};
use crate::domain::ports::{PrimaryAddressOracle, SecondaryAddressOracle};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The address does not follow mailbox grammar. Safe to echo to the caller.
    #[error("invalid email address format")]
    InvalidFormat,
    /// Neither oracle could answer.
    #[error("email validation service unavailable")]
    ValidationUnavailable,
}

/// Decides whether an address is well-formed and deliverable.
///
/// The secondary oracle is a substitute for an unavailable primary, not a second
/// opinion: a negative primary report is final.
pub struct AddressValidator {
    primary: Arc<dyn PrimaryAddressOracle>,
    secondary: Arc<dyn SecondaryAddressOracle>,
}

impl AddressValidator {
    pub fn new(
        primary: Arc<dyn PrimaryAddressOracle>,
        secondary: Arc<dyn SecondaryAddressOracle>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Mailbox grammar check. Never touches the network.
    pub fn is_well_formed(address: &str) -> bool {
        address.validate_email()
    }

    /// Consults the primary oracle, falling back to the secondary only when the
    /// primary does not answer.
    pub async fn consult(&self, address: &str) -> AddressOracleResult {
        match self.primary.lookup(address).await {
            Ok(report) => return AddressOracleResult::Primary(report),
            Err(e) => warn!(oracle = "primary", "Address oracle unavailable: {}", e),
        }

        match self.secondary.lookup(address).await {
            Ok(report) => AddressOracleResult::Secondary(report),
            Err(e) => {
                warn!(oracle = "secondary", "Address oracle unavailable: {}", e);
                AddressOracleResult::Unavailable
            }
        }
    }

    /// Validates `address`.
    ///
    /// Returns a verdict (possibly negative) when an oracle answered.
    ///
    /// # Errors
    ///
    /// - [`AddressError::InvalidFormat`] without calling any oracle
    /// - [`AddressError::ValidationUnavailable`] when both oracles failed
    pub async fn validate(&self, address: &str) -> Result<ValidationVerdict, AddressError> {
        if !Self::is_well_formed(address) {
            return Err(AddressError::InvalidFormat);
        }

        let verdict = match self.consult(address).await {
            AddressOracleResult::Primary(report) => {
                ValidationVerdict::from_report(OracleSource::Primary, report.rejection())
            }
            AddressOracleResult::Secondary(report) => {
                ValidationVerdict::from_report(OracleSource::Secondary, report.rejection())
            }
            AddressOracleResult::Unavailable => return Err(AddressError::ValidationUnavailable),
        };

        info!(
            oracle = %verdict.oracle,
            valid = verdict.valid,
            reason = verdict.reason.map(|r| r.as_str()).unwrap_or("none"),
            "Address validated"
        );
        Ok(verdict)
    }
}
