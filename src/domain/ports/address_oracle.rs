//! Address deliverability oracle traits.
//!
//! The two vendors speak different schemas, so each gets its own trait and report type.

use async_trait::async_trait;

use crate::domain::entities::{PrimaryReport, SecondaryReport};
use crate::domain::errors::OracleError;

/// First-choice deliverability oracle.
///
/// An `Err` means the oracle could not answer (network failure, non-200 status,
/// undecodable body). A negative report is returned as `Ok`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrimaryAddressOracle: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<PrimaryReport, OracleError>;
}

/// Substitute oracle consulted only when the primary is unavailable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecondaryAddressOracle: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<SecondaryReport, OracleError>;
}
