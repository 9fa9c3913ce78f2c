//! Address verification results.
//!
//! The primary and secondary oracles answer with different schemas. Both are kept
//! as distinct variants of [`AddressOracleResult`] so that "the oracle said invalid"
//! and "no oracle could be reached" never collapse into the same branch.

use std::fmt;

/// Deliverability report from the primary oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryReport {
    pub format_valid: bool,
    pub disposable: bool,
    pub smtp_reachable: bool,
}

impl PrimaryReport {
    pub fn rejection(&self) -> Option<AddressRejection> {
        if !self.format_valid {
            Some(AddressRejection::MalformedPerOracle)
        } else if self.disposable {
            Some(AddressRejection::Disposable)
        } else if !self.smtp_reachable {
            Some(AddressRejection::Unreachable)
        } else {
            None
        }
    }
}

/// Validity report from the secondary oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryReport {
    pub is_valid: bool,
    pub is_disposable: bool,
}

impl SecondaryReport {
    pub fn rejection(&self) -> Option<AddressRejection> {
        if !self.is_valid {
            Some(AddressRejection::NotValid)
        } else if self.is_disposable {
            Some(AddressRejection::Disposable)
        } else {
            None
        }
    }
}

/// Which oracle produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleSource {
    Primary,
    Secondary,
}

impl OracleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for OracleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of consulting the oracle chain for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressOracleResult {
    Primary(PrimaryReport),
    Secondary(SecondaryReport),
    Unavailable,
}

/// Why an oracle judged an address undeliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRejection {
    MalformedPerOracle,
    Disposable,
    Unreachable,
    NotValid,
}

impl AddressRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedPerOracle => "format_invalid",
            Self::Disposable => "disposable",
            Self::Unreachable => "smtp_unreachable",
            Self::NotValid => "not_valid",
        }
    }
}

/// Result of address validation. Recomputed for every submission, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub reason: Option<AddressRejection>,
    pub oracle: OracleSource,
}

impl ValidationVerdict {
    pub fn from_report(oracle: OracleSource, reason: Option<AddressRejection>) -> Self {
        Self {
            valid: reason.is_none(),
            reason,
            oracle,
        }
    }
}
