//! Helper functions shared across layers.
//!
//! - [`html`] - Markup detection, markdown conversion, sanitization and tag stripping
//! - [`display_name`] - Sender name derivation from an address
//! - [`client_ip`] - Client IP resolution from request headers

pub mod client_ip;
pub mod display_name;
pub mod html;
