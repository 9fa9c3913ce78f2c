//! Domain layer containing the contact gateway's value objects and collaborator contracts.
//!
//! Everything here is request-scoped: a [`entities::Submission`] is created per inbound
//! request and dropped when the pipeline finishes. The only state shared across requests
//! lives behind [`ports::CounterStore`].
//!
//! # Architecture
//!
//! - [`entities`] - Submissions, rate-limit keys, verdicts, notification documents, outcomes
//! - [`ports`] - Traits for the external collaborators the gates talk to
//! - [`errors`] - Error types raised at the collaborator boundary
//!
//! # Design Principles
//!
//! - The domain layer has no dependencies on HTTP, Redis or SMTP crates
//! - Collaborator traits are implemented by the infrastructure layer
//! - Orchestration lives in [`crate::application::services`]

pub mod entities;
pub mod errors;
pub mod ports;
