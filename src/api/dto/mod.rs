//! Request and response bodies for the HTTP API.

pub mod contact;
pub mod health;
pub mod message;
