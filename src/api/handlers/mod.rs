//! HTTP request handlers.

pub mod health;
pub mod preview;
pub mod send_email;
pub mod webhook;

pub use health::health_handler;
pub use preview::preview_handler;
pub use send_email::send_email_handler;
pub use webhook::webhook_handler;
