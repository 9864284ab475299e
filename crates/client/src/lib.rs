//! # PIES Client
//!
//! REST client for the PIES backend.
//!
//! [`PiesClient`] attaches the session's bearer token, turns failure responses into readable
//! messages, and drives a [`pies_core::FormInstance`] through its submission cycle.

mod client;
pub mod config;
mod error;

pub use client::PiesClient;
pub use config::ClientConfig;
pub use error::{
    interpret_error_body, ClientError, ClientResult, ErrorBody, EMPTY_RESPONSE_MESSAGE,
    UNREADABLE_RESPONSE_MESSAGE,
};
