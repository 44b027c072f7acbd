//! # Herald Core Event System Errors
//!
//! Defines error types specific to the Herald Event System.
//!
//! This module includes [`EventSystemError`], the enum covering everything a
//! dispatch can fail with: a registered value that turns out not to be
//! invocable, a listener's own failure, and problems in the config-driven
//! dynamic phase (unreadable definitions, unknown services, failed calls).
use std::path::PathBuf;
use thiserror::Error;

use crate::event::BoxError;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Invalid listener for event {event_name}, with type {type_name}.")]
    InvalidListener {
        event_name: String,
        type_name: String,
    },

    /// A listener failed; its error is passed through untouched
    #[error(transparent)]
    Listener(BoxError),

    #[error("Invalid dynamic listener definition '{}': {reason}", .path.display())]
    DynamicDefinition {
        path: PathBuf,
        reason: String,
    },

    #[error("Service '{service}' is not registered in the container")]
    ServiceNotFound {
        service: String,
    },

    #[error("Call to '{service}::{method}' failed: {reason}")]
    ServiceCall {
        service: String,
        method: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EventSystemError>;
