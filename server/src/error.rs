//! Infrastructure faults raised while serving a request
//!
//! Validation outcomes (blank fields, taken names, unknown users) are ordinary
//! return values and never appear here. Anything in [`ServiceError`] aborts
//! the current request and is reported as a fault; nothing is retried.

use crate::store::StoreError;
use shared::{TransformError, MSG_QUERY_FAILED};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("credential transform failed: {0}")]
    Credential(#[from] TransformError),
    #[error("request exceeded {0:?}")]
    TimedOut(Duration),
    #[error("request worker failed: {0}")]
    Worker(String),
}

impl ServiceError {
    /// Text sent back to the requester.
    ///
    /// Store detail is withheld unless `expose_detail` is set, since raw
    /// database errors leak schema and query information.
    pub fn public_message(&self, expose_detail: bool) -> String {
        if expose_detail {
            format!("{} [{}]", MSG_QUERY_FAILED, self)
        } else {
            format!("{}.", MSG_QUERY_FAILED)
        }
    }
}
