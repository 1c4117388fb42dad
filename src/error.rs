// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("authentication error: {0}")]
    Auth(#[from] Auth),
    #[error("attendance submission error: {0}")]
    Submission(#[from] Submission),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

/// Failures of the login and current-user gateway operations. The service
/// message is carried verbatim when one could be extracted from the response.
#[derive(Error, Debug)]
pub(crate) enum Auth {
    #[error("{0}")]
    Rejected(String),
    #[error("Network error. Please check your connection.")]
    NetworkUnreachable,
    #[error("{0}")]
    Unexpected(String),
}

/// Failures of the attendance submission operation, one variant per response
/// shape the service is known to produce.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Submission {
    #[error("not authenticated; log in first")]
    Unauthenticated,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Unknown error occurred")]
    Unknown,
    #[error("Network error. Please check your connection.")]
    NetworkUnreachable,
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}
