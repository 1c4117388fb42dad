// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{client, error};

#[derive(Clone, Debug, Serialize)]
pub(super) struct LoginRequest<'cred> {
    pub(super) email: &'cred str,
    pub(super) password: &'cred str,
}

/// Some deployments embed the user in the login response; older ones return
/// the token alone and expect a follow-up user lookup.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponse {
    pub(super) token: String,
    #[serde(default)]
    pub(super) user: Option<client::User>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserEnvelope {
    pub(super) data: client::User,
}

/// Error body shared by the authenticated endpoints.
#[derive(Debug, Default, Deserialize)]
pub(super) struct Failure {
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// The closed set of shapes the attendance endpoint produces, regardless of
/// status code: a field-level validation map, a bare message, a data payload,
/// or none of those. Anything else deserializes to the empty reply, which
/// classifies as unknown.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AttendanceReply {
    #[serde(default)]
    pub(super) errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) data: Option<client::Recorded>,
}

fn join_validation(errors: &BTreeMap<String, Vec<String>>, fallback: Option<String>) -> String {
    let joined = errors
        .values()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() {
        fallback.unwrap_or_else(|| "Validation failed".to_owned())
    } else {
        joined
    }
}

/// Classifies a reply delivered with a success status. The service reports
/// some rejections this way, so the body shape decides, in order: validation
/// map, bare message, data payload.
pub(super) fn interpret(reply: AttendanceReply) -> Result<client::Recorded, error::Submission> {
    if let Some(errors) = reply.errors {
        return Err(error::Submission::Validation(join_validation(
            &errors,
            reply.message,
        )));
    }

    match (reply.message, reply.data) {
        (Some(message), None) => Err(error::Submission::Rejected(message)),
        (_, Some(data)) => Ok(data),
        (None, None) => Err(error::Submission::Unknown),
    }
}

/// Classifies a reply delivered with a failure status: a validation map at
/// 422 wins, then the message field, then the bare status code.
pub(super) fn classify_failure(status: StatusCode, reply: AttendanceReply) -> error::Submission {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(errors) = reply.errors {
            return error::Submission::Validation(join_validation(&errors, None));
        }
    }

    match reply.message {
        Some(message) => error::Submission::Rejected(message),
        None => error::Submission::Rejected(format!("Server error: {}", status.as_u16())),
    }
}
