// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

mod api;

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header;
use url::Url;

use crate::{
    client::{self, AuthSession, Recorded, Submission, User},
    error::{self, Result},
    metadata,
};

const LOGIN_PATH: &str = "/api/login";
const USER_PATH: &str = "/api/admin/user";
const ATTENDANCE_PATH: &str = "/api/admin/attendance";

/// Classifies a transport-level fault: the request never produced a response.
fn auth_transport(err: &reqwest::Error) -> error::Auth {
    if err.is_connect() || err.is_timeout() {
        error::Auth::NetworkUnreachable
    } else {
        error::Auth::Unexpected(err.to_string())
    }
}

fn submission_transport(err: &reqwest::Error) -> error::Submission {
    if err.is_connect() || err.is_timeout() {
        error::Submission::NetworkUnreachable
    } else {
        error::Submission::Unexpected(err.to_string())
    }
}

/// Stateless HTTP client for the attendance service. Credentials are passed
/// per call; nothing is cached between requests.
pub(crate) struct Gateway {
    http: reqwest::Client,
    login: Url,
    user: Url,
    attendance: Url,
}

impl Gateway {
    pub(crate) fn new(base: &Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(metadata::CLIENT_USER_AGENT.as_str())
                .build()?,
            login: base.join(LOGIN_PATH)?,
            user: base.join(USER_PATH)?,
            attendance: base.join(ATTENDANCE_PATH)?,
        })
    }
}

#[async_trait]
impl client::Gateway for Gateway {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, error::Auth> {
        let resp = self
            .http
            .post(self.login.clone())
            .json(&api::LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| auth_transport(&e))?;

        let status = resp.status();
        debug!("Login response status: {}", status);

        if !status.is_success() {
            let failure: api::Failure = resp.json().await.unwrap_or_default();
            return Err(error::Auth::Rejected(
                failure
                    .message
                    .unwrap_or_else(|| "Login did not succeed".to_owned()),
            ));
        }

        let body: api::LoginResponse = resp
            .json()
            .await
            .map_err(|e| error::Auth::Unexpected(e.to_string()))?;
        let user = match body.user {
            Some(user) => user,
            None => client::Gateway::current_user(self, &body.token).await?,
        };

        Ok(AuthSession {
            token: body.token,
            user,
        })
    }

    async fn current_user(&self, token: &str) -> Result<User, error::Auth> {
        let resp = self
            .http
            .get(self.user.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| auth_transport(&e))?;

        let status = resp.status();
        debug!("Current-user response status: {}", status);

        if !status.is_success() {
            let failure: api::Failure = resp.json().await.unwrap_or_default();
            return Err(error::Auth::Rejected(
                failure
                    .message
                    .unwrap_or_else(|| "Failed to fetch user data".to_owned()),
            ));
        }

        let envelope: api::UserEnvelope = resp
            .json()
            .await
            .map_err(|e| error::Auth::Unexpected(e.to_string()))?;
        Ok(envelope.data)
    }

    async fn submit_attendance(
        &self,
        token: Option<&str>,
        submission: &Submission,
    ) -> Result<Recorded, error::Submission> {
        let bearer = match token {
            Some(bearer) if !bearer.is_empty() => bearer,
            _ => return Err(error::Submission::Unauthenticated),
        };

        let resp = self
            .http
            .post(self.attendance.clone())
            .bearer_auth(bearer)
            .header(header::ACCEPT, "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|e| submission_transport(&e))?;

        let status = resp.status();
        debug!("Attendance response status: {}", status);

        // A body outside the known shapes degrades to the empty reply, which
        // classifies as unknown (2xx) or status-coded (otherwise).
        let reply: api::AttendanceReply = resp.json().await.unwrap_or_default();
        if status.is_success() {
            api::interpret(reply)
        } else {
            Err(api::classify_failure(status, reply))
        }
    }
}
