// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error;

/// Remarks recorded for a badge scan. The scanner station only ever clocks
/// students in; clock-out is handled elsewhere.
pub(crate) const SCAN_REMARKS: &str = "in";

#[derive(Clone, Debug, Deserialize, Tabled)]
pub(crate) struct User {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
}

#[derive(Clone, Debug, Deserialize, Tabled)]
pub(crate) struct Student {
    #[tabled(rename = "Student ID")]
    pub(crate) student_id: String,
    #[tabled(rename = "First Name")]
    pub(crate) firstname: String,
    #[tabled(rename = "Last Name")]
    pub(crate) lastname: String,
}

/// An attendance row as the service echoes it back. Display only.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Record {
    pub(crate) student_id: String,
    pub(crate) date: String,
    pub(crate) time: String,
    #[serde(default)]
    pub(crate) remarks: String,
}

/// The data payload of a successful submission: the stored record plus the
/// matched student, when the service includes one.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Recorded {
    #[serde(flatten)]
    pub(crate) record: Record,
    pub(crate) student: Option<Student>,
}

/// One attendance submission. Built fresh per scan event and immutable once
/// sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Submission {
    pub(crate) student_id: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) remarks: String,
}

impl Submission {
    /// Builds the submission for a badge decoded at `when` (local wall-clock
    /// time, no offset recorded): `%Y-%m-%d` date, zero-padded 24-hour
    /// `%H:%M` time.
    pub(crate) fn at(student_id: &str, when: NaiveDateTime, remarks: &str) -> Self {
        Self {
            student_id: student_id.to_owned(),
            date: when.format("%Y-%m-%d").to_string(),
            time: when.format("%H:%M").to_string(),
            remarks: remarks.to_owned(),
        }
    }
}

pub(crate) struct AuthSession {
    pub(crate) token: String,
    pub(crate) user: User,
}

/// The remote attendance service. One HTTP request per operation, single
/// attempt, no retry.
#[async_trait]
pub(crate) trait Gateway {
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<AuthSession, error::Auth>;

    async fn current_user(&self, token: &str) -> Result<User, error::Auth>;

    /// `token == None` fails with `Unauthenticated` before any request is
    /// sent.
    async fn submit_attendance(
        &self,
        token: Option<&str>,
        submission: &Submission,
    ) -> Result<Recorded, error::Submission>;
}
