// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::{client, error::Result, password, session};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod record;
pub(crate) mod scan;
pub(crate) mod whoami;

#[async_trait]
pub(crate) trait Command {
    async fn execute(
        self,
        session: &mut session::Session,
        gateway: impl client::Gateway + Send + Sync,
        prompt: &dyn password::Prompt,
    ) -> Result<()>;
}

/// Confirmation block for a stored attendance record, shared by the scan
/// station and one-shot recording.
pub(crate) fn print_recorded(recorded: &client::Recorded) {
    println!("Attendance Recorded");
    match &recorded.student {
        Some(student) => {
            println!("  Student ID: {}", student.student_id);
            println!("  Name: {} {}", student.firstname, student.lastname);
        }
        None => println!("  Student ID: {}", recorded.record.student_id),
    }
    println!("  Date: {}", recorded.record.date);
    println!("  Time: {}", recorded.record.time);
}
