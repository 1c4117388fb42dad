// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use log::error;

use crate::{
    client,
    error::{self, Result},
    metadata, password, session,
};

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}

/// Record one attendance by hand, for when a badge will not scan.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The student identifier exactly as encoded on the badge.
    #[clap()]
    student_id: String,

    /// The attendance date (YYYY-MM-DD); today when omitted.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// The attendance time (HH:MM, 24-hour); now when omitted.
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    /// The remarks stored with the record.
    #[arg(long, default_value = client::SCAN_REMARKS)]
    remarks: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(
        self,
        session: &mut session::Session,
        gateway: impl client::Gateway + Send + Sync,
        _prompt: &dyn password::Prompt,
    ) -> Result<()> {
        session.restore(&gateway).await;
        if !session.is_authenticated() {
            error!(
                "Not authenticated; run `{} login` first",
                *metadata::CLIENT_NAME
            );
            return Err(error::Submission::Unauthenticated.into());
        }

        let now = Local::now().naive_local();
        let when = NaiveDateTime::new(
            self.date.unwrap_or_else(|| now.date()),
            self.time.unwrap_or_else(|| now.time()),
        );
        let submission = client::Submission::at(&self.student_id, when, &self.remarks);

        let recorded = gateway
            .submit_attendance(session.token(), &submission)
            .await?;
        super::print_recorded(&recorded);
        Ok(())
    }
}
