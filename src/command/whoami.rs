// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use tabled::{settings::Style, Table};

use crate::{
    client,
    error::{self, Result},
    metadata, password, session,
};

/// Show the user the stored session belongs to.
#[derive(Debug, Parser)]
pub(crate) struct Command;

#[async_trait]
impl super::Command for Command {
    async fn execute(
        self,
        session: &mut session::Session,
        gateway: impl client::Gateway + Send + Sync,
        _prompt: &dyn password::Prompt,
    ) -> Result<()> {
        session.restore(&gateway).await;

        if let Some(user) = session.user() {
            println!("{}", Table::new([user]).with(Style::rounded()));
            Ok(())
        } else {
            error!(
                "Not authenticated; run `{} login` first",
                *metadata::CLIENT_NAME
            );
            Err(error::Error::Command)
        }
    }
}
