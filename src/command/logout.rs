// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client, error::Result, password, session};

/// Forget the session token, here and on disk.
#[derive(Debug, Parser)]
pub(crate) struct Command;

#[async_trait]
impl super::Command for Command {
    async fn execute(
        self,
        session: &mut session::Session,
        _gateway: impl client::Gateway + Send + Sync,
        _prompt: &dyn password::Prompt,
    ) -> Result<()> {
        session.logout().await?;
        println!("Logged out.");
        Ok(())
    }
}
