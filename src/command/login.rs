// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::ExposeSecret;

use crate::{
    client,
    error::{self, Result},
    password, session,
};

/// Log in to the attendance service and keep the session token.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The email address to authenticate as.
    #[clap()]
    email: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(
        self,
        session: &mut session::Session,
        gateway: impl client::Gateway + Send + Sync,
        prompt: &dyn password::Prompt,
    ) -> Result<()> {
        let password = prompt
            .prompt(&self.email)
            .await?
            .ok_or(error::Password::NoPrompt)?;

        let auth = gateway
            .authenticate(&self.email, password.expose_secret())
            .await?;

        println!("Logged in as {} <{}>", auth.user.name, auth.user.email);
        session.login(auth.token, auth.user).await;
        Ok(())
    }
}
