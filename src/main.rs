// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod client;
mod command;
mod error;
mod flow;
mod metadata;
mod password;
mod rest;
mod session;
mod storage;

use std::{path::PathBuf, process, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use log::{error, warn};
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Logout(command::logout::Command),
    Whoami(command::whoami::Command),
    Scan(command::scan::Command),
    Record(command::record::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(
        self,
        session: &mut session::Session,
        gateway: impl client::Gateway + Send + Sync,
        prompt: &dyn password::Prompt,
    ) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(session, gateway, prompt).await,
            Self::Logout(cmd) => cmd.execute(session, gateway, prompt).await,
            Self::Whoami(cmd) => cmd.execute(session, gateway, prompt).await,
            Self::Scan(cmd) => cmd.execute(session, gateway, prompt).await,
            Self::Record(cmd) => cmd.execute(session, gateway, prompt).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the attendance service.
    #[arg(long, env = "ROLLCALL_URL", default_value = "http://127.0.0.1:8000", value_parser = Url::parse)]
    url: Url,

    /// The whole-request timeout for service calls, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Keep the session token for this process only instead of on disk.
    #[arg(long)]
    no_store_token: bool,

    /// The path to the Pinentry program to use when prompting for the login
    /// password.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage<session::Data>> {
    if !args.no_store_token {
        if let Some(file_storage) = storage::File::new("session.json") {
            return Box::new(file_storage);
        }

        warn!("We need to fall back to in-memory storage because no data directory is available; the session will not survive this process");
    }

    Box::new(storage::Memory::<session::Data>::new())
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let gateway = rest::Gateway::new(&args.url, Duration::from_secs(args.timeout))?;
    let mut session = session::Session::new(get_session_storage(&args));

    command::Command::execute(args.command, &mut session, gateway, &prompt).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("ROLLCALL_LOG", "warn")
        .write_style("ROLLCALL_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
