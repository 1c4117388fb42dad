// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::future;

use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use log::{debug, error};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt as _, BufReader},
    select,
    time::{self, Instant},
};

use crate::{
    client,
    error::{self, Result},
    flow, metadata, password, session,
};

/// Run the scan station: each line on standard input is one decoded badge
/// (keyboard-wedge scanners type the identifier followed by Enter). An empty
/// line re-arms the station by hand.
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
        if !session.is_authenticated() {
            error!(
                "Not authenticated; run `{} login` first",
                *metadata::CLIENT_NAME
            );
            return Err(error::Submission::Unauthenticated.into());
        }

        run_station(
            &gateway,
            session.token(),
            BufReader::new(io::stdin()),
        )
        .await
    }
}

async fn rearm_tick(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => future::pending().await,
    }
}

/// One scan interaction at a time: while a submission is in flight or its
/// outcome is on screen, further scans are dropped. A success re-arms on its
/// own after the dwell; an error waits for the operator.
async fn run_station(
    gateway: &(impl client::Gateway + Sync),
    token: Option<&str>,
    reader: impl AsyncBufRead + Unpin,
) -> Result<()> {
    let mut lines = reader.lines();
    let mut flow = flow::Flow::new();
    println!("Ready to scan.");

    loop {
        select! {
            () = rearm_tick(flow.rearm_at()) => {
                flow.rearm();
                println!("Ready to scan.");
            }
            candidate = lines.next_line() => {
                let Some(line) = candidate? else { break };
                let code = line.trim();

                if code.is_empty() {
                    if flow.is_pending() {
                        flow.rearm();
                        println!("Ready to scan.");
                    }
                } else if !flow.accept() {
                    debug!("Dropping scan of {:?} while a prior scan settles", code);
                } else {
                    let submission = client::Submission::at(
                        code,
                        Local::now().naive_local(),
                        client::SCAN_REMARKS,
                    );
                    match gateway.submit_attendance(token, &submission).await {
                        Ok(recorded) => {
                            super::print_recorded(&recorded);
                            flow.dwell(Instant::now());
                        }
                        Err(e) => {
                            error!("{}", e);
                            println!("Press Enter to scan again.");
                            flow.hold();
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
        time::Duration,
    };

    use tokio::io::AsyncWriteExt as _;

    use super::*;

    /// Replays scripted replies and records every submission that reaches the
    /// service.
    struct ScriptedGateway {
        replies: Mutex<VecDeque<error::Submission>>,
        calls: Mutex<Vec<client::Submission>>,
    }

    impl ScriptedGateway {
        fn succeeding() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_once(reply: error::Submission) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([reply])),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn submitted_ids(&self) -> Vec<String> {
            self.calls
                .lock()
                .expect("mock lock")
                .iter()
                .map(|s| s.student_id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl client::Gateway for ScriptedGateway {
        async fn authenticate(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<client::AuthSession, error::Auth> {
            Err(error::Auth::Rejected("not under test".to_owned()))
        }

        async fn current_user(&self, _token: &str) -> Result<client::User, error::Auth> {
            Err(error::Auth::Rejected("not under test".to_owned()))
        }

        async fn submit_attendance(
            &self,
            _token: Option<&str>,
            submission: &client::Submission,
        ) -> Result<client::Recorded, error::Submission> {
            self.calls.lock().expect("mock lock").push(submission.clone());
            match self.replies.lock().expect("mock lock").pop_front() {
                Some(reply) => Err(reply),
                None => Ok(client::Recorded {
                    record: client::Record {
                        student_id: submission.student_id.clone(),
                        date: submission.date.clone(),
                        time: submission.time.clone(),
                        remarks: submission.remarks.clone(),
                    },
                    student: None,
                }),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drops_scans_while_prior_scan_settles() {
        let gateway = ScriptedGateway::succeeding();

        run_station(&gateway, Some("t0"), b"S1\nS2\n".as_slice())
            .await
            .expect("station run");

        assert_eq!(gateway.submitted_ids(), ["S1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn rearms_on_its_own_after_the_dwell() {
        let gateway = ScriptedGateway::succeeding();
        let (mut wedge, station) = io::duplex(64);

        let feeder = tokio::spawn(async move {
            wedge.write_all(b"S1\n").await.expect("write");
            time::sleep(flow::DWELL + Duration::from_secs(1)).await;
            wedge.write_all(b"S2\n").await.expect("write");
        });

        run_station(&gateway, Some("t0"), BufReader::new(station))
            .await
            .expect("station run");
        feeder.await.expect("feeder");

        assert_eq!(gateway.submitted_ids(), ["S1", "S2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn error_holds_until_the_operator_rearms() {
        let gateway =
            ScriptedGateway::failing_once(error::Submission::Rejected("closed".to_owned()));

        run_station(&gateway, Some("t0"), b"S1\nS2\n\nS3\n".as_slice())
            .await
            .expect("station run");

        // S2 lands while the error is held; S3 follows the operator's Enter.
        assert_eq!(gateway.submitted_ids(), ["S1", "S3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn submissions_carry_the_scan_remarks() {
        let gateway = ScriptedGateway::succeeding();

        run_station(&gateway, Some("t0"), b"  S1  \n".as_slice())
            .await
            .expect("station run");

        let calls = gateway.calls.lock().expect("mock lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].student_id, "S1");
        assert_eq!(calls[0].remarks, client::SCAN_REMARKS);
    }
}
