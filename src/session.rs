// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{client, error::Result, storage};

/// The shape persisted across restarts. Only the token survives the process;
/// the user profile is re-resolved on restore.
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct Data {
    token: String,
}

impl Data {
    pub(crate) fn new(token: String) -> Self {
        Self { token }
    }
}

/// The authenticated-user state held client-side. Both fields are set and
/// cleared together; an absent (or empty) token means "not authenticated",
/// which is a state, not an error.
pub(crate) struct Session {
    storage: Box<dyn storage::Storage<Data>>,
    token: Option<String>,
    user: Option<client::User>,
}

impl Session {
    pub(crate) fn new(storage: Box<dyn storage::Storage<Data>>) -> Self {
        Self {
            storage,
            token: None,
            user: None,
        }
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn user(&self) -> Option<&client::User> {
        self.user.as_ref()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Hydrates the session from the persisted token, resolving the user via
    /// the gateway. Degrades to "not authenticated" on every failure path: a
    /// token the service no longer accepts is discarded from storage. Makes
    /// no network call when no token is persisted.
    pub(crate) async fn restore(&mut self, gateway: &(impl client::Gateway + Sync)) {
        let token = match self.storage.get().await {
            Ok(Some(data)) if !data.token.is_empty() => data.token,
            Ok(_) => {
                debug!("No persisted token; starting unauthenticated");
                return;
            }
            Err(e) => {
                warn!("Could not read the persisted session: {}", e);
                return;
            }
        };

        match gateway.current_user(&token).await {
            Ok(user) => {
                self.token = Some(token);
                self.user = Some(user);
            }
            Err(e) => {
                warn!("Discarding the persisted token: {}", e);
                if let Err(e) = self.storage.clear().await {
                    warn!("Could not clear the persisted session: {}", e);
                }
            }
        }
    }

    /// Replaces the session wholesale and persists the token. A storage write
    /// failure leaves the in-memory session logged in for this process.
    pub(crate) async fn login(&mut self, token: String, user: client::User) {
        if let Err(e) = self.storage.update(&Data::new(token.clone())).await {
            warn!("Could not persist the session token: {}", e);
        }
        self.token = Some(token);
        self.user = Some(user);
    }

    pub(crate) async fn logout(&mut self) -> Result<()> {
        self.token = None;
        self.user = None;
        self.storage.clear().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::{
        client, error,
        storage::{Memory, Storage as _},
    };

    use super::*;

    /// Accepts exactly one token and counts lookups.
    struct FixedGateway {
        accepted_token: &'static str,
        user_lookups: AtomicUsize,
    }

    impl FixedGateway {
        fn new(accepted_token: &'static str) -> Self {
            Self {
                accepted_token,
                user_lookups: AtomicUsize::new(0),
            }
        }

        fn user() -> client::User {
            client::User {
                id: 1,
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
            }
        }
    }

    #[async_trait]
    impl client::Gateway for FixedGateway {
        async fn authenticate(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<client::AuthSession, error::Auth> {
            Err(error::Auth::Rejected("not under test".to_owned()))
        }

        async fn current_user(&self, token: &str) -> Result<client::User, error::Auth> {
            let _ = self.user_lookups.fetch_add(1, Ordering::SeqCst);
            if token == self.accepted_token {
                Ok(Self::user())
            } else {
                Err(error::Auth::Rejected("Unauthenticated.".to_owned()))
            }
        }

        async fn submit_attendance(
            &self,
            _token: Option<&str>,
            _submission: &client::Submission,
        ) -> Result<client::Recorded, error::Submission> {
            Err(error::Submission::Unknown)
        }
    }

    async fn seeded_storage(token: &str) -> Box<dyn storage::Storage<Data>> {
        let mut storage = Memory::new();
        storage
            .update(&Data::new(token.to_owned()))
            .await
            .expect("memory storage cannot fail");
        Box::new(storage)
    }

    #[tokio::test]
    async fn restore_without_token_makes_no_network_call() {
        let gateway = FixedGateway::new("t0");
        let mut session = Session::new(Box::new(Memory::<Data>::new()));

        session.restore(&gateway).await;

        assert!(!session.is_authenticated());
        assert_eq!(gateway.user_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restore_with_valid_token_authenticates() {
        let gateway = FixedGateway::new("t0");
        let mut session = Session::new(seeded_storage("t0").await);

        session.restore(&gateway).await;

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("t0"));
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("Ada"));
    }

    #[tokio::test]
    async fn restore_with_rejected_token_clears_storage() {
        let gateway = FixedGateway::new("t0");

        let mut session = Session::new(seeded_storage("stale").await);
        session.restore(&gateway).await;
        assert!(!session.is_authenticated());

        // A second restore sees the cleared store and stays off the network.
        session.restore(&gateway).await;
        assert_eq!(gateway.user_lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn restore_treats_empty_token_as_absent() {
        let gateway = FixedGateway::new("");
        let mut session = Session::new(seeded_storage("").await);

        session.restore(&gateway).await;

        assert!(!session.is_authenticated());
        assert_eq!(gateway.user_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let gateway = FixedGateway::new("t0");
        let mut session = Session::new(seeded_storage("t0").await);
        session.restore(&gateway).await;

        session.logout().await.expect("logout");
        session.logout().await.expect("repeat logout");

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }
}
