//! Authentication controller
//!
//! Owns the single [`AuthState`] and sequences validate → persist → test →
//! reconcile. All mutation goes through `&mut self` methods. Slow work
//! (git processes, the connection test) runs on blocking workers and reports
//! back over an mpsc channel; results are applied only when the owner drains
//! that channel with [`AuthController::process_pending`] or
//! [`AuthController::settle`].
//!
//! ## Concurrency policy
//!
//! - A connection test requested while one is already running is ignored.
//! - Sign-out, sign-in and any credential edit supersede a running test: its
//!   result is discarded on arrival.
//! - Status checks and tests may race; whichever completes last wins.

use std::path::Path;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::credentials::Credentials;
use crate::core::git::{GitConfigBridge, GitIdentity, SystemGit};
use crate::core::profile::{ConfigProfile, ProfileImport};
use crate::core::secret_store::{KeyringStore, SecretKey, SecretStore};
use crate::core::state::{AuthState, ConnectionStatus};
use crate::core::tester::{ConnectionTester, SimulatedTester, TestFailure};
use crate::core::validation;
use crate::error::{GitAuthError, Result};

/// Shown when a test or sign-in is blocked by invalid input
pub const VALIDATION_FAILED_MESSAGE: &str = "Please fix the validation errors before continuing";

/// Shown when git configuration is requested without a name and email
pub const GIT_IDENTITY_REQUIRED_MESSAGE: &str =
    "Username and email are required to configure git";

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// Connection test finished
    ConnectionTested {
        /// Test generation the result belongs to
        generation: u64,
        result: std::result::Result<ConnectionStatus, TestFailure>,
    },
    /// Liveness probe finished
    StatusChecked(Result<bool>),
    /// Global git identity written
    GitConfigured(Result<()>),
    /// Global git identity read
    GitConfigLoaded(GitIdentity),
}

/// Owner of the authentication state machine
pub struct AuthController {
    state: AuthState,

    store: Arc<dyn SecretStore>,
    git: GitConfigBridge,
    tester: Arc<dyn ConnectionTester>,

    /// Sender for async messages (cloned into tasks)
    async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async messages
    async_rx: mpsc::Receiver<AsyncMessage>,
    /// Number of spawned tasks whose message has not been handled yet
    pending: usize,
    /// Bumped on every test start and on sign-out
    test_generation: u64,

    state_tx: watch::Sender<AuthState>,
}

impl AuthController {
    /// Create a controller over the given services
    ///
    /// The state starts empty; call [`load`](Self::load) to read persisted
    /// credentials and kick off the first status check.
    pub fn new(
        store: Arc<dyn SecretStore>,
        git: GitConfigBridge,
        tester: Arc<dyn ConnectionTester>,
    ) -> Self {
        let (async_tx, async_rx) = mpsc::channel(32);
        let (state_tx, _) = watch::channel(AuthState::default());

        Self {
            state: AuthState::default(),
            store,
            git,
            tester,
            async_tx,
            async_rx,
            pending: 0,
            test_generation: 0,
            state_tx,
        }
    }

    /// Controller over the OS keyring, the configured git binary and the
    /// simulated tester
    pub fn with_system_services(config: &Config) -> Self {
        Self::new(
            Arc::new(KeyringStore::new()),
            GitConfigBridge::new(Arc::new(SystemGit::new(config.git_binary.clone()))),
            Arc::new(SimulatedTester::new(config.test_latency())),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Published state
    // ─────────────────────────────────────────────────────────────────────────

    /// Current state
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    /// Whether background work is still outstanding
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential editing
    // ─────────────────────────────────────────────────────────────────────────

    // Editing credentials while a test runs abandons that test.

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.supersede_running_test();
        self.state.credentials = credentials;
        self.publish();
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.supersede_running_test();
        self.state.credentials.username = username.into();
        self.publish();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.supersede_running_test();
        self.state.credentials.email = email.into();
        self.publish();
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token: String = token.into();
        self.supersede_running_test();
        self.state.credentials.token = SecretString::from(token);
        self.publish();
    }

    /// Drop the outstanding connection test, if any
    ///
    /// Its result is discarded on arrival and the status returns to `Unknown`.
    fn supersede_running_test(&mut self) {
        if !self.state.is_loading {
            return;
        }
        debug!(generation = self.test_generation, "superseding running connection test");
        self.test_generation += 1;
        self.state.is_loading = false;
        self.state.connection_status = ConnectionStatus::Unknown;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Read persisted credentials, then start a status check
    ///
    /// Missing entries become empty strings. No validation is performed.
    pub fn load(&mut self) {
        let get = |key| self.store.get(key).unwrap_or_default();
        let credentials = Credentials::new(
            get(SecretKey::Username),
            get(SecretKey::Email),
            get(SecretKey::Token),
        );
        debug!(?credentials, "loaded stored credentials");

        self.supersede_running_test();
        self.state.credentials = credentials;
        self.publish();
        self.check_authentication_status();
    }

    /// Persist the current credentials to the secret store
    ///
    /// On failure the error is also placed in `error_message`.
    pub fn save_credentials(&mut self) -> Result<()> {
        let credentials = &self.state.credentials;
        let result = self
            .store
            .save(SecretKey::Username, &credentials.username)
            .and_then(|_| self.store.save(SecretKey::Email, &credentials.email))
            .and_then(|_| {
                self.store
                    .save(SecretKey::Token, credentials.token.expose_secret())
            });

        match &result {
            Ok(()) => info!("credentials saved"),
            Err(e) => {
                warn!(error = %e, "failed to save credentials");
                self.state.error_message = e.to_string();
                self.publish();
            }
        }

        result
    }

    /// Recompute `validation_errors`; true when there are none
    pub fn validate_inputs(&mut self) -> bool {
        self.state.validation_errors = validation::validate_all(&self.state.credentials);
        self.publish();
        self.state.validation_errors.is_empty()
    }

    /// Start a connection test with the current credentials
    ///
    /// Ignored while a test is already running. Invalid input sets
    /// `error_message` and leaves the connection status alone.
    pub fn test_connection(&mut self) {
        if self.state.is_loading {
            debug!("connection test already running, ignoring request");
            return;
        }

        if !self.validate_inputs() {
            self.state.error_message = VALIDATION_FAILED_MESSAGE.to_string();
            self.publish();
            return;
        }

        self.state.is_loading = true;
        self.state.error_message.clear();
        self.state.connection_status = ConnectionStatus::Testing;
        self.publish();

        self.test_generation += 1;
        let generation = self.test_generation;
        let credentials = self.state.credentials.clone();
        let tester = Arc::clone(&self.tester);
        let tx = self.async_tx.clone();
        self.pending += 1;

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || tester.test(&credentials)).await;

            let result = result.unwrap_or_else(|e| {
                warn!(error = %e, "connection test task failed");
                Err(TestFailure::ConnectionFailed)
            });

            let _ = tx
                .send(AsyncMessage::ConnectionTested { generation, result })
                .await;
        });
    }

    /// Save the credentials, then test them
    ///
    /// Credentials are persisted even if they fail validation. A test already
    /// running is replaced by a fresh one. A vault failure is returned and no
    /// test is started.
    pub fn sign_in(&mut self) -> Result<()> {
        self.save_credentials()?;
        self.supersede_running_test();
        self.test_connection();
        Ok(())
    }

    /// Forget the credentials everywhere and return to `Unknown`
    ///
    /// Also clears validation errors and the error message. A test still in
    /// flight is superseded. The in-memory state is reset even when the vault
    /// cannot be cleared; that failure is returned.
    pub fn sign_out(&mut self) -> Result<()> {
        let result = self.store.clear_all();

        self.test_generation += 1;
        self.state.credentials = Credentials::default();
        self.state.validation_errors.clear();
        self.state.connection_status = ConnectionStatus::Unknown;
        self.state.is_authenticated = false;
        self.state.is_loading = false;
        self.state.error_message.clear();

        if let Err(e) = &result {
            warn!(error = %e, "failed to clear stored credentials");
            self.state.error_message = e.to_string();
        } else {
            info!("signed out");
        }

        self.publish();
        result
    }

    /// Probe git in the background and reconcile the status with it
    pub fn check_authentication_status(&mut self) {
        let git = self.git.clone();
        self.spawn_blocking_task(
            move || AsyncMessage::StatusChecked(git.probe_liveness()),
            |e| AsyncMessage::StatusChecked(Err(e)),
        );
    }

    /// Same as [`check_authentication_status`](Self::check_authentication_status)
    pub fn refresh_status(&mut self) {
        self.check_authentication_status();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Git configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the current username and email to the global git config
    pub fn configure_git(&mut self) {
        let credentials = &self.state.credentials;
        if credentials.username.is_empty() || credentials.email.is_empty() {
            self.state.error_message = GIT_IDENTITY_REQUIRED_MESSAGE.to_string();
            self.publish();
            return;
        }

        let username = credentials.username.clone();
        let email = credentials.email.clone();
        let git = self.git.clone();
        self.spawn_blocking_task(
            move || AsyncMessage::GitConfigured(git.configure_global(&username, &email)),
            |e| AsyncMessage::GitConfigured(Err(e)),
        );
    }

    /// Refresh `git_identity` from the global git config
    pub fn load_git_config(&mut self) {
        let git = self.git.clone();
        self.spawn_blocking_task(
            move || AsyncMessage::GitConfigLoaded(git.read_global_config()),
            |_| AsyncMessage::GitConfigLoaded(GitIdentity::default()),
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Profile export / import
    // ─────────────────────────────────────────────────────────────────────────

    /// Write username, email and token presence to `path`
    pub fn export_profile(&self, path: &Path) -> Result<()> {
        ConfigProfile::from_credentials(&self.state.credentials).save(path)?;
        info!(path = %path.display(), "profile exported");
        Ok(())
    }

    /// Apply the fields present in the profile at `path`, then persist
    pub fn import_profile(&mut self, path: &Path) -> Result<()> {
        let import = ProfileImport::load(path)?;
        self.supersede_running_test();
        import.apply_to(&mut self.state.credentials);
        self.publish();
        info!(path = %path.display(), "profile imported");
        self.save_credentials()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Async plumbing
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply every result that has already arrived, without waiting
    ///
    /// Returns the number of results applied.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.async_rx.try_recv() {
            self.handle_async_message(msg);
            handled += 1;
        }
        handled
    }

    /// Wait until every outstanding background task has reported back
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.async_rx.recv().await {
                Some(msg) => self.handle_async_message(msg),
                None => break,
            }
        }
    }

    /// Run `job` on a blocking worker and queue its message
    ///
    /// `on_failure` builds the message sent if the worker panics.
    fn spawn_blocking_task<F>(&mut self, job: F, on_failure: fn(GitAuthError) -> AsyncMessage)
    where
        F: FnOnce() -> AsyncMessage + Send + 'static,
    {
        let tx = self.async_tx.clone();
        self.pending += 1;

        tokio::spawn(async move {
            let message = match tokio::task::spawn_blocking(job).await {
                Ok(message) => message,
                Err(e) => on_failure(GitAuthError::Task(e.to_string())),
            };
            let _ = tx.send(message).await;
        });
    }

    /// Handle async message from background tasks
    fn handle_async_message(&mut self, msg: AsyncMessage) {
        self.pending = self.pending.saturating_sub(1);

        match msg {
            AsyncMessage::ConnectionTested { generation, result } => {
                if generation != self.test_generation {
                    debug!(generation, "discarding superseded connection test result");
                    return;
                }

                self.state.is_loading = false;
                match result {
                    Ok(status) => {
                        debug!(%status, "connection test finished");
                        self.state.connection_status = status;
                        if status == ConnectionStatus::Connected {
                            self.state.is_authenticated = true;
                        }
                    }
                    Err(failure) => {
                        debug!(%failure, "connection test failed");
                        // is_authenticated is left as it was
                        self.state.connection_status = ConnectionStatus::Failed;
                        self.state.error_message = failure.to_string();
                    }
                }
            }
            AsyncMessage::StatusChecked(result) => {
                let status = match result {
                    Ok(true) => ConnectionStatus::Connected,
                    Ok(false) => ConnectionStatus::Unknown,
                    Err(e) => {
                        warn!(error = %e, "status check failed");
                        ConnectionStatus::Unknown
                    }
                };
                debug!(%status, "status check finished");
                self.state.connection_status = status;
                self.state.is_authenticated = status == ConnectionStatus::Connected;
            }
            AsyncMessage::GitConfigured(Ok(())) => {
                info!("global git identity configured");
                self.load_git_config();
            }
            AsyncMessage::GitConfigured(Err(e)) => {
                warn!(error = %e, "failed to configure git");
                self.state.error_message = e.to_string();
            }
            AsyncMessage::GitConfigLoaded(identity) => {
                self.state.git_identity = identity;
            }
        }

        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::git::testing::FakeGit;
    use crate::core::secret_store::{MemoryStore, MockSecretStore};
    use crate::core::tester::MockConnectionTester;
    use crate::core::validation::ValidationError;

    const HEX_TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";

    fn valid_credentials() -> Credentials {
        Credentials::new("octocat", "a@b.com", HEX_TOKEN)
    }

    fn controller_with(
        store: Arc<dyn SecretStore>,
        git: FakeGit,
        tester: Arc<dyn ConnectionTester>,
    ) -> AuthController {
        AuthController::new(store, GitConfigBridge::new(Arc::new(git)), tester)
    }

    fn controller(store: Arc<MemoryStore>) -> AuthController {
        controller_with(
            store,
            FakeGit::default(),
            Arc::new(SimulatedTester::instant()),
        )
    }

    fn tester_returning(
        result: std::result::Result<ConnectionStatus, TestFailure>,
    ) -> Arc<MockConnectionTester> {
        let mut tester = MockConnectionTester::new();
        tester.expect_test().returning(move |_| result);
        Arc::new(tester)
    }

    #[tokio::test]
    async fn test_valid_credentials_connect() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.set_credentials(valid_credentials());

        ctl.test_connection();
        assert!(ctl.state().is_loading);
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Testing);

        ctl.settle().await;
        let state = ctl.state();
        assert!(!state.is_loading);
        assert_eq!(state.connection_status, ConnectionStatus::Connected);
        assert!(state.is_authenticated);
        assert!(state.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_blocks_test() {
        let mut tester = MockConnectionTester::new();
        tester.expect_test().times(0);
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::default(),
            Arc::new(tester),
        );
        ctl.set_credentials(Credentials::new("", "a@b.com", "x"));

        ctl.test_connection();
        assert!(!ctl.is_busy());
        ctl.settle().await;

        let state = ctl.state();
        assert_eq!(state.connection_status, ConnectionStatus::Unknown);
        assert!(!state.is_loading);
        assert_eq!(state.error_message, VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            state.validation_errors,
            vec![ValidationError::UsernameRequired, ValidationError::InvalidToken]
        );
    }

    #[tokio::test]
    async fn test_short_token_fails_validation_before_test() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.set_credentials(Credentials::new("octocat", "a@b.com", "0123456789"));

        ctl.test_connection();
        ctl.settle().await;

        assert_eq!(ctl.state().error_message, VALIDATION_FAILED_MESSAGE);
        assert!(ctl
            .state()
            .has_validation_error(ValidationError::InvalidToken));
        assert!(!ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_failed_test_reports_reason() {
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::default(),
            tester_returning(Err(TestFailure::InvalidToken)),
        );
        ctl.set_credentials(valid_credentials());

        ctl.test_connection();
        ctl.settle().await;

        let state = ctl.state();
        assert!(!state.is_loading);
        assert_eq!(state.connection_status, ConnectionStatus::Failed);
        assert_eq!(state.error_message, "Invalid token format");
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn test_failed_retest_keeps_authentication() {
        let mut tester = MockConnectionTester::new();
        let mut seq = mockall::Sequence::new();
        tester
            .expect_test()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ConnectionStatus::Connected));
        tester
            .expect_test()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TestFailure::ConnectionFailed));
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::default(),
            Arc::new(tester),
        );
        ctl.set_credentials(valid_credentials());

        ctl.test_connection();
        ctl.settle().await;
        assert!(ctl.state().is_authenticated);

        ctl.test_connection();
        ctl.settle().await;
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Failed);
        assert_eq!(ctl.state().error_message, "Failed to connect to GitHub");
        assert!(ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_reentrant_test_is_ignored() {
        let mut tester = MockConnectionTester::new();
        tester
            .expect_test()
            .times(1)
            .returning(|_| Ok(ConnectionStatus::Connected));
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::default(),
            Arc::new(tester),
        );
        ctl.set_credentials(valid_credentials());

        ctl.test_connection();
        ctl.test_connection();
        ctl.settle().await;

        assert_eq!(ctl.state().connection_status, ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn test_sign_in_during_test_validates_new_credentials() {
        let mut tester = MockConnectionTester::new();
        tester
            .expect_test()
            .times(1)
            .returning(|_| Ok(ConnectionStatus::Connected));
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller_with(store.clone(), FakeGit::default(), Arc::new(tester));
        ctl.set_credentials(valid_credentials());
        ctl.test_connection();
        assert!(ctl.state().is_loading);

        ctl.set_credentials(Credentials::new("-bad", "nope", "x"));
        ctl.sign_in().unwrap();
        ctl.settle().await;

        let state = ctl.state();
        assert_eq!(store.get(SecretKey::Username).as_deref(), Some("-bad"));
        assert_eq!(state.connection_status, ConnectionStatus::Unknown);
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error_message, VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            state.validation_errors,
            vec![
                ValidationError::InvalidUsername,
                ValidationError::InvalidEmail,
                ValidationError::InvalidToken,
            ]
        );
    }

    #[tokio::test]
    async fn test_sign_in_during_test_retests_with_new_credentials() {
        let mut tester = MockConnectionTester::new();
        tester
            .expect_test()
            .withf(|creds| creds.username == "octocat")
            .times(1)
            .returning(|_| Ok(ConnectionStatus::Connected));
        tester
            .expect_test()
            .withf(|creds| creds.username == "hubot")
            .times(1)
            .returning(|_| Err(TestFailure::ConnectionFailed));
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::default(),
            Arc::new(tester),
        );
        ctl.set_credentials(valid_credentials());
        ctl.test_connection();

        ctl.set_username("hubot");
        assert!(!ctl.state().is_loading);
        ctl.sign_in().unwrap();
        assert!(ctl.state().is_loading);
        ctl.settle().await;

        let state = ctl.state();
        assert_eq!(state.connection_status, ConnectionStatus::Failed);
        assert_eq!(state.error_message, "Failed to connect to GitHub");
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn test_sign_in_persists_even_when_test_fails() {
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller_with(
            store.clone(),
            FakeGit::default(),
            tester_returning(Err(TestFailure::ConnectionFailed)),
        );
        ctl.set_credentials(valid_credentials());

        ctl.sign_in().unwrap();
        ctl.settle().await;

        assert_eq!(ctl.state().connection_status, ConnectionStatus::Failed);
        assert_eq!(store.get(SecretKey::Username).as_deref(), Some("octocat"));
        assert_eq!(store.get(SecretKey::Email).as_deref(), Some("a@b.com"));
        assert_eq!(store.get(SecretKey::Token).as_deref(), Some(HEX_TOKEN));
    }

    #[tokio::test]
    async fn test_sign_in_persists_invalid_credentials() {
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(store.clone());
        ctl.set_credentials(Credentials::new("-bad", "nope", "x"));

        ctl.sign_in().unwrap();
        ctl.settle().await;

        assert_eq!(ctl.state().error_message, VALIDATION_FAILED_MESSAGE);
        assert_eq!(store.get(SecretKey::Username).as_deref(), Some("-bad"));
        assert_eq!(store.get(SecretKey::Token).as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_sign_in_surfaces_vault_failure() {
        let mut store = MockSecretStore::new();
        store
            .expect_save()
            .returning(|_, _| Err(GitAuthError::Credential("keychain locked".into())));
        let mut tester = MockConnectionTester::new();
        tester.expect_test().times(0);
        let mut ctl = controller_with(Arc::new(store), FakeGit::default(), Arc::new(tester));
        ctl.set_credentials(valid_credentials());

        let result = ctl.sign_in();

        assert!(matches!(result, Err(GitAuthError::Credential(_))));
        assert!(ctl.state().error_message.contains("keychain locked"));
        assert!(!ctl.state().is_loading);
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Unknown);
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let mut ctl = controller(store.clone());
        ctl.set_credentials(valid_credentials());
        ctl.sign_in().unwrap();
        ctl.settle().await;
        assert!(ctl.state().is_authenticated);

        ctl.sign_out().unwrap();
        let once = ctl.state().clone();
        ctl.sign_out().unwrap();

        assert_eq!(ctl.state(), &once);
        assert_eq!(once.connection_status, ConnectionStatus::Unknown);
        assert!(!once.is_authenticated);
        assert_eq!(once.credentials, Credentials::default());
        for key in SecretKey::ALL {
            assert_eq!(store.get(key), None);
        }
    }

    #[tokio::test]
    async fn test_sign_out_supersedes_running_test() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.set_credentials(valid_credentials());

        ctl.test_connection();
        ctl.sign_out().unwrap();
        assert!(!ctl.state().is_loading);

        ctl.settle().await;
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Unknown);
        assert!(!ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_sign_out_clears_transient_fields() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.test_connection();
        assert!(!ctl.state().validation_errors.is_empty());

        ctl.sign_out().unwrap();
        assert!(ctl.state().validation_errors.is_empty());
        assert!(ctl.state().error_message.is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_store_and_checks_status() {
        let store = Arc::new(MemoryStore::new());
        store.save(SecretKey::Username, "octocat").unwrap();
        store.save(SecretKey::Token, HEX_TOKEN).unwrap();
        let mut ctl = controller_with(
            store,
            FakeGit::with_identity("Octo Cat", "a@b.com"),
            Arc::new(SimulatedTester::instant()),
        );

        ctl.load();
        assert_eq!(ctl.state().credentials.username, "octocat");
        assert_eq!(ctl.state().credentials.email, "");
        assert!(ctl.state().credentials.has_token());
        assert!(ctl.state().validation_errors.is_empty());
        assert!(ctl.is_busy());

        ctl.settle().await;
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Connected);
        assert!(ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_status_check_unconfigured_git() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.refresh_status();
        ctl.settle().await;
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Unknown);
        assert!(!ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_status_check_missing_git_clears_authentication() {
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::missing(),
            Arc::new(SimulatedTester::instant()),
        );
        ctl.set_credentials(valid_credentials());
        ctl.test_connection();
        ctl.settle().await;
        assert!(ctl.state().is_authenticated);

        ctl.check_authentication_status();
        ctl.settle().await;
        assert_eq!(ctl.state().connection_status, ConnectionStatus::Unknown);
        assert!(!ctl.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_configure_git_updates_identity() {
        let git = Arc::new(FakeGit::default());
        let mut ctl = AuthController::new(
            Arc::new(MemoryStore::new()),
            GitConfigBridge::new(git.clone()),
            Arc::new(SimulatedTester::instant()),
        );
        ctl.set_credentials(valid_credentials());

        ctl.configure_git();
        ctl.settle().await;

        assert_eq!(git.value("user.name").as_deref(), Some("octocat"));
        assert_eq!(ctl.state().git_identity.name.as_deref(), Some("octocat"));
        assert_eq!(ctl.state().git_identity.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_configure_git_failure_is_surfaced() {
        let mut ctl = controller_with(
            Arc::new(MemoryStore::new()),
            FakeGit::missing(),
            Arc::new(SimulatedTester::instant()),
        );
        ctl.set_credentials(valid_credentials());

        ctl.configure_git();
        ctl.settle().await;

        assert!(ctl.state().error_message.contains("Could not run git"));
    }

    #[tokio::test]
    async fn test_configure_git_requires_identity() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        ctl.configure_git();
        assert!(!ctl.is_busy());
        assert_eq!(ctl.state().error_message, GIT_IDENTITY_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut source = controller(Arc::new(MemoryStore::new()));
        source.set_credentials(valid_credentials());
        source.export_profile(&path).unwrap();

        let store = Arc::new(MemoryStore::new());
        let mut target = controller(store.clone());
        target.set_token(HEX_TOKEN);
        target.import_profile(&path).unwrap();

        assert_eq!(target.state().credentials, valid_credentials());
        assert_eq!(store.get(SecretKey::Email).as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        let mut rx = ctl.subscribe();
        ctl.set_credentials(valid_credentials());
        ctl.test_connection();
        ctl.settle().await;

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.connection_status, ConnectionStatus::Connected);
        assert_eq!(&snapshot, ctl.state());
    }

    #[tokio::test]
    async fn test_process_pending_does_not_block() {
        let mut ctl = controller(Arc::new(MemoryStore::new()));
        assert_eq!(ctl.process_pending(), 0);

        ctl.load_git_config();
        while ctl.is_busy() {
            ctl.process_pending();
            tokio::task::yield_now().await;
        }
        assert_eq!(ctl.state().git_identity, GitIdentity::default());
    }
}
