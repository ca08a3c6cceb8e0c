use crate::application::ports::{MarketplaceContract, MarketplaceSigner, WalletProvider};
use crate::domain::{
    draft::SubmissionDraft,
    errors::{DomainError, TxFailure},
    marketplace::SubmissionReceipt,
};
use ethers::types::Address;
use metrics::{counter, histogram};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connected,
    Submitting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Authorized account plus the signer acquired for it.
#[derive(Clone)]
pub struct WalletConnection {
    pub address: Address,
    signer: Arc<dyn MarketplaceSigner>,
}

impl fmt::Debug for WalletConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnection")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// What a UI layer renders: a copy of the session at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub account: Option<Address>,
    pub description: String,
    pub loading: bool,
    pub error: Option<String>,
    pub last_receipt: Option<SubmissionReceipt>,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub contract_address: Address,
    /// `None` waits for inclusion indefinitely.
    pub confirmation_timeout: Option<Duration>,
}

struct SessionInner {
    state: SessionState,
    connection: Option<WalletConnection>,
    draft: SubmissionDraft,
    error: Option<String>,
    last_receipt: Option<SubmissionReceipt>,
    /// Bumped by `disconnect`; a connect that started under an older epoch is stale.
    epoch: u64,
}

/// Wallet-connect-and-submit controller owned by one UI instance.
///
/// The inner lock is only held between awaits, so concurrent callers observe
/// `Submitting` while a transaction is pending and get `SubmissionInFlight`.
pub struct SubmissionSession {
    id: Uuid,
    wallet: Arc<dyn WalletProvider>,
    options: SessionOptions,
    inner: Mutex<SessionInner>,
}

impl SubmissionSession {
    pub fn new(wallet: Arc<dyn WalletProvider>, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet,
            options,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                connection: None,
                draft: SubmissionDraft::default(),
                error: None,
                last_receipt: None,
                epoch: 0,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // A panic while holding the lock cannot leave the fields half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            state: inner.state,
            account: inner.connection.as_ref().map(|c| c.address),
            description: inner.draft.description().to_string(),
            loading: inner.state == SessionState::Submitting,
            error: inner.error.clone(),
            last_receipt: inner.last_receipt.clone(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connection.is_some()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.lock().draft.update(description);
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn connect(&self) -> Result<Address, DomainError> {
        let epoch = {
            let inner = self.lock();
            if inner.state == SessionState::Submitting {
                return Err(DomainError::SubmissionInFlight);
            }
            inner.epoch
        };

        let result = self.authorize().await;
        let mut inner = self.lock();
        // The wallet prompt is an await point; the session may have moved on meanwhile.
        if inner.state == SessionState::Submitting {
            warn!("Wallet authorization finished during a submission, discarding it");
            return Err(DomainError::SubmissionInFlight);
        }
        if inner.epoch != epoch {
            info!("Wallet authorization finished after a disconnect, discarding it");
            return Err(DomainError::NotConnected);
        }
        match result {
            Ok(connection) => {
                let address = connection.address;
                inner.connection = Some(connection);
                if inner.state == SessionState::Idle {
                    inner.state = SessionState::Connected;
                }
                inner.error = None;
                counter!("wallet_connect_total", "outcome" => "connected").increment(1);
                info!(account = ?address, "Wallet connected");
                Ok(address)
            }
            Err(e) => {
                counter!("wallet_connect_total", "outcome" => "failed").increment(1);
                warn!("Wallet connection failed: {}", e);
                inner.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn authorize(&self) -> Result<WalletConnection, DomainError> {
        let accounts = self.wallet.request_accounts().await?;
        let address = *accounts.first().ok_or(DomainError::UserRejected)?;
        let signer = self.wallet.signer(address).await?;
        Ok(WalletConnection { address, signer })
    }

    /// Drops the connection and returns to `Idle`. Ignored while a submission is pending.
    pub fn disconnect(&self) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if inner.state == SessionState::Submitting {
            return Err(DomainError::SubmissionInFlight);
        }
        inner.connection = None;
        inner.epoch = inner.epoch.wrapping_add(1);
        inner.state = SessionState::Idle;
        inner.error = None;
        Ok(())
    }

    /// Contract handle for the current connection, for callers outside the submit flow.
    pub fn bound_contract(&self) -> Result<Arc<dyn MarketplaceContract>, DomainError> {
        let inner = self.lock();
        let connection = inner.connection.as_ref().ok_or(DomainError::NotConnected)?;
        Ok(connection.signer.bind(self.options.contract_address))
    }

    pub async fn submit_description(
        &self,
        description: impl Into<String>,
    ) -> Result<SubmissionReceipt, DomainError> {
        self.set_description(description);
        self.submit().await
    }

    /// Sends the current draft through `createNewData` and waits for inclusion.
    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn submit(&self) -> Result<SubmissionReceipt, DomainError> {
        let (contract, description) = self.begin_submission()?;
        let guard = InFlight { session: self };

        let start = Instant::now();
        let call = contract.create_new_data(&description);
        let result = match self.options.confirmation_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(res) => res,
                Err(_) => Err(TxFailure::TimedOut(limit).into()),
            },
            None => call.await,
        };
        guard.disarm();

        let mut inner = self.lock();
        inner.state = SessionState::Connected;
        match result {
            Ok(receipt) => {
                inner.draft.clear();
                inner.error = None;
                inner.last_receipt = Some(receipt.clone());
                counter!("submissions_total", "outcome" => "confirmed").increment(1);
                histogram!("submission_confirm_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                info!("Description recorded on-chain. {}", receipt);
                Ok(receipt)
            }
            Err(e) => {
                counter!("submissions_total", "outcome" => "failed").increment(1);
                error!("Submission failed: {}", e);
                inner.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn begin_submission(&self) -> Result<(Arc<dyn MarketplaceContract>, String), DomainError> {
        let mut inner = self.lock();
        if inner.state == SessionState::Submitting {
            return Err(DomainError::SubmissionInFlight);
        }

        let checked = match inner.connection.as_ref() {
            None => Err(DomainError::NotConnected),
            Some(connection) => inner
                .draft
                .validated()
                .map(|description| (connection.signer.clone(), description)),
        };

        match checked {
            Ok((signer, description)) => {
                inner.state = SessionState::Submitting;
                inner.error = None;
                Ok((signer.bind(self.options.contract_address), description))
            }
            Err(e) => {
                counter!("submissions_total", "outcome" => "rejected").increment(1);
                inner.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Restores `Connected` if a submit future is dropped before it settles.
struct InFlight<'a> {
    session: &'a SubmissionSession,
}

impl InFlight<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        if inner.state == SessionState::Submitting {
            warn!("Submission abandoned before confirmation");
            inner.state = SessionState::Connected;
            inner.error = Some(DomainError::from(TxFailure::Abandoned).to_string());
        }
    }
}
