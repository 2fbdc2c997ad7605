use std::{
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use shared::{
    domain::{Alert, SessionState},
    error::GatewayError,
    protocol::{RedeemRequest, RedeemResponse},
};
use tracing::{debug, error, info, warn};

pub mod connectivity;
pub mod messages;
pub mod transport;

pub use connectivity::TcpConnectivityProbe;
pub use transport::ReqwestGateway;

const LINE_TERMINATORS: &[char] = &['\n', '\r'];

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> Result<bool>;
}

#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// Posts one redemption. Only a decoded server answer is `Ok`; every
    /// failure to get one is a [`GatewayError`].
    async fn redeem(&self, request: &RedeemRequest) -> Result<RedeemResponse, GatewayError>;
}

#[async_trait]
pub trait AlertPresenter: Send + Sync {
    async fn present(&self, alert: &Alert);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was already in flight; nothing happened.
    Ignored,
    Completed(Alert),
}

impl SubmitOutcome {
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Ignored => None,
            Self::Completed(alert) => Some(alert),
        }
    }
}

/// Owns the redemption session of one screen and drives a code through
/// validation, connectivity check, POST and alert.
pub struct RedemptionFlow {
    probe: Arc<dyn ConnectivityProbe>,
    gateway: Arc<dyn HttpGateway>,
    presenter: Arc<dyn AlertPresenter>,
    session: Mutex<SessionState>,
}

impl RedemptionFlow {
    pub fn new(
        probe: Arc<dyn ConnectivityProbe>,
        gateway: Arc<dyn HttpGateway>,
        presenter: Arc<dyn AlertPresenter>,
    ) -> Self {
        Self {
            probe,
            gateway,
            presenter,
            session: Mutex::new(SessionState::default()),
        }
    }

    pub fn session(&self) -> SessionState {
        lock_session(&self.session).clone()
    }

    pub fn set_input(&self, value: impl Into<String>) {
        lock_session(&self.session).input_buffer = value.into();
    }

    /// Scanner-style input. A value ending in a line terminator is cleaned
    /// and submitted right away; anything else is just held in the buffer.
    pub async fn on_streamed_input(&self, raw: &str) -> Option<SubmitOutcome> {
        if !raw.ends_with(LINE_TERMINATORS) {
            self.set_input(raw);
            return None;
        }

        self.set_input(raw.trim_end_matches(LINE_TERMINATORS));
        Some(self.submit().await)
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let Some(guard) = SubmitGuard::acquire(&self.session) else {
            debug!("redemption already in flight; dropping submit");
            return SubmitOutcome::Ignored;
        };

        let raw = guard.input();
        let alert = match AssertUnwindSafe(self.redeem(&raw)).catch_unwind().await {
            Ok(alert) => alert,
            Err(_) => {
                error!("redemption collaborator panicked");
                messages::processing_error()
            }
        };

        if AssertUnwindSafe(self.presenter.present(&alert))
            .catch_unwind()
            .await
            .is_err()
        {
            error!(title = %alert.title, "alert presenter panicked");
        }
        drop(guard);
        SubmitOutcome::Completed(alert)
    }

    async fn redeem(&self, raw: &str) -> Alert {
        let Ok(request) = RedeemRequest::new(raw) else {
            return messages::missing_code();
        };

        match self.probe.is_online().await {
            Ok(true) => {}
            Ok(false) => {
                warn!(code = %request.code(), "device offline; redemption not sent");
                return messages::no_connection();
            }
            Err(err) => {
                error!(code = %request.code(), "connectivity check failed: {err:#}");
                return messages::processing_error();
            }
        }

        info!(code = %request.code(), "submitting redemption");
        let result = self.gateway.redeem(&request).await;
        Self::handle_gateway_result(result)
    }

    /// Maps what the gateway produced to the alert the operator sees.
    pub fn handle_gateway_result(result: Result<RedeemResponse, GatewayError>) -> Alert {
        match result {
            Ok(response) if response.success => {
                info!(server_message = ?response.message(), "redemption accepted");
                messages::redeemed(response.message())
            }
            Ok(response) => {
                info!(server_message = ?response.message(), "redemption rejected");
                messages::rejected(response.message())
            }
            Err(err) => {
                error!("redemption endpoint unreachable: {err}");
                messages::connection_error()
            }
        }
    }
}

/// Marks the session as submitting for as long as it is alive. Dropping it
/// returns the session to idle, whichever way the submission ended.
struct SubmitGuard<'a> {
    session: &'a Mutex<SessionState>,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(session: &'a Mutex<SessionState>) -> Option<Self> {
        let mut state = lock_session(session);
        if state.submitting {
            return None;
        }
        state.submitting = true;
        Some(Self { session })
    }

    fn input(&self) -> String {
        lock_session(self.session).input_buffer.clone()
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        lock_session(self.session).reset();
    }
}

fn lock_session(session: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
