//! Scripted session oracle shared by the guard and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

use crate::oracle::{OracleError, SessionOracle};
use crate::types::SessionVerdict;

/// One scripted answer.
pub(crate) enum Step {
    Answer(SessionVerdict),
    /// Transport failure.
    Fail,
    /// Never answers.
    Hang,
    /// Waits for the notify before answering.
    Gated(Arc<Notify>, SessionVerdict),
}

/// Oracle that replays [`Step`]s in order, then answers `Unauthenticated`.
pub(crate) struct FakeOracle {
    steps: Mutex<VecDeque<Step>>,
    repeat: Option<SessionVerdict>,
    calls: AtomicUsize,
}

impl FakeOracle {
    pub(crate) fn always(verdict: SessionVerdict) -> Arc<Self> {
        Arc::new(Self { steps: Mutex::new(VecDeque::new()), repeat: Some(verdict), calls: AtomicUsize::new(0) })
    }

    pub(crate) fn scripted(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self { steps: Mutex::new(steps.into()), repeat: None, calls: AtomicUsize::new(0) })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A genuine `reqwest::Error`, built without touching the network.
pub(crate) fn transport_error() -> OracleError {
    match reqwest::Client::new().get("http://[").build() {
        Err(e) => OracleError::Transport(e),
        Ok(_) => OracleError::Timeout(std::time::Duration::ZERO),
    }
}

#[async_trait::async_trait]
impl SessionOracle for FakeOracle {
    async fn check_session(&self) -> Result<SessionVerdict, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let step = match (step, self.repeat) {
            (Some(step), _) => step,
            (None, Some(verdict)) => Step::Answer(verdict),
            (None, None) => Step::Answer(SessionVerdict::Unauthenticated),
        };
        match step {
            Step::Answer(verdict) => Ok(verdict),
            Step::Fail => Err(transport_error()),
            Step::Hang => std::future::pending().await,
            Step::Gated(gate, verdict) => {
                gate.notified().await;
                Ok(verdict)
            }
        }
    }
}
