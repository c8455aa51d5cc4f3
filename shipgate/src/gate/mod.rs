//! Approval gates: blocking promotion checkpoints.
//!
//! A gate suspends the pipeline until an authorized actor approves a
//! promotion target drawn from an enumerated choice set, denies the run,
//! or the configured wait bound elapses. The wait is a single blocking
//! suspension with a timeout path; there is no background polling.

use crate::errors::GateConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Configuration for an approval gate.
///
/// The timeout is a required, explicit parameter. There is no default and
/// no `Default` impl: a deployment pipeline that waits forever on a human
/// is a misconfiguration, and one that picks a silent default is worse.
#[derive(Debug, Clone)]
pub struct GateConfig {
    prompt: String,
    choices: Vec<String>,
    timeout: Duration,
}

impl GateConfig {
    /// Creates a new gate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is blank, the choice set is empty,
    /// or the timeout is zero.
    pub fn new(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
        timeout: Duration,
    ) -> Result<Self, GateConfigError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GateConfigError::BlankPrompt);
        }

        let choices: Vec<String> = choices
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.trim().is_empty())
            .collect();
        if choices.is_empty() {
            return Err(GateConfigError::EmptyChoices);
        }

        if timeout.is_zero() {
            return Err(GateConfigError::ZeroTimeout);
        }

        Ok(Self {
            prompt,
            choices,
            timeout,
        })
    }

    /// Returns the prompt shown to approvers.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the allowed promotion targets.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Returns the configured wait bound.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true if the choice is in the allowed set.
    #[must_use]
    pub fn allows(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}

/// How an approval gate resolved.
///
/// The in-flight "pending" state is held by the [`GateService`] and is
/// not representable here; a resolution is always terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "choice")]
pub enum GateResolution {
    /// An actor approved the promotion with a choice from the allowed set.
    Approved(String),
    /// An actor explicitly declined.
    Denied,
    /// No response arrived within the configured wait bound.
    TimedOut,
}

impl GateResolution {
    /// Returns the approved choice, if the gate was approved.
    #[must_use]
    pub fn approved_choice(&self) -> Option<&str> {
        match self {
            Self::Approved(choice) => Some(choice),
            _ => None,
        }
    }
}

impl fmt::Display for GateResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved(choice) => write!(f, "approved for '{choice}'"),
            Self::Denied => write!(f, "denied"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// The reply sent from an approver back to the waiting runner.
#[derive(Debug)]
enum GateReply {
    Approved(String),
    Denied,
}

/// A pending approval request held by the service.
#[derive(Debug)]
struct PendingRequest {
    gate: String,
    prompt: String,
    choices: Vec<String>,
    reply_tx: oneshot::Sender<GateReply>,
}

/// A read-only view of a pending request, for external actors.
#[derive(Debug, Clone, Serialize)]
pub struct PendingGate {
    /// The request ID used to approve or deny.
    pub id: Uuid,
    /// The gate name.
    pub gate: String,
    /// The prompt to show the approver.
    pub prompt: String,
    /// The allowed promotion targets.
    pub choices: Vec<String>,
}

/// Registry of in-flight approval requests.
///
/// The service is handed to a run as an explicit `Arc`; there is no
/// global instance. Each request is resolved exactly once — by
/// [`approve`](Self::approve), [`deny`](Self::deny), or the timeout —
/// and discarded afterwards.
#[derive(Default)]
pub struct GateService {
    requests: RwLock<HashMap<Uuid, PendingRequest>>,
}

impl GateService {
    /// Creates a new gate service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends until the gate resolves or the configured timeout elapses.
    ///
    /// This is the pipeline's only suspension point. The returned
    /// resolution is terminal; the request record is gone by the time
    /// this returns.
    pub async fn wait(&self, gate: &str, config: &GateConfig) -> GateResolution {
        let request_id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();

        {
            let request = PendingRequest {
                gate: gate.to_string(),
                prompt: config.prompt().to_string(),
                choices: config.choices().to_vec(),
                reply_tx: tx,
            };
            self.requests.write().insert(request_id, request);
        }

        match tokio::time::timeout(config.timeout(), rx).await {
            Ok(Ok(GateReply::Approved(choice))) => GateResolution::Approved(choice),
            Ok(Ok(GateReply::Denied)) => GateResolution::Denied,
            // Request dropped without a reply: nobody approved, so the
            // conservative reading is a denial.
            Ok(Err(_)) => {
                self.requests.write().remove(&request_id);
                GateResolution::Denied
            }
            Err(_) => {
                self.requests.write().remove(&request_id);
                GateResolution::TimedOut
            }
        }
    }

    /// Approves a pending request with a promotion target.
    ///
    /// Returns true if the request existed and the choice was in its
    /// allowed set. A choice outside the set is rejected without
    /// consuming the request: the gate stays pending and can still be
    /// approved with a valid choice, denied, or time out.
    pub fn approve(&self, request_id: Uuid, choice: &str) -> bool {
        let mut requests = self.requests.write();

        let Some(request) = requests.get(&request_id) else {
            return false;
        };
        if !request.choices.iter().any(|c| c == choice) {
            return false;
        }

        if let Some(request) = requests.remove(&request_id) {
            return request
                .reply_tx
                .send(GateReply::Approved(choice.to_string()))
                .is_ok();
        }
        false
    }

    /// Denies a pending request.
    ///
    /// Returns true if the request existed.
    pub fn deny(&self, request_id: Uuid) -> bool {
        if let Some(request) = self.requests.write().remove(&request_id) {
            return request.reply_tx.send(GateReply::Denied).is_ok();
        }
        false
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.read().len()
    }

    /// Lists pending requests so an external actor can resolve them.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingGate> {
        self.requests
            .read()
            .iter()
            .map(|(id, request)| PendingGate {
                id: *id,
                gate: request.gate.clone(),
                prompt: request.prompt.clone(),
                choices: request.choices.clone(),
            })
            .collect()
    }
}

impl fmt::Debug for GateService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateService")
            .field("pending_count", &self.pending_count())
            .finish()
    }
}
