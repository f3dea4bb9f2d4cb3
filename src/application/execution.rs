//! Loading/result/error tracking for agent calls.

use crate::domain::{AgentParams, AgentRequest, AgentType, DomainError};
use crate::infrastructure::{AgentBackend, ApiError, CancelToken};
use serde_json::Value;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("An agent call is already in progress")]
    Busy,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a finished call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Succeeded,
    Failed(String),
}

struct PendingCall {
    agent: AgentType,
    cancel: CancelToken,
    receiver: Receiver<Result<Value, ApiError>>,
}

/// State of a single agent invocation slot.
///
/// At most one call is in flight per holder: [`AgentExecution::spawn`]
/// refuses to start another while `loading` is set. A call abandoned through
/// [`AgentExecution::cancel`] can no longer write into this holder.
#[derive(Default)]
pub struct AgentExecution {
    pub loading: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pending: Option<PendingCall>,
}

impl std::fmt::Debug for AgentExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentExecution")
            .field("loading", &self.loading)
            .field("result", &self.result)
            .field("error", &self.error)
            .field("pending", &self.pending.as_ref().map(|p| p.agent))
            .finish()
    }
}

impl AgentExecution {
    /// Runs `agent_type` to completion on the calling thread.
    ///
    /// An unknown agent type or invalid parameters fail before any request
    /// is made. `loading` is always cleared on return.
    pub fn execute_agent(
        &mut self,
        backend: &dyn AgentBackend,
        agent_type: &str,
        params: &AgentParams,
    ) -> Completion {
        if self.pending.is_some() {
            warn!(agent = %agent_type, "rejected agent call while another is in flight");
            let message = ExecutionError::Busy.to_string();
            self.error = Some(message.clone());
            return Completion::Failed(message);
        }

        self.loading = true;
        self.error = None;

        let outcome = agent_type
            .parse::<AgentType>()
            .and_then(|agent| AgentRequest::from_params(agent, params))
            .map_err(ExecutionError::from)
            .and_then(|request| {
                backend
                    .dispatch(&request, &CancelToken::new())
                    .map_err(ExecutionError::from)
            });

        let completion = self.apply(agent_type, outcome);
        self.loading = false;
        completion
    }

    /// Starts `request` on a worker thread. Use [`AgentExecution::poll`] to
    /// pick up the outcome.
    pub fn spawn(
        &mut self,
        backend: Arc<dyn AgentBackend>,
        request: AgentRequest,
    ) -> Result<(), ExecutionError> {
        if self.loading {
            warn!(agent = %request.agent_type(), "rejected agent call while another is in flight");
            return Err(ExecutionError::Busy);
        }

        let agent = request.agent_type();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let outcome = backend.dispatch(&request, &worker_cancel);
            // The receiver is gone once the call has been cancelled.
            let _ = sender.send(outcome);
        });

        info!(%agent, "agent call started");
        self.loading = true;
        self.error = None;
        self.pending = Some(PendingCall {
            agent,
            cancel,
            receiver,
        });
        Ok(())
    }

    /// Applies the outcome of the outstanding call if it has finished.
    pub fn poll(&mut self) -> Option<Completion> {
        let pending = self.pending.as_ref()?;
        let received = match pending.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => None,
        };
        Some(self.finish(received))
    }

    /// Blocks until the outstanding call finishes.
    pub fn wait(&mut self) -> Option<Completion> {
        let pending = self.pending.as_ref()?;
        let received = pending.receiver.recv().ok();
        Some(self.finish(received))
    }

    /// Abandons the outstanding call. Its response, if it ever arrives, is
    /// dropped.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!(agent = %pending.agent, "agent call cancelled");
            pending.cancel.cancel();
        }
        self.loading = false;
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    fn finish(&mut self, received: Option<Result<Value, ApiError>>) -> Completion {
        let Some(pending) = self.pending.take() else {
            return Completion::Failed(ExecutionError::Busy.to_string());
        };
        let outcome = match received {
            Some(outcome) => outcome.map_err(ExecutionError::from),
            None => Err(ExecutionError::Api(ApiError::Cancelled)),
        };
        let completion = self.apply(pending.agent.id(), outcome);
        self.loading = false;
        completion
    }

    fn apply(&mut self, agent: &str, outcome: Result<Value, ExecutionError>) -> Completion {
        match outcome {
            Ok(value) => {
                info!(%agent, "agent call succeeded");
                self.result = Some(value);
                self.error = None;
                Completion::Succeeded
            }
            Err(err) => {
                error!(%agent, error = %err, "agent call failed");
                let message = err.to_string();
                self.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingBackend;
    use serde_json::json;

    fn summarize_params() -> AgentParams {
        AgentParams {
            content: Some("A long club description".to_string()),
            ..AgentParams::default()
        }
    }

    #[test]
    fn test_unknown_agent_never_dispatches() {
        let backend = RecordingBackend::succeeding(json!({}));
        let mut execution = AgentExecution::default();

        let completion = execution.execute_agent(&backend, "horoscope", &summarize_params());

        assert!(matches!(completion, Completion::Failed(_)));
        assert_eq!(backend.call_count(), 0);
        assert!(!execution.loading);
        assert_eq!(execution.error.as_deref(), Some("Unknown agent type: horoscope"));
    }

    #[test]
    fn test_successful_dispatch_stores_result() {
        let backend = RecordingBackend::succeeding(json!({ "summary": "short" }));
        let mut execution = AgentExecution {
            error: Some("old failure".to_string()),
            ..AgentExecution::default()
        };

        let completion = execution.execute_agent(&backend, "summarizer", &summarize_params());

        assert_eq!(completion, Completion::Succeeded);
        assert!(!execution.loading);
        assert!(execution.error.is_none());
        assert_eq!(execution.result, Some(json!({ "summary": "short" })));
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_failed_dispatch_keeps_previous_result() {
        let backend = RecordingBackend::failing();
        let mut execution = AgentExecution {
            result: Some(json!({ "summary": "earlier" })),
            ..AgentExecution::default()
        };

        execution.execute_agent(&backend, "summarizer", &summarize_params());

        assert!(!execution.loading);
        assert_eq!(execution.result, Some(json!({ "summary": "earlier" })));
        assert!(!execution.error.clone().unwrap().is_empty());
    }

    #[test]
    fn test_failed_dispatch_without_previous_result() {
        let backend = RecordingBackend::failing();
        let mut execution = AgentExecution::default();

        execution.execute_agent(&backend, "summarizer", &summarize_params());

        assert!(execution.result.is_none());
        assert!(execution.error.is_some());
    }

    #[test]
    fn test_missing_parameter_never_dispatches() {
        let backend = RecordingBackend::succeeding(json!({}));
        let mut execution = AgentExecution::default();

        execution.execute_agent(&backend, "website_analyzer", &AgentParams::default());

        assert_eq!(backend.call_count(), 0);
        assert!(execution.error.is_some());
    }

    #[test]
    fn test_spawn_and_wait() {
        let backend = Arc::new(RecordingBackend::succeeding(json!("done")));
        let mut execution = AgentExecution::default();

        execution
            .spawn(backend.clone(), AgentRequest::Summarize { content: "x".to_string() })
            .unwrap();
        assert!(execution.loading);

        assert_eq!(execution.wait(), Some(Completion::Succeeded));
        assert!(!execution.loading);
        assert_eq!(execution.result, Some(json!("done")));
        assert_eq!(backend.call_count(), 1);
        assert_eq!(execution.poll(), None);
    }

    #[test]
    fn test_spawn_rejects_second_call_while_loading() {
        let (backend, release) = RecordingBackend::gated(json!("first"));
        let backend = Arc::new(backend);
        let mut execution = AgentExecution::default();

        execution
            .spawn(backend.clone(), AgentRequest::Summarize { content: "a".to_string() })
            .unwrap();
        let second = execution.spawn(backend.clone(), AgentRequest::Summarize { content: "b".to_string() });
        assert!(matches!(second, Err(ExecutionError::Busy)));

        release.send(()).unwrap();
        assert_eq!(execution.wait(), Some(Completion::Succeeded));
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_execute_while_spawned_call_runs_reports_busy() {
        let (backend, release) = RecordingBackend::gated(json!("first"));
        let backend = Arc::new(backend);
        let mut execution = AgentExecution::default();
        execution
            .spawn(backend.clone(), AgentRequest::Summarize { content: "a".to_string() })
            .unwrap();

        let completion = execution.execute_agent(backend.as_ref(), "summarizer", &summarize_params());

        let busy = "An agent call is already in progress".to_string();
        assert_eq!(completion, Completion::Failed(busy.clone()));
        assert_eq!(execution.error, Some(busy));
        assert!(execution.loading);

        release.send(()).unwrap();
        assert_eq!(execution.wait(), Some(Completion::Succeeded));
        assert!(execution.error.is_none());
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_cancelled_call_cannot_overwrite_state() {
        let (backend, release) = RecordingBackend::gated(json!("stale"));
        let backend = Arc::new(backend);
        let mut execution = AgentExecution::default();

        execution
            .spawn(backend.clone(), AgentRequest::Summarize { content: "a".to_string() })
            .unwrap();
        execution.cancel();
        assert!(!execution.loading);

        release.send(()).unwrap();
        backend.wait_for_calls(1);

        assert_eq!(execution.poll(), None);
        assert!(execution.result.is_none());
        assert!(execution.error.is_none());
    }

    #[test]
    fn test_poll_reports_nothing_while_running() {
        let (backend, release) = RecordingBackend::gated(json!("later"));
        let mut execution = AgentExecution::default();

        execution
            .spawn(Arc::new(backend), AgentRequest::Summarize { content: "a".to_string() })
            .unwrap();
        assert_eq!(execution.poll(), None);
        assert!(execution.loading);

        release.send(()).unwrap();
        assert_eq!(execution.wait(), Some(Completion::Succeeded));
    }
}
