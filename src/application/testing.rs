//! In-process backend doubles for application-layer tests.

use crate::domain::AgentRequest;
use crate::infrastructure::{AgentBackend, ApiError, CancelToken};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

pub struct RecordingBackend {
    response: Option<Value>,
    gate: Option<Mutex<Receiver<()>>>,
    calls: Mutex<Vec<AgentRequest>>,
}

impl RecordingBackend {
    pub fn succeeding(response: Value) -> Self {
        Self {
            response: Some(response),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend whose calls block until the returned sender fires.
    pub fn gated(response: Value) -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        let backend = Self {
            response: Some(response),
            gate: Some(Mutex::new(receiver)),
            calls: Mutex::new(Vec::new()),
        };
        (backend, sender)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<AgentRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn wait_for_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.call_count() >= count {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("backend never received {count} call(s)");
    }
}

impl AgentBackend for RecordingBackend {
    fn dispatch(&self, request: &AgentRequest, _cancel: &CancelToken) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            let _ = gate.lock().unwrap().recv();
        }
        self.response.clone().ok_or(ApiError::RequestFailed {
            status: StatusCode::BAD_GATEWAY,
        })
    }

    fn describe(&self) -> String {
        "http://localhost:8000".to_string()
    }
}
