//! In-memory transport for unit tests.

#![allow(clippy::unwrap_used)]

use crate::transport::{ResourceRequest, Transport};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

enum Step {
    Ready(Result<Value>),
    Gated(oneshot::Receiver<Result<Value>>),
}

/// Replays queued replies in call order and records every request.
///
/// Gated replies stay pending until the test resolves them, which lets tests
/// choose the order in which overlapping requests complete.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ResourceRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: Value) {
        self.push(Step::Ready(Ok(body)));
    }

    pub fn fail(&self, error: Error) {
        self.push(Step::Ready(Err(error)));
    }

    /// Queues a reply that resolves when the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(Step::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ResourceRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &ResourceRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Ready(reply)) => reply,
            Some(Step::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(Error::Transport("gate dropped".to_string()))),
            None => Err(Error::Transport(format!("no scripted reply for {}", request.path))),
        }
    }
}
