//! Scripted mock gateway for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::{CompletionGateway, FAILURE_PREFIX};

/// A gateway that serves pre-scripted responses in FIFO order and counts
/// how many times it was called, so tests can assert both behavior and
/// call volume (e.g. the short-query short-circuit).
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response.
    pub fn push(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock gateway lock poisoned")
            .push_back(response.into());
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(&self, _system_instruction: &str, _user_instruction: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("mock gateway lock poisoned")
            .pop_front()
            .unwrap_or_else(|| format!("{FAILURE_PREFIX}mock:no scripted response"))
    }
}
