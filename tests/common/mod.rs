//! Scripted in-memory driver shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use lazylink::{ConnectOptions, Driver, Handle, LogSink};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MockError {
    #[error("refused: {0}")]
    Refused(String),
    #[error(transparent)]
    Supervisor(#[from] lazylink::Error),
}

/// Handle whose transport can be closed from the test
#[derive(Debug, Clone)]
pub struct MockHandle {
    pub id: u64,
    closed: Arc<watch::Sender<bool>>,
}

impl MockHandle {
    pub fn close(&self) {
        self.closed.send_replace(true);
    }
}

impl PartialEq for MockHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Handle for MockHandle {
    fn closed(&self) -> BoxFuture<'static, ()> {
        let mut rx = self.closed.subscribe();
        async move {
            let _ = rx.wait_for(|closed| *closed).await;
        }
        .boxed()
    }
}

/// Driver replaying scripted outcomes; connects succeed once the script is empty
#[derive(Debug)]
pub struct MockDriver {
    connects: AtomicUsize,
    next_id: AtomicU64,
    script: Mutex<VecDeque<Result<(), String>>>,
    calls: Mutex<Vec<(String, ConnectOptions)>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            connects: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Connects block until the returned semaphore hands out a permit
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let driver = Self {
            gate: Some(gate.clone()),
            ..Self::new()
        };
        (driver, gate)
    }

    pub fn fail_next(&self, reason: &str) {
        self.script.lock().push_back(Err(reason.to_string()));
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, ConnectOptions)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Handle = MockHandle;
    type Error = MockError;

    async fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<MockHandle, MockError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .push((address.to_string(), options.clone()));

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        match self.script.lock().pop_front() {
            Some(Err(reason)) => Err(MockError::Refused(reason)),
            _ => {
                let (tx, _rx) = watch::channel(false);
                Ok(MockHandle {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    closed: Arc::new(tx),
                })
            }
        }
    }
}

/// Sink keeping every message
#[derive(Debug, Default)]
pub struct RecordingSink(Mutex<Vec<String>>);

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, message: &str) {
        self.0.lock().push(message.to_string());
    }
}

/// Poll `condition` until it holds, yielding to the runtime in between
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
