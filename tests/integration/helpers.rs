//! Helper functions for integration tests

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use logman::actors::coordinator::CoordinatorHandle;
use logman::config::{ActionKind, ActionRule};
use logman::mailer::Mailer;
use logman::rotation::RotationPolicy;
use logman::store::memory::MemoryStore;
use logman::uploader::UploadDispatcher;

/// Mailer that records every send instead of talking to a relay
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

/// Mailer whose sends always fail
pub struct BrokenMailer {
    pub attempts: Mutex<usize>,
}

impl BrokenMailer {
    pub fn new() -> Self {
        Self {
            attempts: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Mailer for BrokenMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> anyhow::Result<()> {
        *self.attempts.lock().unwrap() += 1;
        anyhow::bail!("relay unreachable")
    }
}

pub fn email_rule(expression: &str, subject: &str, to: &str) -> ActionRule {
    ActionRule {
        expression: expression.to_string(),
        kind: ActionKind::Email,
        subject: subject.to_string(),
        to: to.to_string(),
    }
}

/// Coordinator over `dir/temp.txt` with a 1000 byte / 60 s rotation policy
/// and a flush interval long enough that only explicit flushes run
pub fn spawn_test_coordinator(dir: &Path, store: Arc<MemoryStore>) -> CoordinatorHandle {
    let uploader = UploadDispatcher::new(store, "logs".to_string(), "fleet".to_string());
    CoordinatorHandle::spawn(
        dir.join("temp.txt"),
        RotationPolicy::new(1000, Duration::from_millis(60_000)),
        Duration::from_secs(3600),
        256,
        uploader,
    )
}
