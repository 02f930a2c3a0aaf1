//! CoordinatorActor - owns the in-memory buffer and the flush schedule
//!
//! A single logical owner receives every forwarded line and performs all
//! buffer mutation, so there are no concurrent writers and no locks. The
//! flush timer lives inside the actor's select loop, which serializes flush
//! cycles with appends: two cycles can never interleave their drains.
//!
//! ## Flush cycle
//!
//! ```text
//! stat active file
//!   ├─ absent            → no rotation
//!   ├─ other stat error  → abort cycle, buffer kept (nothing lost)
//!   └─ exists            → rotation policy: full or stale?
//!                            └─ rename to syncme<5-digit>.txt,
//!                               hand off to UploadDispatcher (spawned)
//! drain buffer (read-and-reset)
//!   └─ non-empty → append to active file (recreated after rotation)
//! ```
//!
//! Append failures are logged but not rolled back: data already drained from
//! memory is lost on append failure. Buffer growth between flushes is
//! unbounded, bounded in practice by the flush interval and the bounded
//! forward channel.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, instrument, trace, warn};

use crate::rotation::{RotationPolicy, rotated_file_name};
use crate::uploader::UploadDispatcher;

use super::messages::{CoordinatorCommand, CoordinatorStats};

/// Actor owning the in-memory buffer, the active log file, and flush timing
pub struct CoordinatorActor {
    /// The in-memory buffer; newline-joined lines since the last drain
    buffer: String,

    /// Forwarded lines from all listeners
    line_rx: mpsc::Receiver<String>,

    /// Command receiver
    command_rx: mpsc::Receiver<CoordinatorCommand>,

    /// Path of the active log file
    log_path: PathBuf,

    policy: RotationPolicy,

    uploader: UploadDispatcher,

    flush_interval: Duration,

    lines_received: u64,
    flush_count: u64,
    rotation_count: u64,
}

impl CoordinatorActor {
    fn new(
        line_rx: mpsc::Receiver<String>,
        command_rx: mpsc::Receiver<CoordinatorCommand>,
        log_path: PathBuf,
        policy: RotationPolicy,
        flush_interval: Duration,
        uploader: UploadDispatcher,
    ) -> Self {
        Self {
            buffer: String::new(),
            line_rx,
            command_rx,
            log_path,
            policy,
            uploader,
            flush_interval,
            lines_received: 0,
            flush_count: 0,
            rotation_count: 0,
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!(
            "starting coordinator for {} (flush every {:?})",
            self.log_path.display(),
            self.flush_interval
        );

        let mut flush_timer = time::interval(self.flush_interval);
        flush_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                Some(line) = self.line_rx.recv() => {
                    self.append(&line);
                }

                _ = flush_timer.tick() => {
                    self.flush_cycle().await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        CoordinatorCommand::Flush { respond_to } => {
                            self.flush_cycle().await;
                            let _ = respond_to.send(());
                        }

                        CoordinatorCommand::GetStats { respond_to } => {
                            let _ = respond_to.send(self.stats());
                        }

                        CoordinatorCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("all channels closed, shutting down");
                    break;
                }
            }
        }

        debug!("coordinator stopped");
    }

    /// Append one forwarded line to the buffer, newline-separated
    fn append(&mut self, line: &str) {
        self.buffer.push('\n');
        self.buffer.push_str(line);
        self.lines_received += 1;
    }

    fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            buffered_bytes: self.buffer.len(),
            lines_received: self.lines_received,
            flush_count: self.flush_count,
            rotation_count: self.rotation_count,
        }
    }

    /// One flush cycle: rotation check, then buffer drain
    async fn flush_cycle(&mut self) {
        trace!("flushing in-memory buffer");
        self.flush_count += 1;

        match tokio::fs::metadata(&self.log_path).await {
            // absent: nothing to rotate, the append below recreates it
            Err(e) if e.kind() == ErrorKind::NotFound => {}

            // any other stat error aborts the cycle; the buffer is kept so
            // nothing is lost
            Err(e) => {
                error!("failed to stat {}: {e}", self.log_path.display());
                return;
            }

            Ok(meta) => {
                let mtime = meta.modified().unwrap_or_else(|_| SystemTime::now());
                if self
                    .policy
                    .should_rotate(meta.len(), mtime, SystemTime::now())
                {
                    self.rotate().await;
                }
            }
        }

        let data = std::mem::take(&mut self.buffer);
        if data.is_empty() {
            return;
        }

        if let Err(e) = self.append_to_file(&data).await {
            error!(
                "failed to append to {}, {} buffered bytes lost: {e}",
                self.log_path.display(),
                data.len()
            );
        }
    }

    /// Rename the active file into the upload queue and hand it off
    async fn rotate(&mut self) {
        debug!("active log file is full or stale, rotating");

        let dir = self.log_path.parent().unwrap_or_else(|| ".".as_ref());
        let rotated = dir.join(rotated_file_name());

        match tokio::fs::rename(&self.log_path, &rotated).await {
            Ok(()) => {
                self.rotation_count += 1;
                self.uploader.dispatch(rotated);
            }
            Err(e) => {
                // the drain still lands in the un-renamed active file
                error!("failed to rotate {}: {e}", self.log_path.display());
            }
        }
    }

    async fn append_to_file(&self, data: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await?;
        file.write_all(data.as_bytes()).await?;
        file.flush().await
    }
}

/// Handle for forwarding lines to and controlling the CoordinatorActor
#[derive(Clone)]
pub struct CoordinatorHandle {
    line_tx: mpsc::Sender<String>,
    command_tx: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    /// Spawn a new coordinator actor
    ///
    /// # Arguments
    /// - `log_path`: active log file; rotated files land in its directory
    /// - `policy`: size/age rotation thresholds
    /// - `flush_interval`: how often the buffer is drained
    /// - `forward_queue_size`: capacity of the listener → coordinator channel
    /// - `uploader`: dispatcher for rotated files
    pub fn spawn(
        log_path: PathBuf,
        policy: RotationPolicy,
        flush_interval: Duration,
        forward_queue_size: usize,
        uploader: UploadDispatcher,
    ) -> Self {
        let (line_tx, line_rx) = mpsc::channel(forward_queue_size);
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = CoordinatorActor::new(
            line_rx,
            command_rx,
            log_path,
            policy,
            flush_interval,
            uploader,
        );

        tokio::spawn(actor.run());

        Self {
            line_tx,
            command_tx,
        }
    }

    /// Forward a decoded line, fire-and-forget
    ///
    /// Never blocks: when the channel is full or the coordinator is gone the
    /// line is dropped silently, the way UDP already permits loss.
    pub fn forward(&self, line: String) {
        if let Err(e) = self.line_tx.try_send(line) {
            trace!("dropping line, coordinator unavailable: {e}");
        }
    }

    /// Run a flush cycle now and wait for it to complete
    pub async fn flush_now(&self) {
        let (tx, rx) = oneshot::channel();
        if self
            .command_tx
            .send(CoordinatorCommand::Flush { respond_to: tx })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }

    /// Get pipeline statistics
    pub async fn stats(&self) -> Option<CoordinatorStats> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(CoordinatorCommand::GetStats { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()
    }

    /// Shut down the coordinator without draining the buffer
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(CoordinatorCommand::Shutdown).await;
    }
}
