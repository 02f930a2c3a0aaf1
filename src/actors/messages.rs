//! Message types for actor communication

use tokio::sync::oneshot;

/// Commands that can be sent to the CoordinatorActor
#[derive(Debug)]
pub enum CoordinatorCommand {
    /// Run a flush cycle immediately (bypassing the interval timer)
    ///
    /// Used for testing and manual flushes.
    Flush {
        /// Resolved once the cycle has completed
        respond_to: oneshot::Sender<()>,
    },

    /// Get pipeline statistics
    GetStats {
        respond_to: oneshot::Sender<CoordinatorStats>,
    },

    /// Shut down the coordinator
    ///
    /// The in-memory buffer is NOT drained: there is no shutdown-drain
    /// guarantee anywhere in the pipeline.
    Shutdown,
}

/// Pipeline statistics
#[derive(Debug, Clone, Default)]
pub struct CoordinatorStats {
    /// Bytes currently accumulated in the in-memory buffer
    pub buffered_bytes: usize,

    /// Lines received from listeners since startup
    pub lines_received: u64,

    /// Flush cycles performed
    pub flush_count: u64,

    /// Rotations performed
    pub rotation_count: u64,
}
