//! Rotation policy for the active log file
//!
//! The flush scheduler stats the active file every cycle and asks this policy
//! whether the file should be renamed into the upload queue. The decision is
//! pure so it can be tested without touching the filesystem.

use std::time::{Duration, SystemTime};

use rand::Rng;

/// Decides when the active log file is renamed into the upload queue
#[derive(Debug, Clone, Copy)]
pub struct RotationPolicy {
    /// Rotate once the file reaches this size
    pub max_size_bytes: u64,

    /// Rotate once the file has not been modified for this long
    pub max_age: Duration,
}

impl RotationPolicy {
    pub fn new(max_size_bytes: u64, max_age: Duration) -> Self {
        Self {
            max_size_bytes,
            max_age,
        }
    }

    /// A file rotates when it is full or stale; a file just below both
    /// thresholds never rotates.
    pub fn should_rotate(&self, size: u64, mtime: SystemTime, now: SystemTime) -> bool {
        if size >= self.max_size_bytes {
            return true;
        }

        match now.duration_since(mtime) {
            Ok(age) => age >= self.max_age,
            // mtime in the future, treat as freshly written
            Err(_) => false,
        }
    }
}

/// File name for a rotated file awaiting upload
///
/// The random suffix keeps concurrent rotations from colliding; rotated files
/// are immutable and deleted only after a successful upload.
pub fn rotated_file_name() -> String {
    format!("syncme{}.txt", random_suffix())
}

/// Random 5-digit suffix shared by rotated file names and upload keys
pub fn random_suffix() -> u32 {
    rand::rng().random_range(10_000..=99_999)
}
